//! Per-type free-list recycler.
//!
//! Instances are keyed by a string tag and stored type-erased, so one pool
//! can hold enemies, bullets and anything else that is spawned often enough
//! to be worth recycling. Fetching never fails: an empty (or mismatched)
//! free list falls back to the supplied constructor.

use std::any::Any;
use std::collections::HashMap;

/// A type that can live in a [`Pool`] under a fixed key.
pub trait Poolable: Any {
    const POOL_KEY: &'static str;
}

#[derive(Default)]
pub struct Pool {
    free: HashMap<&'static str, Vec<Box<dyn Any>>>,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (key, list) in &self.free {
            map.entry(key, &list.len());
        }
        map.finish()
    }
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` to the free list for `key`.
    ///
    /// The caller must already have taken `item` out of every active
    /// collection. No deduplication is done.
    pub fn recover<T: Any>(&mut self, key: &'static str, item: T) {
        log::trace!("recycling instance into pool '{key}'");
        self.free.entry(key).or_default().push(Box::new(item));
    }

    /// Pop the most recently recovered instance for `key`, or build a fresh
    /// one with `make` when there is none.
    pub fn get_item_by_class<T: Any>(&mut self, key: &'static str, make: impl FnOnce() -> T) -> T {
        if let Some(list) = self.free.get_mut(key) {
            if let Some(boxed) = list.pop() {
                match boxed.downcast::<T>() {
                    Ok(item) => return *item,
                    Err(stray) => {
                        log::warn!(
                            "pool '{key}' held an instance of another type; building a fresh one"
                        );
                        list.push(stray);
                    }
                }
            }
        }
        log::debug!("pool '{key}' empty, constructing new instance");
        make()
    }

    /// Number of instances waiting in the free list for `key`.
    pub fn free_len(&self, key: &str) -> usize {
        self.free.get(key).map_or(0, Vec::len)
    }

    /// Inspect the pooled instances of type `T` under `key`, oldest first.
    pub fn iter_free<'a, T: Any>(&'a self, key: &str) -> impl Iterator<Item = &'a T> + 'a {
        self.free
            .get(key)
            .into_iter()
            .flatten()
            .filter_map(|boxed| (**boxed).downcast_ref::<T>())
    }
}
