//! Shared entity protocol: geometry, per-tick context and the lifecycle
//! contract implemented by [`Enemy`](crate::enemy::Enemy),
//! [`Bullet`](crate::bullet::Bullet) and [`Player`](crate::player::Player).
//!
//! Lifecycle of a pooled entity:
//!
//! ```text
//! pooled ──init──▶ active ──destroy──▶ destroying ──(explosion done)──▶ removed ──▶ pooled
//!                    │                                                    ▲
//!                    └──────────────── left playfield ────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::feedback::Feedback;

// ── Identity ──────────────────────────────────────────────────────────────────

/// Stable handle of one entity instance. Survives recycling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle, origin at the top-left corner, y pointing down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive on every edge.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Visible play area in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 375.0,
            height: 667.0,
        }
    }
}

impl Playfield {
    /// Largest x at which an entity of `width` is still fully on screen.
    pub fn max_x(&self, width: f32) -> f32 {
        (self.width - width).max(0.0)
    }

    pub fn clamp_x(&self, x: f32, width: f32) -> f32 {
        x.clamp(0.0, self.max_x(width))
    }

    pub fn clamp_y(&self, y: f32, height: f32) -> f32 {
        y.clamp(0.0, (self.height - height).max(0.0))
    }
}

// ── Per-tick protocol ─────────────────────────────────────────────────────────

/// Read-only view of the bus handed to every entity update.
#[derive(Clone, Copy, Debug)]
pub struct TickContext {
    pub frame: u64,
    pub is_game_over: bool,
    pub playfield: Playfield,
    pub fire_interval: u64,
}

/// What an entity asks of its owner after `update` or `destroy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Fire a volley (player only).
    Fire,
    /// Take the entity out of its active collection and recycle it.
    Despawn,
}

pub trait Entity {
    fn bounds(&self) -> Rect;
    fn is_active(&self) -> bool;
    fn is_visible(&self) -> bool;

    /// Advance one tick. Must do nothing once `ctx.is_game_over` is set.
    fn update(&mut self, ctx: &TickContext) -> Outcome;

    /// Explicit destruction (hit). Entities with an explosion keep playing it
    /// and return [`Outcome::Continue`]; the others despawn immediately.
    fn destroy(&mut self, feedback: &mut dyn Feedback) -> Outcome;

    /// Clear the active and visible flags ahead of recycling.
    fn remove(&mut self);

    /// Centre of `other` inside our bounds, both visible.
    fn collides_with<E: Entity>(&self, other: &E) -> bool
    where
        Self: Sized,
    {
        if !self.is_visible() || !other.is_visible() {
            return false;
        }
        let (cx, cy) = other.bounds().center();
        self.bounds().contains(cx, cy)
    }
}

// ── Explosion sequence ────────────────────────────────────────────────────────

pub const EXPLOSION_FRAMES: usize = 19;

/// Fixed-length explosion playback, one frame per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Explosion {
    frame: Option<usize>,
}

impl Explosion {
    pub fn start(&mut self) {
        self.frame = Some(0);
    }

    pub fn reset(&mut self) {
        self.frame = None;
    }

    pub fn is_playing(&self) -> bool {
        self.frame.is_some()
    }

    /// Index of the frame currently shown, if playing.
    pub fn current_frame(&self) -> Option<usize> {
        self.frame
    }

    /// Step to the next frame. Returns `true` once the last frame has been
    /// shown; the sequence then stops.
    pub fn advance(&mut self) -> bool {
        let Some(frame) = self.frame else {
            return false;
        };
        if frame + 1 >= EXPLOSION_FRAMES {
            self.frame = None;
            true
        } else {
            self.frame = Some(frame + 1);
            false
        }
    }
}
