//! Runtime core of a vertically-scrolling arcade shooter.
//!
//! Rendering, raw input and audio live in the binary; everything here is
//! deterministic given an injected RNG.

pub mod bullet;
pub mod compute;
pub mod config;
pub mod databus;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod feedback;
pub mod movement;
pub mod player;
pub mod pool;
pub mod weapon;
