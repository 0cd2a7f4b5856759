//! Enemy movement strategies.
//!
//! The variant is chosen once per spawn; per-variant state lives inside the
//! enum so re-initialising an enemy replaces all of it at once.

use std::f32::consts::TAU;

use rand::Rng;

use crate::entities::Playfield;

/// Horizontal step of the zig-zag pattern, per tick.
pub const ZIGZAG_STEP: f32 = 2.0;
pub const SINE_AMPLITUDE: f32 = 50.0;
pub const SINE_FREQUENCY: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementKind {
    Straight,
    ZigZag,
    Sine,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Movement {
    Straight,
    /// `direction` is +1.0 (rightward) or -1.0.
    ZigZag { direction: f32 },
    Sine { start_x: f32, phase: f32 },
}

impl Movement {
    /// Pick a variant: with probability `special_chance` a special one
    /// (zig-zag or sine, even odds), otherwise straight.
    pub fn roll(special_chance: f32, start_x: f32, rng: &mut impl Rng) -> Self {
        let kind = if rng.gen::<f32>() < special_chance {
            if rng.gen_bool(0.5) {
                MovementKind::ZigZag
            } else {
                MovementKind::Sine
            }
        } else {
            MovementKind::Straight
        };
        Self::new(kind, start_x, rng)
    }

    pub fn new(kind: MovementKind, start_x: f32, rng: &mut impl Rng) -> Self {
        match kind {
            MovementKind::Straight => Movement::Straight,
            MovementKind::ZigZag => Movement::ZigZag { direction: 1.0 },
            MovementKind::Sine => Movement::Sine {
                start_x,
                phase: rng.gen_range(0.0..TAU),
            },
        }
    }

    pub fn kind(&self) -> MovementKind {
        match self {
            Movement::Straight => MovementKind::Straight,
            Movement::ZigZag { .. } => MovementKind::ZigZag,
            Movement::Sine { .. } => MovementKind::Sine,
        }
    }

    /// New horizontal position after the vertical advance to `y`, clamped to
    /// the playfield.
    pub fn step_x(&mut self, x: f32, y: f32, width: f32, playfield: &Playfield) -> f32 {
        let max_x = playfield.max_x(width);
        let next = match self {
            Movement::Straight => x,
            Movement::ZigZag { direction } => {
                let next = x + ZIGZAG_STEP * *direction;
                if next <= 0.0 || next >= max_x {
                    *direction = -*direction;
                }
                next
            }
            Movement::Sine { start_x, phase } => {
                *start_x + (y * SINE_FREQUENCY + *phase).sin() * SINE_AMPLITUDE
            }
        };
        next.clamp(0.0, max_x)
    }
}
