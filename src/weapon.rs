//! Weapon tier controller.
//!
//! Stateless: every volley re-reads the capped upgrade level and looks the
//! pattern up in a fixed table.

use crate::bullet::{Bullet, BULLET_WIDTH};
use crate::databus::DataBus;
use crate::entities::{EntityId, Rect};

/// Muzzle sits this far above the top of the plane.
const MUZZLE_OFFSET: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponTier {
    Single,
    Double,
    Triple,
    Spread,
    EnhancedSpread,
    Maximum,
}

/// One projectile of a volley.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shot {
    /// Horizontal muzzle position as a fraction of the shooter's width.
    pub muzzle: f32,
    /// Radians from vertical.
    pub angle: f32,
    pub speed: f32,
}

const fn shot(muzzle: f32, angle: f32, speed: f32) -> Shot {
    Shot { muzzle, angle, speed }
}

const SINGLE: [Shot; 1] = [shot(0.5, 0.0, 10.0)];

const DOUBLE: [Shot; 2] = [shot(1.0 / 3.0, 0.0, 10.0), shot(2.0 / 3.0, 0.0, 10.0)];

const TRIPLE: [Shot; 3] = [
    shot(0.25, 0.0, 10.0),
    shot(0.5, 0.0, 10.0),
    shot(0.75, 0.0, 10.0),
];

const SPREAD: [Shot; 5] = [
    shot(0.5, -0.3, 10.0),
    shot(0.5, -0.15, 10.0),
    shot(0.5, 0.0, 10.0),
    shot(0.5, 0.15, 10.0),
    shot(0.5, 0.3, 10.0),
];

const ENHANCED_SPREAD: [Shot; 7] = [
    shot(0.5, -0.4, 12.0),
    shot(0.5, -0.2, 12.0),
    shot(0.5, -0.1, 12.0),
    shot(0.5, 0.0, 12.0),
    shot(0.5, 0.1, 12.0),
    shot(0.5, 0.2, 12.0),
    shot(0.5, 0.4, 12.0),
];

const MAXIMUM: [Shot; 9] = [
    shot(0.5, -0.5, 15.0),
    shot(0.5, -0.3, 15.0),
    shot(0.5, -0.15, 15.0),
    shot(0.5, -0.05, 15.0),
    shot(0.5, 0.0, 15.0),
    shot(0.5, 0.05, 15.0),
    shot(0.5, 0.15, 15.0),
    shot(0.5, 0.3, 15.0),
    shot(0.5, 0.5, 15.0),
];

impl WeaponTier {
    /// Levels past the top tier keep the maximum pattern.
    pub fn for_level(level: u32) -> Self {
        match level {
            0 => WeaponTier::Single,
            1 => WeaponTier::Double,
            2 => WeaponTier::Triple,
            3 => WeaponTier::Spread,
            4 => WeaponTier::EnhancedSpread,
            _ => WeaponTier::Maximum,
        }
    }

    pub fn shots(self) -> &'static [Shot] {
        match self {
            WeaponTier::Single => &SINGLE,
            WeaponTier::Double => &DOUBLE,
            WeaponTier::Triple => &TRIPLE,
            WeaponTier::Spread => &SPREAD,
            WeaponTier::EnhancedSpread => &ENHANCED_SPREAD,
            WeaponTier::Maximum => &MAXIMUM,
        }
    }
}

/// Spawn one volley from `shooter` at the bus's current tier. Returns the ids
/// of the new bullets in firing order.
pub fn fire(bus: &mut DataBus, shooter: Rect) -> Vec<EntityId> {
    let tier = WeaponTier::for_level(bus.get_upgrade_level());
    let y = shooter.y - MUZZLE_OFFSET;

    tier.shots()
        .iter()
        .map(|s| {
            let x = shooter.x + shooter.width * s.muzzle - BULLET_WIDTH / 2.0;
            bus.spawn_bullet(|bullet: &mut Bullet| bullet.init(x, y, s.speed, s.angle))
        })
        .collect()
}
