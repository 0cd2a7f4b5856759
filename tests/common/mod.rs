#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;

use sky_shooter::config::GameConfig;
use sky_shooter::databus::DataBus;
use sky_shooter::feedback::{Feedback, Vibration};

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn make_bus() -> DataBus {
    DataBus::new(&GameConfig::default())
}

/// Feedback that remembers every trigger, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub shots: usize,
    pub explosions: usize,
    pub vibrations: Vec<Vibration>,
}

impl Feedback for Recorder {
    fn play_shoot(&mut self) {
        self.shots += 1;
    }

    fn play_explosion(&mut self) {
        self.explosions += 1;
    }

    fn vibrate(&mut self, strength: Vibration) {
        self.vibrations.push(strength);
    }
}
