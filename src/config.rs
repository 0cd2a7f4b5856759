//! Game configuration, loaded from RON.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```ron
//! (
//!     playfield: (width: 414.0, height: 896.0),
//!     upgrade_thresholds: [0, 20, 50, 90],
//!     seed: Some(7),
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::Playfield;
use crate::error::ConfigError;

/// Score required to reach each upgrade level; index 0 is always free.
pub const DEFAULT_UPGRADE_THRESHOLDS: [u32; 6] = [0, 10, 30, 60, 100, 150];

/// Ticks between two player volleys.
pub const DEFAULT_FIRE_INTERVAL: u64 = 20;

/// ≈60 FPS.
pub const DEFAULT_FRAME_MILLIS: u64 = 16;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub playfield: Playfield,
    pub upgrade_thresholds: Vec<u32>,
    pub fire_interval: u64,
    pub frame_millis: u64,
    /// Fixed RNG seed for reproducible sessions; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            upgrade_thresholds: DEFAULT_UPGRADE_THRESHOLDS.to_vec(),
            fire_interval: DEFAULT_FIRE_INTERVAL,
            frame_millis: DEFAULT_FRAME_MILLIS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Read and validate a RON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(&first) = self.upgrade_thresholds.first() else {
            return Err(ConfigError::EmptyThresholds);
        };
        if first != 0 {
            return Err(ConfigError::FirstThresholdNonZero(first));
        }
        for (index, pair) in self.upgrade_thresholds.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::ThresholdsNotIncreasing {
                    index: index + 1,
                    previous: pair[0],
                    value: pair[1],
                });
            }
        }

        let Playfield { width, height } = self.playfield;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidPlayfield { width, height });
        }

        if self.fire_interval == 0 {
            return Err(ConfigError::ZeroFireInterval);
        }
        Ok(())
    }
}
