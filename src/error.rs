use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading or validating a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("upgrade threshold table is empty")]
    EmptyThresholds,

    #[error("first upgrade threshold must be 0, got {0}")]
    FirstThresholdNonZero(u32),

    #[error("upgrade thresholds must be strictly increasing (index {index}: {value} <= {previous})")]
    ThresholdsNotIncreasing { index: usize, previous: u32, value: u32 },

    #[error("playfield must have a finite, positive size, got {width}x{height}")]
    InvalidPlayfield { width: f32, height: f32 },

    #[error("fire interval must be at least one tick")]
    ZeroFireInterval,
}
