use std::io::Write;

use sky_shooter::config::{GameConfig, DEFAULT_UPGRADE_THRESHOLDS};
use sky_shooter::entities::Playfield;
use sky_shooter::error::ConfigError;

#[test]
fn defaults_are_valid() {
    let config = GameConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.upgrade_thresholds, DEFAULT_UPGRADE_THRESHOLDS.to_vec());
    assert_eq!(config.fire_interval, 20);
    assert_eq!(config.playfield, Playfield { width: 375.0, height: 667.0 });
}

#[test]
fn partial_ron_fills_in_defaults() {
    let config = GameConfig::from_ron_str("(seed: Some(7), fire_interval: 10)").unwrap();
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.fire_interval, 10);
    assert_eq!(config.playfield, Playfield::default());
}

#[test]
fn empty_thresholds_rejected() {
    let err = GameConfig::from_ron_str("(upgrade_thresholds: [])").unwrap_err();
    assert!(matches!(err, ConfigError::EmptyThresholds));
}

#[test]
fn first_threshold_must_be_zero() {
    let err = GameConfig::from_ron_str("(upgrade_thresholds: [5, 10])").unwrap_err();
    assert!(matches!(err, ConfigError::FirstThresholdNonZero(5)));
}

#[test]
fn thresholds_must_strictly_increase() {
    let err = GameConfig::from_ron_str("(upgrade_thresholds: [0, 10, 10, 20])").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ThresholdsNotIncreasing { index: 2, previous: 10, value: 10 }
    ));
}

#[test]
fn playfield_and_interval_validated() {
    let err = GameConfig::from_ron_str("(playfield: (width: 0.0, height: 100.0))").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPlayfield { .. }));

    let err = GameConfig::from_ron_str("(fire_interval: 0)").unwrap_err();
    assert!(matches!(err, ConfigError::ZeroFireInterval));
}

#[test]
fn infinite_playfield_rejected() {
    for ron in [
        "(playfield: (width: inf, height: 667.0))",
        "(playfield: (width: 375.0, height: inf))",
        "(playfield: (width: NaN, height: 667.0))",
    ] {
        let err = GameConfig::from_ron_str(ron).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPlayfield { .. }), "{ron}");
    }
}

#[test]
fn malformed_ron_is_a_parse_error() {
    let err = GameConfig::from_ron_str("(seed: ").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "(playfield: (width: 414.0, height: 896.0))").unwrap();
    let config = GameConfig::load(file.path()).unwrap();
    assert_eq!(config.playfield, Playfield { width: 414.0, height: 896.0 });
}

#[test]
fn load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.ron");
    let err = GameConfig::load(&path).unwrap_err();
    match err {
        ConfigError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}
