use std::fs;

use daycycle::{
    config::{ConfigError, ConfigLoader},
    theme::Theme,
    weather::WeatherKind,
};
use tempfile::tempdir;

#[test]
fn loads_a_file_relative_to_the_base_dir() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("daycycle.yaml"),
        "seed: 99\ntheme: dark\ninitial_weather:\n  kind: cloudy\n  temperature_c: 15\n",
    )
    .unwrap();

    let config = ConfigLoader::new(dir.path())
        .load("daycycle.yaml")
        .expect("config should load");
    assert_eq!(config.seed, Some(99));
    assert_eq!(config.theme, Theme::Dark);
    assert_eq!(config.initial_weather.kind, WeatherKind::Cloudy);
    assert_eq!(config.web.port, 8080);
}

#[test]
fn missing_file_reports_the_path() {
    let dir = tempdir().expect("tempdir");
    let err = ConfigLoader::new(dir.path())
        .load("absent.yaml")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("absent.yaml"));
}

#[test]
fn bundled_sample_config_is_valid() {
    let config = ConfigLoader::new(env!("CARGO_MANIFEST_DIR"))
        .load("config/daycycle.yaml")
        .expect("sample config should load");
    assert_eq!(config.initial_weather.temperature_c, 20);
}
