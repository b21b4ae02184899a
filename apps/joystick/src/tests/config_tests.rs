use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_path(tag: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("joystick_{tag}_{suffix}.toml"))
}

#[test]
fn defaults_match_dispatcher_defaults() {
    let settings = Settings::default();
    let config = settings.dispatcher_config();
    let defaults = DispatcherConfig::default();

    assert_eq!(settings.host, "127.0.0.1");
    assert_eq!(settings.port, "6400");
    assert_eq!(config.connect_timeout, defaults.connect_timeout);
    assert_eq!(config.rate_window, defaults.rate_window);
    assert_eq!(config.rate_limit, defaults.rate_limit);
    assert_eq!(config.queue_capacity, defaults.queue_capacity);
}

#[test]
fn missing_file_keeps_defaults() {
    let path = temp_settings_path("missing");
    let settings = load_settings(&path).expect("load");
    assert_eq!(settings.connect_timeout_ms, 2000);
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_path("file");
    fs::write(
        &path,
        "host = \"10.0.0.7\"\nport = 5401\nconnect_timeout_ms = 500\nrate_limit_extra = 4\n",
    )
    .expect("write settings");

    let mut settings = Settings::default();
    let raw = fs::read_to_string(&path).expect("read");
    apply_file(&mut settings, toml::from_str(&raw).expect("parse"));
    fs::remove_file(&path).expect("cleanup");

    assert_eq!(settings.host, "10.0.0.7");
    assert_eq!(settings.port, "5401");
    assert_eq!(settings.connect_timeout_ms, 500);
    assert_eq!(settings.rate_limit_extra, 4);
    assert_eq!(settings.rate_window_ms, 10);
}

#[test]
fn malformed_file_is_an_error() {
    let path = temp_settings_path("malformed");
    fs::write(&path, "connect_timeout_ms = \"soon\"\n").expect("write settings");

    let result = load_settings(&path);
    fs::remove_file(&path).expect("cleanup");

    let err = result.expect_err("malformed settings");
    assert!(err.to_string().contains("failed to parse settings file"));
}

#[test]
fn app_prefixed_env_wins_over_joystick_prefix() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("JOYSTICK_HOST", "10.0.0.1"),
        ("APP__HOST", "10.0.0.2"),
        ("JOYSTICK_PORT", "7000"),
        ("JOYSTICK_CONNECT_TIMEOUT_MS", "250"),
    ]);
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.host, "10.0.0.2");
    assert_eq!(settings.port, "7000");
    assert_eq!(settings.connect_timeout_ms, 250);
}

#[test]
fn unparsable_numeric_env_is_ignored() {
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| {
        (key == "JOYSTICK_RATE_WINDOW_MS").then(|| "soon".to_string())
    });
    assert_eq!(settings.rate_window_ms, 10);
}

#[test]
fn out_of_range_file_port_is_left_to_validation() {
    let path = temp_settings_path("port_range");
    fs::write(&path, "port = 70000\n").expect("write settings");

    let result = load_settings(&path);
    fs::remove_file(&path).expect("cleanup");

    let settings = result.expect("load");
    assert_eq!(settings.port, "70000");
    assert_eq!(
        coordinator::validate_endpoint(&settings.host, &settings.port),
        Err(shared::error::ValidationError::InvalidPort)
    );
}

#[test]
fn quoted_file_port_is_accepted() {
    let mut settings = Settings::default();
    apply_file(&mut settings, toml::from_str("port = \"5402\"\n").expect("parse"));
    assert_eq!(settings.port, "5402");
}
