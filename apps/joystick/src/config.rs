use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use dispatcher::DispatcherConfig;
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "joystick.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Kept as text: it goes through the same validation as typed input.
    pub host: String,
    pub port: String,
    pub connect_timeout_ms: u64,
    pub rate_window_ms: u64,
    pub rate_limit_extra: u32,
    pub queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        let dispatcher = DispatcherConfig::default();
        Self {
            host: "127.0.0.1".into(),
            port: "6400".into(),
            connect_timeout_ms: duration_ms(dispatcher.connect_timeout),
            rate_window_ms: duration_ms(dispatcher.rate_window),
            rate_limit_extra: dispatcher.rate_limit,
            queue_capacity: dispatcher.queue_capacity,
        }
    }
}

impl Settings {
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            rate_window: Duration::from_millis(self.rate_window_ms),
            rate_limit: self.rate_limit_extra,
            queue_capacity: self.queue_capacity,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    host: Option<String>,
    port: Option<PortSetting>,
    connect_timeout_ms: Option<u64>,
    rate_window_ms: Option<u64>,
    rate_limit_extra: Option<u32>,
    queue_capacity: Option<usize>,
}

/// Accepts `port = 6400` as well as `port = "6400"`; range checks happen at
/// validation, like any other port text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PortSetting {
    Number(i64),
    Text(String),
}

impl PortSetting {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(text) => text,
        }
    }
}

/// Defaults, then `path` if it exists, then environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<FileSettings>(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            apply_file(&mut settings, file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.host {
        settings.host = v;
    }
    if let Some(v) = file_cfg.port {
        settings.port = v.into_text();
    }
    if let Some(v) = file_cfg.connect_timeout_ms {
        settings.connect_timeout_ms = v;
    }
    if let Some(v) = file_cfg.rate_window_ms {
        settings.rate_window_ms = v;
    }
    if let Some(v) = file_cfg.rate_limit_extra {
        settings.rate_limit_extra = v;
    }
    if let Some(v) = file_cfg.queue_capacity {
        settings.queue_capacity = v;
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("JOYSTICK_HOST") {
        settings.host = v;
    }
    if let Some(v) = lookup("APP__HOST") {
        settings.host = v;
    }

    if let Some(v) = lookup("JOYSTICK_PORT") {
        settings.port = v;
    }
    if let Some(v) = lookup("APP__PORT") {
        settings.port = v;
    }

    if let Some(v) = lookup("JOYSTICK_CONNECT_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.connect_timeout_ms = parsed;
        }
    }
    if let Some(v) = lookup("JOYSTICK_RATE_WINDOW_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.rate_window_ms = parsed;
        }
    }
    if let Some(v) = lookup("JOYSTICK_RATE_LIMIT") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.rate_limit_extra = parsed;
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
