use crate::application::dashboard_engine::{EngineSettings, DEFAULT_FLUSH_DELAY, DEFAULT_WINDOW_DAYS};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_flush_delay_ms")]
    pub flush_delay_ms: u64,
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            flush_delay_ms: default_flush_delay_ms(),
            default_window_days: default_window_days(),
        }
    }
}

impl EngineConfig {
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            flush_delay: Duration::from_millis(self.flush_delay_ms),
            default_window_days: self.default_window_days,
        }
    }
}

/// Without a snapshot path the dashboard keeps its snapshot in memory only.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportSettings {
    /// Supports `${report}`, `${start}`, `${end}`, `${clubs}` and `${courts}`.
    #[serde(default = "default_export_url_template")]
    pub url_template: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            url_template: default_export_url_template(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_flush_delay_ms() -> u64 {
    DEFAULT_FLUSH_DELAY.as_millis() as u64
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn default_export_url_template() -> String {
    "http://localhost:3000/api/exports/${report}?start=${start}&end=${end}".to_string()
}

/// Loads `config/dashboard.*` if present, then `DASHBOARD__SECTION__KEY`
/// environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders, URL-encoding each substituted value
pub fn prepare_template(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
