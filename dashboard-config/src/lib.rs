use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub mod store;
pub use store::{parse_bool, KeyValueStore, DEFAULT_MAX_AGE};

pub const MIN_WINDOW_MINUTES: f64 = 1.0;
pub const MAX_WINDOW_MINUTES: f64 = 180.0;

const KEY_SHOW_TEMPERATURE: &str = "chartShowTemperature";
const KEY_SHOW_POWER: &str = "chartShowPower";
const KEY_SHOW_MEAN_POWER: &str = "chartShowMeanPower";
const KEY_WINDOW_MINUTES: &str = "chartPeriod";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("toml write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Which chart series are drawn and how wide the visible time window is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub show_temperature: bool,
    pub show_power: bool,
    pub show_mean_power: bool,
    /// Fractional after a pinch or secondary-button resize.
    pub window_minutes: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_temperature: true,
            show_power: false,
            show_mean_power: false,
            window_minutes: 20.0,
        }
    }
}

impl DisplayConfig {
    pub fn window_ms(&self) -> f64 {
        self.window_minutes * 60_000.0
    }

    pub fn set_window_ms(&mut self, window_ms: f64) {
        self.window_minutes = window_ms / 60_000.0;
    }

    /// Validates a window width typed in by the operator.
    pub fn with_window_minutes(mut self, minutes: f64) -> Result<Self, ConfigError> {
        if !minutes.is_finite() || !(MIN_WINDOW_MINUTES..=MAX_WINDOW_MINUTES).contains(&minutes) {
            return Err(ConfigError::Invalid {
                name: KEY_WINDOW_MINUTES.to_string(),
                reason: format!(
                    "must be between {MIN_WINDOW_MINUTES} and {MAX_WINDOW_MINUTES} minutes"
                ),
            });
        }
        self.window_minutes = minutes;
        Ok(self)
    }

    /// Reads every field from the store, keeping the current value for absent or expired keys.
    pub fn load(store: &KeyValueStore, now: SystemTime) -> Self {
        let defaults = Self::default();
        let window_minutes = store.get_f64(KEY_WINDOW_MINUTES, defaults.window_minutes, now);
        Self {
            show_temperature: store.get_bool(KEY_SHOW_TEMPERATURE, defaults.show_temperature, now),
            show_power: store.get_bool(KEY_SHOW_POWER, defaults.show_power, now),
            show_mean_power: store.get_bool(KEY_SHOW_MEAN_POWER, defaults.show_mean_power, now),
            window_minutes: if window_minutes > 0.0 {
                window_minutes
            } else {
                defaults.window_minutes
            },
        }
    }

    pub fn save(&self, store: &mut KeyValueStore, now: SystemTime) -> Result<(), ConfigError> {
        store.set(KEY_SHOW_TEMPERATURE, self.show_temperature, DEFAULT_MAX_AGE, now);
        store.set(KEY_SHOW_POWER, self.show_power, DEFAULT_MAX_AGE, now);
        store.set(KEY_SHOW_MEAN_POWER, self.show_mean_power, DEFAULT_MAX_AGE, now);
        store.set(KEY_WINDOW_MINUTES, self.window_minutes, DEFAULT_MAX_AGE, now);
        store.flush()
    }
}

/// Client-side settings read from `brewpid.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub ws_port: u16,
    pub http_port: u16,
    pub retention_minutes: u32,
    pub plot_width_px: u32,
    pub reconnect_delay_ms: u64,
    pub alive_timeout_ms: u64,
    pub store_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "coffeepid.local".to_string(),
            ws_port: 81,
            http_port: 80,
            retention_minutes: 60,
            plot_width_px: 600,
            reconnect_delay_ms: 2_000,
            alive_timeout_ms: 10_000,
            store_path: None,
        }
    }
}

impl ClientConfig {
    pub fn retention_ms(&self) -> i64 {
        i64::from(self.retention_minutes) * 60_000
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}:{}/", self.host, self.ws_port)
    }

    pub fn http_base_url(&self) -> String {
        if self.http_port == 80 {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.http_port)
        }
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "host".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.retention_minutes == 0 {
            return Err(ConfigError::Invalid {
                name: "retention_minutes".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.plot_width_px == 0 {
            return Err(ConfigError::Invalid {
                name: "plot_width_px".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        if let Some(parent) = path.as_ref().parent() {
            let _ = fs::create_dir_all(parent);
        }
        let data = toml::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&data)?;
        config.validate()
    }

    /// Falls back to defaults when the file does not exist yet.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            log::debug!(
                "No client config at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }
}
