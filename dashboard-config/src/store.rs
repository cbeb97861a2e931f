use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Ten years, the lifetime given to every display setting.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 10);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    value: String,
    #[serde(default)]
    expires_at: Option<u64>,
}

/// Small persistent string store with per-entry expiry, backed by a JSON file.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, StoredEntry>,
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Cookie-style truthiness: `false`, `no`, `0` and the empty string are false.
pub fn parse_bool(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "no" | "0" | ""
    )
}

impl KeyValueStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let data = fs::read(&path)?;
            serde_json::from_slice(&data)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    pub fn get(&self, name: &str, now: SystemTime) -> Option<&str> {
        let entry = self.entries.get(name)?;
        match entry.expires_at {
            Some(expires_at) if expires_at <= unix_secs(now) => None,
            _ => Some(entry.value.as_str()),
        }
    }

    pub fn get_bool(&self, name: &str, default: bool, now: SystemTime) -> bool {
        self.get(name, now).map(parse_bool).unwrap_or(default)
    }

    pub fn get_f64(&self, name: &str, default: f64, now: SystemTime) -> f64 {
        self.get(name, now)
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .unwrap_or(default)
    }

    pub fn set(&mut self, name: &str, value: impl ToString, max_age: Duration, now: SystemTime) {
        self.entries.insert(
            name.to_string(),
            StoredEntry {
                value: value.to_string(),
                expires_at: Some(unix_secs(now).saturating_add(max_age.as_secs())),
            },
        );
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Writes the store back to its file; in-memory stores have nothing to do.
    pub fn flush(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let data = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(path, data)?;
        Ok(())
    }
}
