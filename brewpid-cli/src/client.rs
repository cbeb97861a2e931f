use crate::protocol::{
    DeviceSettings, SettingsAction, WifiList, SETTINGS_PATH, SET_SETTINGS_PATH, WIFIS_PATH,
};
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("{url} returned HTTP {status}")]
    Http { status: u16, url: String },
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

fn map_ureq_error(url: &str, err: ureq::Error) -> SettingsError {
    match err {
        ureq::Error::Status(status, _) => SettingsError::Http {
            status,
            url: url.to_string(),
        },
        ureq::Error::Transport(transport) => SettingsError::Transport {
            url: url.to_string(),
            reason: transport.to_string(),
        },
    }
}

/// Blocking client for the device's settings endpoints.
#[derive(Debug, Clone)]
pub struct SettingsClient {
    base_url: String,
    timeout: Duration,
}

impl SettingsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_body(&self, path: &str) -> Result<String, SettingsError> {
        let url = self.url(path);
        log::debug!("GET {url}");
        let response = ureq::get(&url)
            .timeout(self.timeout)
            .call()
            .map_err(|err| map_ureq_error(&url, err))?;
        Ok(response.into_string()?)
    }

    pub fn get_settings(&self) -> Result<DeviceSettings, SettingsError> {
        let body = self.get_body(SETTINGS_PATH)?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn get_wifis(&self) -> Result<WifiList, SettingsError> {
        let body = self.get_body(WIFIS_PATH)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Validates and submits one settings change as a form post.
    pub fn post(&self, action: &SettingsAction) -> Result<(), SettingsError> {
        action.validate().map_err(SettingsError::Invalid)?;
        let url = self.url(SET_SETTINGS_PATH);
        let fields = action.form_fields();
        let form: Vec<(&str, &str)> = fields
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        log::info!("POST {url} {names:?}");
        ureq::post(&url)
            .timeout(self.timeout)
            .send_form(&form)
            .map_err(|err| map_ureq_error(&url, err))?;
        Ok(())
    }
}
