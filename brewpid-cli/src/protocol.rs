use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const SETTINGS_PATH: &str = "/ajax_get_settings";
pub const WIFIS_PATH: &str = "/ajax_get_wifis";
pub const SET_SETTINGS_PATH: &str = "/ajax_set_settings";

/// Shortest WiFi password the device accepts; empty means an open network.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WifiMode {
    Client,
    #[default]
    Ap,
}

impl WifiMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WifiMode::Client => "client",
            WifiMode::Ap => "ap",
        }
    }
}

/// Anything other than `client` selects access-point mode.
impl<'de> Deserialize<'de> for WifiMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("client") => WifiMode::Client,
            _ => WifiMode::Ap,
        })
    }
}

/// The device sends some numbers as strings.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(number) => Ok(number.as_f64().unwrap_or(0.0)),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {text:?}"))),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!("not a number: {other}"))),
    }
}

/// Body of `GET /ajax_get_settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    #[serde(default)]
    pub wifi_ap_ssid: String,
    #[serde(default)]
    pub wifi_ap_password: String,
    #[serde(default)]
    pub wifi_client_ssid: String,
    #[serde(default)]
    pub preferred_wifi_mode: WifiMode,
    #[serde(deserialize_with = "lenient_number")]
    pub target_temp: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub pid_kp: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub pid_ki: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub pid_kd: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub pid_dt: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub pwm_period: f64,
}

impl DeviceSettings {
    pub fn ap_label(&self) -> String {
        if self.wifi_ap_password.is_empty() {
            self.wifi_ap_ssid.clone()
        } else {
            format!("{} / {}", self.wifi_ap_ssid, self.wifi_ap_password)
        }
    }

    pub fn client_ssid_label(&self) -> &str {
        if self.wifi_client_ssid.is_empty() {
            "Select network"
        } else {
            &self.wifi_client_ssid
        }
    }

    pub fn pid(&self) -> PidParameters {
        PidParameters {
            kp: self.pid_kp,
            ki: self.pid_ki,
            kd: self.pid_kd,
            dt: self.pid_dt,
            pwm_period: self.pwm_period,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStrength {
    Poor,
    Fair,
    Good,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiNetwork {
    pub ssid: String,
    pub rssi: i32,
    #[serde(default)]
    pub encryption: String,
}

impl WifiNetwork {
    pub fn signal(&self) -> SignalStrength {
        if self.rssi < -73 {
            SignalStrength::Poor
        } else if self.rssi < -65 {
            SignalStrength::Fair
        } else {
            SignalStrength::Good
        }
    }

    pub fn is_open(&self) -> bool {
        self.encryption == "None"
    }
}

/// Body of `GET /ajax_get_wifis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiList {
    #[serde(default)]
    pub wifis: Vec<WifiNetwork>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidParameters {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub dt: f64,
    pub pwm_period: f64,
}

/// One `POST /ajax_set_settings` request.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    WifiClient { ssid: String, password: String },
    WifiAp { ssid: String, password: String },
    TargetTemperature(f64),
    Reboot,
    WifiMode(WifiMode),
    Pid(PidParameters),
    StartAutotune,
}

pub fn password_acceptable(password: &str) -> bool {
    password.is_empty() || password.chars().count() >= MIN_PASSWORD_LEN
}

impl SettingsAction {
    /// Checks what the device would otherwise reject or misapply.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            SettingsAction::WifiClient { password, .. } | SettingsAction::WifiAp { password, .. }
                if !password_acceptable(password) =>
            {
                Err(format!(
                    "WiFi password must be empty or at least {MIN_PASSWORD_LEN} characters"
                ))
            }
            SettingsAction::WifiAp { ssid, .. } if ssid.trim().is_empty() => {
                Err("Access point SSID must not be empty".to_string())
            }
            SettingsAction::TargetTemperature(value) if !value.is_finite() => {
                Err("Target temperature must be a number".to_string())
            }
            SettingsAction::Pid(pid)
                if [pid.kp, pid.ki, pid.kd, pid.dt, pid.pwm_period]
                    .iter()
                    .any(|v| !v.is_finite()) =>
            {
                Err("PID parameters must be numbers".to_string())
            }
            _ => Ok(()),
        }
    }

    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            SettingsAction::WifiClient { ssid, password } => vec![
                ("wifi_client_ssid", ssid.clone()),
                ("wifi_client_password", password.clone()),
            ],
            SettingsAction::WifiAp { ssid, password } => vec![
                ("wifi_ap_ssid", ssid.clone()),
                ("wifi_ap_password", password.clone()),
            ],
            SettingsAction::TargetTemperature(value) => vec![("target_temp", value.to_string())],
            SettingsAction::Reboot => vec![("reboot", "true".to_string())],
            SettingsAction::WifiMode(mode) => {
                vec![("preferred_wifi_mode", mode.as_str().to_string())]
            }
            SettingsAction::Pid(pid) => vec![
                ("pid_kp", pid.kp.to_string()),
                ("pid_ki", pid.ki.to_string()),
                ("pid_kd", pid.kd.to_string()),
                ("pid_dt", pid.dt.to_string()),
                ("pwm_period", pid.pwm_period.to_string()),
            ],
            SettingsAction::StartAutotune => vec![("start_pid_tune", "1".to_string())],
        }
    }
}
