use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One text frame from the device. Every key is optional and several may
/// arrive together.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeviceMessage {
    #[serde(rename = "sendBinary", default, deserialize_with = "loose_send_binary")]
    pub send_binary: Option<SendBinary>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub heater: Option<bool>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub power: Option<f64>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub temperature: Option<f64>,
    #[serde(rename = "meanPower", default, deserialize_with = "loose_f64")]
    pub mean_power: Option<f64>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub time: Option<i64>,
    #[serde(default, deserialize_with = "loose_i64")]
    pub millis: Option<i64>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub standby: Option<bool>,
    #[serde(default, deserialize_with = "loose_u32")]
    pub fault: Option<u32>,
    pub tuning: Option<Value>,
    #[serde(default, deserialize_with = "loose_f64")]
    pub target: Option<f64>,
    /// Presence alone matters, `null` included.
    #[serde(default, deserialize_with = "key_present")]
    pub new_config: bool,
}

fn key_present<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer)?;
    Ok(true)
}

// Scalars are read loosely so that one oddly typed key does not cost the
// rest of the frame. Values that cannot be read come back as `None`.

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Bool(flag) => Some(flag),
        Value::Number(number) => Some(number.as_f64().is_some_and(|v| v != 0.0)),
        Value::String(text) => Some(!text.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    })
}

fn loose_send_binary<'de, D>(deserializer: D) -> Result<Option<SendBinary>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

fn loose_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_of(&Value::deserialize(deserializer)?))
}

fn loose_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(exact) = value.as_i64() {
        return Ok(Some(exact));
    }
    Ok(number_of(&value).map(|v| v.round() as i64))
}

fn loose_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_bool(deserializer)?.unwrap_or(false))
}

fn loose_length<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(loose_u32(deserializer)?
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(0))
}

fn loose_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(exact) = value.as_u64() {
        return Ok(u32::try_from(exact).ok());
    }
    Ok(number_of(&value)
        .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= f64::from(u32::MAX))
        .map(|v| v as u32))
}

impl DeviceMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Announcement of the binary frame that follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SendBinary {
    #[serde(default, deserialize_with = "loose_length")]
    pub length: usize,
    #[serde(rename = "frontTime", default, deserialize_with = "loose_i64")]
    pub front_time: Option<i64>,
    /// Hundredths of a degree.
    #[serde(rename = "frontTemperature", default, deserialize_with = "loose_f64")]
    pub front_temperature: Option<f64>,
    #[serde(rename = "lastPart", default, deserialize_with = "loose_flag")]
    pub last_part: bool,
}

/// Device-relative history range; `to == 0` means up to the latest sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRange {
    pub from: i64,
    pub to: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub history: HistoryRange,
}

/// Outbound control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRequest {
    pub get: HistoryQuery,
}

impl ClientRequest {
    pub fn history(from: i64, to: i64) -> Self {
        Self {
            get: HistoryQuery {
                history: HistoryRange { from, to },
            },
        }
    }

    pub fn range(&self) -> HistoryRange {
        self.get.history
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
