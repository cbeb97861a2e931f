use serde_json::Value;

pub const UNKNOWN_TEMPERATURE: &str = "--";
pub const STANDBY_TEXT: &str = "STANDBY";
pub const TUNING_TEXT: &str = "TUNING";

/// Scalar status shown next to the chart and on the home view.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLabels {
    pub current_temperature: Option<f64>,
    pub heating: bool,
    pub power_text: String,
    pub standby: bool,
    pub standby_visible: bool,
    pub standby_text: String,
    pub fault: Option<u32>,
    pub tuning_visible: bool,
    pub tuning_text: String,
    pub target: Option<f64>,
    pub elapsed_text: String,
}

impl Default for StatusLabels {
    fn default() -> Self {
        Self {
            current_temperature: None,
            heating: false,
            power_text: String::new(),
            standby: false,
            standby_visible: false,
            standby_text: STANDBY_TEXT.to_string(),
            fault: None,
            tuning_visible: false,
            tuning_text: TUNING_TEXT.to_string(),
            target: None,
            elapsed_text: String::new(),
        }
    }
}

impl StatusLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature_text(&self) -> String {
        match self.current_temperature {
            Some(temperature) => format!("{temperature:.1}"),
            None => UNKNOWN_TEMPERATURE.to_string(),
        }
    }

    pub fn set_heater(&mut self, heating: bool, power: Option<f64>) {
        self.heating = heating;
        if let Some(power) = power {
            self.power_text = format!("{power:.1}%");
        }
    }

    pub fn set_standby(&mut self, standby: bool) {
        self.standby = standby;
        self.standby_visible = standby;
    }

    /// A fault always shows, replacing the standby text.
    pub fn set_fault(&mut self, code: u32) {
        self.fault = Some(code);
        self.standby_text = format!("FAULT: 0x{code:X}");
        self.standby_visible = true;
    }

    /// Empty string, `0` and `false` hide the label; zero-like values leave the
    /// previous text in place.
    pub fn set_tuning(&mut self, value: &Value) {
        self.tuning_visible = !is_loosely_empty(value);
        if !is_zero_like(value) {
            let shown = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            self.tuning_text = format!("{TUNING_TEXT}:{shown}");
        }
    }

    /// Everything back to unknown after the link dropped.
    pub fn reset_unknown(&mut self) {
        let target = self.target;
        *self = Self::default();
        self.target = target;
    }
}

fn is_loosely_empty(value: &Value) -> bool {
    match value {
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Bool(flag) => !flag,
        _ => false,
    }
}

fn is_zero_like(value: &Value) -> bool {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed.is_empty() || trimmed.parse::<f64>().is_ok_and(|n| n == 0.0)
        }
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Bool(flag) => !flag,
        Value::Null => true,
        _ => false,
    }
}
