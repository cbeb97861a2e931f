use brewpid_cli::protocol::{password_acceptable, SignalStrength};
use brewpid_cli::{DeviceSettings, PidParameters, SettingsAction, WifiList, WifiMode};

const SETTINGS_BODY: &str = r#"{
    "wifi_ap_ssid": "CoffeePID",
    "wifi_ap_password": "espresso1",
    "wifi_client_ssid": "",
    "preferred_wifi_mode": "client",
    "target_temp": "93.5",
    "pid_kp": 12,
    "pid_ki": "0.4",
    "pid_kd": 30.25,
    "pid_dt": 1000,
    "pwm_period": "2000"
}"#;

#[test]
fn settings_accept_numbers_sent_as_strings() {
    let settings: DeviceSettings = serde_json::from_str(SETTINGS_BODY).unwrap();
    assert_eq!(settings.target_temp, 93.5);
    assert_eq!(
        settings.pid(),
        PidParameters {
            kp: 12.0,
            ki: 0.4,
            kd: 30.25,
            dt: 1000.0,
            pwm_period: 2000.0,
        }
    );
    assert_eq!(settings.preferred_wifi_mode, WifiMode::Client);
}

#[test]
fn settings_labels_follow_device_state() {
    let mut settings: DeviceSettings = serde_json::from_str(SETTINGS_BODY).unwrap();
    assert_eq!(settings.ap_label(), "CoffeePID / espresso1");
    assert_eq!(settings.client_ssid_label(), "Select network");

    settings.wifi_ap_password.clear();
    settings.wifi_client_ssid = "HomeNet".to_string();
    assert_eq!(settings.ap_label(), "CoffeePID");
    assert_eq!(settings.client_ssid_label(), "HomeNet");
}

#[test]
fn unknown_wifi_mode_means_access_point() {
    let body = SETTINGS_BODY.replace("\"client\"", "\"mesh\"");
    let settings: DeviceSettings = serde_json::from_str(&body).unwrap();
    assert_eq!(settings.preferred_wifi_mode, WifiMode::Ap);
}

#[test]
fn non_numeric_target_is_rejected() {
    let body = SETTINGS_BODY.replace("\"93.5\"", "\"hot\"");
    assert!(serde_json::from_str::<DeviceSettings>(&body).is_err());
}

#[test]
fn wifi_scan_classifies_signal() {
    let list: WifiList = serde_json::from_str(
        r#"{"wifis":[
            {"ssid":"far","rssi":-80,"encryption":"WPA2"},
            {"ssid":"edge","rssi":-73,"encryption":"WPA2"},
            {"ssid":"near","rssi":-65,"encryption":"None"}
        ]}"#,
    )
    .unwrap();
    let signals: Vec<_> = list.wifis.iter().map(|w| w.signal()).collect();
    assert_eq!(
        signals,
        vec![SignalStrength::Poor, SignalStrength::Fair, SignalStrength::Good]
    );
    assert!(!list.wifis[0].is_open());
    assert!(list.wifis[2].is_open());
}

#[test]
fn password_rule_allows_open_or_eight_chars() {
    assert!(password_acceptable(""));
    assert!(!password_acceptable("short"));
    assert!(password_acceptable("12345678"));
}

#[test]
fn short_wifi_password_fails_validation() {
    let action = SettingsAction::WifiClient {
        ssid: "HomeNet".to_string(),
        password: "1234".to_string(),
    };
    assert!(action.validate().is_err());

    let open = SettingsAction::WifiClient {
        ssid: "Cafe".to_string(),
        password: String::new(),
    };
    assert!(open.validate().is_ok());
}

#[test]
fn access_point_needs_an_ssid() {
    let action = SettingsAction::WifiAp {
        ssid: "  ".to_string(),
        password: String::new(),
    };
    assert!(action.validate().is_err());
}

#[test]
fn form_fields_match_device_names() {
    assert_eq!(
        SettingsAction::TargetTemperature(94.0).form_fields(),
        vec![("target_temp", "94".to_string())]
    );
    assert_eq!(
        SettingsAction::Reboot.form_fields(),
        vec![("reboot", "true".to_string())]
    );
    assert_eq!(
        SettingsAction::WifiMode(WifiMode::Ap).form_fields(),
        vec![("preferred_wifi_mode", "ap".to_string())]
    );
    assert_eq!(
        SettingsAction::StartAutotune.form_fields(),
        vec![("start_pid_tune", "1".to_string())]
    );
    let pid = SettingsAction::Pid(PidParameters {
        kp: 1.5,
        ki: 0.0,
        kd: 2.0,
        dt: 100.0,
        pwm_period: 1000.0,
    });
    let names: Vec<_> = pid.form_fields().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["pid_kp", "pid_ki", "pid_kd", "pid_dt", "pwm_period"]);
}
