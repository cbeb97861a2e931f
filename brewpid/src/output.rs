use brewpid_cli::protocol::SignalStrength;
use brewpid_cli::{DeviceSettings, WifiList, WifiMode};
use brewpid_core::ChartFrame;
use brewpid_runtime::DashboardStatus;
use dashboard_config::{ClientConfig, DisplayConfig};

pub fn print_info(message: &str) {
    println!("[brewpid][INFO] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[brewpid][ERROR]: {message}");
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub fn print_status(status: &DashboardStatus) {
    let labels = &status.labels;
    let link = if status.link_open { "connected" } else { "disconnected" };
    let mut line = format!(
        "{} {}C heater {}",
        link,
        labels.temperature_text(),
        on_off(labels.heating)
    );
    if !labels.power_text.is_empty() {
        line.push_str(&format!(" {}", labels.power_text));
    }
    if let Some(target) = labels.target {
        line.push_str(&format!(" target {target:.1}C"));
    }
    if labels.standby_visible {
        line.push_str(&format!(" [{}]", labels.standby_text));
    }
    if labels.tuning_visible {
        line.push_str(&format!(" [{}]", labels.tuning_text));
    }
    if !labels.elapsed_text.is_empty() {
        line.push_str(&format!(" up {}", labels.elapsed_text));
    }
    if status.backfill_pending {
        line.push_str(" (loading history)");
    }
    println!("{line}");
}

pub fn print_frame(frame: &ChartFrame) {
    println!(
        "chart {:.0}..{:.0} ms: {} temperature, {} power, {} mean power points (stride {})",
        frame.x_range.0,
        frame.x_range.1,
        frame.temperature.len(),
        frame.power.len(),
        frame.mean_power.len(),
        frame.stride
    );
}

pub fn print_settings(settings: &DeviceSettings) {
    print_info("Device settings:");
    let mode = match settings.preferred_wifi_mode {
        WifiMode::Client => "client",
        WifiMode::Ap => "access point",
    };
    println!("wifi_mode: {mode}");
    println!("access_point: {}", settings.ap_label());
    println!("client_network: {}", settings.client_ssid_label());
    println!("target_temp: {}", settings.target_temp);
    let pid = settings.pid();
    println!("pid: kp={} ki={} kd={} dt={}", pid.kp, pid.ki, pid.kd, pid.dt);
    println!("pwm_period: {}", pid.pwm_period);
}

pub fn print_wifi_list(list: &WifiList) {
    if list.wifis.is_empty() {
        print_info("No networks found");
        return;
    }
    print_info("Visible networks:");
    for wifi in &list.wifis {
        let signal = match wifi.signal() {
            SignalStrength::Poor => "poor",
            SignalStrength::Fair => "fair",
            SignalStrength::Good => "good",
        };
        let lock = if wifi.is_open() { "open" } else { "secured" };
        println!("{} ({} dBm, {signal}, {lock})", wifi.ssid, wifi.rssi);
    }
}

pub fn print_display_config(display: &DisplayConfig) {
    print_info("Chart display settings:");
    println!("show_temperature: {}", display.show_temperature);
    println!("show_power: {}", display.show_power);
    println!("show_mean_power: {}", display.show_mean_power);
    println!("window_minutes: {}", display.window_minutes);
}

pub fn print_client_config(config: &ClientConfig) {
    print_info("Client configuration:");
    println!("websocket: {}", config.ws_url());
    println!("http: {}", config.http_base_url());
    println!("retention_minutes: {}", config.retention_minutes);
    println!("plot_width_px: {}", config.plot_width_px);
    println!("reconnect_delay_ms: {}", config.reconnect_delay_ms);
    println!("alive_timeout_ms: {}", config.alive_timeout_ms);
    if let Some(path) = &config.store_path {
        println!("store_path: {}", path.display());
    }
}
