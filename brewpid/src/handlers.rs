use crate::commands::*;
use crate::output::*;
use brewpid_cli::{
    run_watch, PidParameters, SettingsAction, SettingsClient, WatchEvent, WatchOptions, WifiMode,
};
use dashboard_config::{ClientConfig, DisplayConfig, KeyValueStore};
use std::path::Path;
use std::time::{Duration, SystemTime};

const DEFAULT_STORE_FILE: &str = "brewpid-display.json";

/// Loads the client config and applies command-line overrides.
fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::load_or_default(&cli.config)?;
    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if config.store_path.is_none() {
        config.store_path = Some(cli.config.with_file_name(DEFAULT_STORE_FILE));
    }
    Ok(config.validate()?)
}

pub fn handle_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command, &cli.config, &cli);
    }
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            print_error(&format!("Failed to load {}: {err}", cli.config.display()));
            return Err(err);
        }
    };
    match cli.command {
        Commands::Watch {
            view,
            duration_seconds,
            frames,
        } => handle_watch(&config, view, duration_seconds, frames)?,
        Commands::Settings => {
            let client = SettingsClient::new(config.http_base_url());
            match client.get_settings() {
                Ok(settings) => print_settings(&settings),
                Err(err) => print_error(&err.to_string()),
            }
        }
        Commands::Wifis => {
            let client = SettingsClient::new(config.http_base_url());
            match client.get_wifis() {
                Ok(list) => print_wifi_list(&list),
                Err(err) => print_error(&err.to_string()),
            }
        }
        Commands::Set { command } => handle_set_command(&config, command),
        Commands::ChartConfig {
            show_temperature,
            show_power,
            show_mean_power,
            window_minutes,
        } => handle_chart_config(
            &config,
            show_temperature,
            show_power,
            show_mean_power,
            window_minutes,
        )?,
        Commands::Config { .. } => {}
    }
    Ok(())
}

fn handle_config_command(
    command: &ConfigCommands,
    path: &Path,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        ConfigCommands::Show => match load_config(cli) {
            Ok(config) => print_client_config(&config),
            Err(err) => print_error(&err.to_string()),
        },
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                print_error(&format!(
                    "{} already exists, use --force to overwrite",
                    path.display()
                ));
                return Ok(());
            }
            let mut config = ClientConfig::default();
            if let Some(host) = &cli.host {
                config.host = host.clone();
            }
            config.save_to_file(path)?;
            print_info(&format!("Wrote {}", path.display()));
        }
    }
    Ok(())
}

fn handle_watch(
    config: &ClientConfig,
    view: ViewArg,
    duration_seconds: Option<u64>,
    frames: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = WatchOptions {
        route: view.route().hash().to_string(),
        duration: duration_seconds.map(Duration::from_secs),
    };
    print_info(&format!("Watching {}", config.ws_url()));
    run_watch(config, &options, |event| match event {
        WatchEvent::Status(status) => print_status(&status),
        WatchEvent::Frame(frame) => {
            if frames {
                print_frame(&frame);
            }
        }
        WatchEvent::Settings(settings) => print_settings(&settings),
        WatchEvent::SettingsError(err) => print_error(&format!("Settings unavailable: {err}")),
    })?;
    Ok(())
}

fn handle_set_command(config: &ClientConfig, command: SetCommands) {
    let action = match command {
        SetCommands::Target { celsius } => SettingsAction::TargetTemperature(celsius),
        SetCommands::Pid {
            kp,
            ki,
            kd,
            dt,
            pwm_period,
        } => SettingsAction::Pid(PidParameters {
            kp,
            ki,
            kd,
            dt,
            pwm_period,
        }),
        SetCommands::WifiClient { ssid, password } => {
            SettingsAction::WifiClient { ssid, password }
        }
        SetCommands::WifiAp { ssid, password } => SettingsAction::WifiAp { ssid, password },
        SetCommands::WifiMode { mode } => SettingsAction::WifiMode(match mode {
            WifiModeArg::Client => WifiMode::Client,
            WifiModeArg::Ap => WifiMode::Ap,
        }),
        SetCommands::Reboot => SettingsAction::Reboot,
        SetCommands::Autotune => SettingsAction::StartAutotune,
    };
    let client = SettingsClient::new(config.http_base_url());
    match client.post(&action) {
        Ok(()) => print_info("Settings sent"),
        Err(err) => print_error(&err.to_string()),
    }
}

fn handle_chart_config(
    config: &ClientConfig,
    show_temperature: Option<bool>,
    show_power: Option<bool>,
    show_mean_power: Option<bool>,
    window_minutes: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = &config.store_path else {
        print_error("No display settings store configured");
        return Ok(());
    };
    let mut store = KeyValueStore::open(path)?;
    let now = SystemTime::now();
    let mut display = DisplayConfig::load(&store, now);
    let changed = show_temperature.is_some()
        || show_power.is_some()
        || show_mean_power.is_some()
        || window_minutes.is_some();
    if let Some(value) = show_temperature {
        display.show_temperature = value;
    }
    if let Some(value) = show_power {
        display.show_power = value;
    }
    if let Some(value) = show_mean_power {
        display.show_mean_power = value;
    }
    if let Some(minutes) = window_minutes {
        display = match display.with_window_minutes(minutes) {
            Ok(display) => display,
            Err(err) => {
                print_error(&err.to_string());
                return Ok(());
            }
        };
    }
    if changed {
        display.save(&mut store, now)?;
    }
    print_display_config(&display);
    Ok(())
}
