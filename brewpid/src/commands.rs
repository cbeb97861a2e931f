use brewpid_core::Route;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brewpid", version, about = "Dashboard client for the CoffeePID controller")]
pub struct Cli {
    /// Client configuration file
    #[arg(long, global = true, default_value = "brewpid.toml")]
    pub config: PathBuf,
    /// Override the device host from the configuration
    #[arg(long, global = true)]
    pub host: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Stream live status from the device
    Watch {
        #[arg(long, value_enum, default_value_t = ViewArg::Home)]
        view: ViewArg,
        /// Stop after this many seconds
        #[arg(long)]
        duration_seconds: Option<u64>,
        /// Print a summary of every chart frame
        #[arg(long)]
        frames: bool,
    },
    /// Show the device settings
    Settings,
    /// List WiFi networks seen by the device
    Wifis,
    /// Change a device setting
    Set {
        #[command(subcommand)]
        command: SetCommands,
    },
    /// Show or change the chart display settings
    ChartConfig {
        #[arg(long)]
        show_temperature: Option<bool>,
        #[arg(long)]
        show_power: Option<bool>,
        #[arg(long)]
        show_mean_power: Option<bool>,
        #[arg(long)]
        window_minutes: Option<f64>,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum SetCommands {
    Target {
        celsius: f64,
    },
    Pid {
        #[arg(long)]
        kp: f64,
        #[arg(long)]
        ki: f64,
        #[arg(long)]
        kd: f64,
        #[arg(long)]
        dt: f64,
        #[arg(long)]
        pwm_period: f64,
    },
    WifiClient {
        ssid: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    WifiAp {
        ssid: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    WifiMode {
        #[arg(value_enum)]
        mode: WifiModeArg,
    },
    Reboot,
    Autotune,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show,
    /// Write a default configuration file
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Home,
    Chart,
    Settings,
}

impl ViewArg {
    pub fn route(self) -> Route {
        match self {
            ViewArg::Home => Route::Home,
            ViewArg::Chart => Route::Chart,
            ViewArg::Settings => Route::Settings,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum WifiModeArg {
    Client,
    Ap,
}
