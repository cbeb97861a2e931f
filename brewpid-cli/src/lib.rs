pub mod client;
pub mod protocol;
pub mod watch;

pub use client::{SettingsClient, SettingsError};
pub use protocol::{DeviceSettings, PidParameters, SettingsAction, WifiList, WifiMode, WifiNetwork};
pub use watch::{run_watch, WatchEvent, WatchOptions};
