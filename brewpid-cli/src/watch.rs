use crate::client::{SettingsClient, SettingsError};
use crate::protocol::DeviceSettings;
use brewpid_core::ChartFrame;
use brewpid_runtime::{
    DashboardEvent, DashboardService, DashboardSettings, DashboardStatus, FrameChannel,
    LinkFactory,
};
use connection::{ConnectionConfig, ConnectionFactory};
use dashboard_config::{ClientConfig, DisplayConfig, KeyValueStore};
use std::sync::mpsc;
use std::time::{Duration, Instant, SystemTime};

/// Everything a watch session reports to its caller.
#[derive(Debug)]
pub enum WatchEvent {
    Status(DashboardStatus),
    Frame(ChartFrame),
    Settings(DeviceSettings),
    SettingsError(SettingsError),
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub route: String,
    /// Stop after this long; `None` runs until the loop stops.
    pub duration: Option<Duration>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            route: "#home".to_string(),
            duration: None,
        }
    }
}

fn websocket_factory(config: &ClientConfig) -> LinkFactory {
    let link_config = ConnectionConfig::for_host(&config.host, config.ws_port);
    Box::new(move || ConnectionFactory::create(&link_config))
}

fn open_store(config: &ClientConfig) -> Option<KeyValueStore> {
    let path = config.store_path.as_ref()?;
    match KeyValueStore::open(path) {
        Ok(store) => Some(store),
        Err(err) => {
            log::warn!("Display settings store {} unusable: {err}", path.display());
            None
        }
    }
}

fn fetch_settings(client: &SettingsClient) -> WatchEvent {
    match client.get_settings() {
        Ok(settings) => WatchEvent::Settings(settings),
        Err(err) => WatchEvent::SettingsError(err),
    }
}

/// Connects to the device and streams dashboard updates to `on_event`.
///
/// Settings are fetched once at start and again whenever the device announces
/// a configuration change.
pub fn run_watch<F>(
    config: &ClientConfig,
    options: &WatchOptions,
    mut on_event: F,
) -> Result<(), String>
where
    F: FnMut(WatchEvent),
{
    let store = open_store(config);
    let display = store
        .as_ref()
        .map(|store| DisplayConfig::load(store, SystemTime::now()))
        .unwrap_or_default();
    let (frame_tx, frame_rx) = mpsc::channel();
    let service = DashboardService::new(
        DashboardSettings::from_config(config),
        display,
        websocket_factory(config),
        Box::new(FrameChannel::new(frame_tx)),
        store,
    )?;
    service.navigate(&options.route);

    let client = SettingsClient::new(config.http_base_url());
    on_event(fetch_settings(&client));

    let start = Instant::now();
    loop {
        if let Some(limit) = options.duration {
            if start.elapsed() >= limit {
                break;
            }
        }
        let result = service.run_for_duration(Duration::from_millis(100), |event| match event {
            DashboardEvent::Status(status) => on_event(WatchEvent::Status(status)),
            DashboardEvent::SettingsChanged => on_event(fetch_settings(&client)),
        });
        let stopped = result.is_err();
        if let Err(err) = result {
            log::info!("{err}");
        }
        // Only the newest frame matters to a terminal viewer.
        if let Some(frame) = frame_rx.try_iter().last() {
            on_event(WatchEvent::Frame(frame));
        }
        if stopped {
            break;
        }
    }
    service.shutdown();
    Ok(())
}
