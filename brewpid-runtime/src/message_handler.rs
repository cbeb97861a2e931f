use brewpid_core::app_state::{IS_ALIVE_TIMEOUT_MS, RECONNECT_DELAY_MS};
use brewpid_core::{
    AppState, GestureState, LinearAxis, PlotPoint, PlotRect, PointerButton, Route, StatusLabels,
    Touch,
};
use dashboard_config::{ClientConfig, DisplayConfig};

#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub retention_ms: i64,
    pub plot_width_px: u32,
    pub reconnect_delay_ms: i64,
    pub alive_timeout_ms: i64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            retention_ms: 3_600_000,
            plot_width_px: 600,
            reconnect_delay_ms: RECONNECT_DELAY_MS,
            alive_timeout_ms: IS_ALIVE_TIMEOUT_MS,
        }
    }
}

impl DashboardSettings {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            retention_ms: config.retention_ms(),
            plot_width_px: config.plot_width_px,
            reconnect_delay_ms: i64::try_from(config.reconnect_delay_ms).unwrap_or(i64::MAX),
            alive_timeout_ms: i64::try_from(config.alive_timeout_ms).unwrap_or(i64::MAX),
        }
    }
}

/// Input to the dashboard loop from the renderer and the page around it.
#[derive(Debug, Clone)]
pub enum DashboardMessage {
    Navigate(String),
    Visibility(bool),
    Resize(u32),
    PointerDown {
        point: PlotPoint,
        button: PointerButton,
        rect: PlotRect,
    },
    PointerMove {
        point: PlotPoint,
        rect: PlotRect,
        axis: LinearAxis,
    },
    PointerUp,
    TouchStart(Vec<Touch>),
    TouchMove {
        touches: Vec<Touch>,
        scale: Option<f64>,
        axis: LinearAxis,
    },
    TouchEnd(Vec<u64>),
    SetDisplayConfig(DisplayConfig),
    Shutdown,
}

/// What the dashboard shows apart from the chart itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStatus {
    pub labels: StatusLabels,
    pub route: Route,
    pub link_open: bool,
    pub buffered: usize,
    pub backfill_pending: bool,
    pub gesture: GestureState,
    pub live: bool,
    pub display: DisplayConfig,
}

impl DashboardStatus {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            labels: state.labels.clone(),
            route: state.route,
            link_open: state.link_open,
            buffered: state.buffer.len(),
            backfill_pending: state.chart_updating,
            gesture: state.window.state(),
            live: state.window.is_live(),
            display: state.display,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Status(DashboardStatus),
    /// The device announced a configuration change; settings should be fetched again.
    SettingsChanged,
}
