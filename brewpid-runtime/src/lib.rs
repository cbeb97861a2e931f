pub mod daemon;
pub mod message_handler;
pub mod message_processor;
pub mod renderer;
pub mod runtime;

pub use daemon::DashboardService;
pub use message_handler::{DashboardEvent, DashboardMessage, DashboardSettings, DashboardStatus};
pub use message_processor::{Action, Dashboard};
pub use renderer::{ChartRenderer, FrameChannel};
pub use runtime::{run_dashboard_current, spawn_dashboard, LinkFactory};
