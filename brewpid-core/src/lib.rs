pub mod app_state;
pub mod clock;
pub mod ingest;
pub mod labels;
pub mod live_feed;
pub mod projector;
pub mod route;
pub mod sample_buffer;
pub mod timers;
pub mod view_window;
pub mod wire;

pub use app_state::AppState;
pub use clock::{format_elapsed, DeviceClock};
pub use ingest::{BackfillTransfer, IngestOutcome, RejectReason, RECORD_SIZE};
pub use labels::StatusLabels;
pub use live_feed::{handle_binary_frame, handle_device_message, on_backfill_timeout, FeedOutcome};
pub use projector::{project, ChartFrame, SeriesPoint};
pub use route::Route;
pub use sample_buffer::{PowerSample, Sample, SampleBuffer};
pub use timers::{TimerKind, Timers};
pub use view_window::{
    AxisProjection, GestureOutcome, GestureState, LinearAxis, PlotPoint, PlotRect, PointerButton,
    Touch, ViewWindow,
};
pub use wire::{ClientRequest, DeviceMessage, HistoryRange, SendBinary};
