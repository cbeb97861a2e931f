use crate::clock::{format_elapsed, DeviceClock};
use crate::ingest::BackfillTransfer;
use crate::labels::StatusLabels;
use crate::projector::{project, ChartFrame, Projection};
use crate::route::Route;
use crate::sample_buffer::SampleBuffer;
use crate::timers::{TimerKind, Timers};
use crate::view_window::ViewWindow;
use dashboard_config::DisplayConfig;

pub const IS_ALIVE_TIMEOUT_MS: i64 = 10_000;
pub const ELAPSED_LABEL_PERIOD_MS: i64 = 1_000;
pub const RECONNECT_DELAY_MS: i64 = 2_000;

/// All dashboard state, owned by the event loop and handed to handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub buffer: SampleBuffer,
    pub clock: DeviceClock,
    pub transfer: BackfillTransfer,
    pub window: ViewWindow,
    pub display: DisplayConfig,
    pub labels: StatusLabels,
    pub timers: Timers,
    pub route: Route,
    pub page_visible: bool,
    /// A backfill request is outstanding.
    pub chart_updating: bool,
    pub plot_width_px: u32,
    pub link_open: bool,
    pub last_event_at: i64,
    pub alive_timeout_ms: i64,
}

impl AppState {
    pub fn new(retention_ms: i64, display: DisplayConfig, plot_width_px: u32) -> Self {
        Self {
            buffer: SampleBuffer::new(retention_ms),
            clock: DeviceClock::new(),
            transfer: BackfillTransfer::default(),
            window: ViewWindow::new(display.window_ms()),
            display,
            labels: StatusLabels::new(),
            timers: Timers::new(),
            route: Route::Home,
            page_visible: true,
            chart_updating: false,
            plot_width_px,
            link_open: false,
            last_event_at: 0,
            alive_timeout_ms: IS_ALIVE_TIMEOUT_MS,
        }
    }

    pub fn chart_visible(&self) -> bool {
        self.page_visible && self.route == Route::Chart
    }

    /// Whether a freshly appended sample should be drawn right away.
    pub fn should_render_live(&self) -> bool {
        self.chart_visible() && self.window.is_following()
    }

    pub fn set_display_config(&mut self, display: DisplayConfig) {
        self.display = display;
        self.window.set_width_ms(display.window_ms());
    }

    /// Gestures change the width; carry it back into the persisted config.
    pub fn sync_window_width(&mut self) {
        self.display.set_window_ms(self.window.width_ms());
    }

    pub fn begin_backfill(&mut self, now: i64, timeout_ms: i64) {
        self.chart_updating = true;
        self.timers
            .schedule_once(TimerKind::BackfillSafety, now, timeout_ms);
    }

    /// Drops any outstanding backfill together with its safety timer.
    pub fn cancel_backfill(&mut self) {
        self.chart_updating = false;
        self.transfer.reset();
        self.timers.cancel(TimerKind::BackfillSafety);
    }

    pub fn link_opened(&mut self, now: i64) {
        self.link_open = true;
        self.last_event_at = now;
        self.timers.cancel(TimerKind::Reconnect);
        self.timers
            .schedule_every(TimerKind::AliveCheck, now, self.alive_timeout_ms / 2);
    }

    /// Link lost: everything live goes back to unknown and a reconnect is queued.
    pub fn reset_on_disconnect(&mut self, now: i64, reconnect_delay_ms: i64) {
        self.link_open = false;
        self.labels.reset_unknown();
        self.clock.reset();
        self.cancel_backfill();
        self.timers.cancel(TimerKind::AliveCheck);
        self.timers
            .schedule_once(TimerKind::Reconnect, now, reconnect_delay_ms);
    }

    /// The link has been silent for longer than the liveness timeout.
    pub fn link_stale(&self, now: i64) -> bool {
        self.link_open && now - self.last_event_at > self.alive_timeout_ms
    }

    /// Cancels the timers owned by the current view.
    pub fn teardown_view(&mut self) {
        self.timers.cancel(TimerKind::ElapsedLabel);
        // BackfillSafety stays armed: it is the only thing that clears
        // `chart_updating` when a requested transfer never arrives.
        if self.window.is_tracking_pointer() {
            self.window.pointer_up();
            self.sync_window_width();
        }
    }

    pub fn navigate(&mut self, route: Route, now: i64) {
        self.teardown_view();
        self.route = route;
        match route {
            Route::Home => {
                self.refresh_elapsed_label(now);
                self.timers
                    .schedule_every(TimerKind::ElapsedLabel, now, ELAPSED_LABEL_PERIOD_MS);
            }
            Route::Chart | Route::Settings => {}
        }
    }

    pub fn refresh_elapsed_label(&mut self, now: i64) {
        self.labels.elapsed_text = self
            .clock
            .elapsed(now)
            .map(format_elapsed)
            .unwrap_or_default();
    }

    /// Follows the buffer if live and projects the current window.
    pub fn chart_frame(&mut self) -> Option<ChartFrame> {
        let (oldest, newest) = self.buffer.bounds()?;
        self.window.follow(oldest, newest);
        Some(project(&Projection {
            buffer: &self.buffer,
            low: self.window.low(),
            high: self.window.high(),
            config: &self.display,
            plot_width_px: self.plot_width_px,
            target: self.labels.target,
        }))
    }
}
