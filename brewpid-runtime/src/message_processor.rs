use brewpid_core::{
    handle_binary_frame, handle_device_message, on_backfill_timeout, AppState, ChartFrame,
    DeviceMessage, FeedOutcome, GestureOutcome, Route, TimerKind,
};
use connection::LinkEvent;
use dashboard_config::DisplayConfig;

use crate::message_handler::{DashboardMessage, DashboardSettings};

/// Side effects requested by the dashboard; the loop owning the link, the
/// renderer and the store carries them out.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Connect,
    CloseLink,
    Send(String),
    Render(ChartFrame),
    FetchSettings,
    PersistDisplayConfig(DisplayConfig),
}

/// Event handling over one `AppState`. Time is passed in as local
/// milliseconds so that every path can be driven from tests.
pub struct Dashboard {
    state: AppState,
    settings: DashboardSettings,
}

impl Dashboard {
    pub fn new(settings: DashboardSettings, display: DisplayConfig) -> Self {
        let mut state = AppState::new(settings.retention_ms, display, settings.plot_width_px);
        state.alive_timeout_ms = settings.alive_timeout_ms;
        Self { state, settings }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn start(&mut self, now: i64) -> Vec<Action> {
        self.state.navigate(Route::Home, now);
        vec![Action::Connect]
    }

    pub fn handle_link_event(&mut self, event: LinkEvent, now: i64) -> Vec<Action> {
        match event {
            LinkEvent::Opened => {
                log::info!("Connected");
                self.state.link_opened(now);
                Vec::new()
            }
            LinkEvent::Text(text) => {
                self.state.last_event_at = now;
                match DeviceMessage::parse(&text) {
                    Ok(message) => {
                        let outcome = handle_device_message(&mut self.state, &message, now);
                        self.feed_actions(outcome)
                    }
                    Err(err) => {
                        log::warn!("Ignoring malformed device message: {err}");
                        Vec::new()
                    }
                }
            }
            LinkEvent::Binary(frame) => {
                self.state.last_event_at = now;
                let (_, outcome) = handle_binary_frame(&mut self.state, &frame);
                self.feed_actions(outcome)
            }
            LinkEvent::Error(err) => {
                log::warn!("Link error: {err}");
                Vec::new()
            }
            LinkEvent::Closed => {
                if !self.state.link_open && self.state.timers.is_armed(TimerKind::Reconnect) {
                    return Vec::new();
                }
                log::info!("Disconnected");
                self.state
                    .reset_on_disconnect(now, self.settings.reconnect_delay_ms);
                Vec::new()
            }
        }
    }

    pub fn handle_message(&mut self, message: DashboardMessage, now: i64) -> Vec<Action> {
        match message {
            DashboardMessage::Navigate(hash) => {
                let route = Route::resolve(&hash);
                let was_dragging = self.state.window.is_tracking_pointer();
                self.state.navigate(route, now);
                let mut actions = Vec::new();
                if was_dragging {
                    actions.push(Action::PersistDisplayConfig(self.state.display));
                }
                actions.extend(self.render_if_visible());
                actions
            }
            DashboardMessage::Visibility(visible) => {
                self.state.page_visible = visible;
                self.render_if_visible().into_iter().collect()
            }
            DashboardMessage::Resize(plot_width_px) => {
                self.state.plot_width_px = plot_width_px;
                self.render_if_visible().into_iter().collect()
            }
            DashboardMessage::PointerDown {
                point,
                button,
                rect,
            } => {
                let bounds = self.state.buffer.bounds();
                self.state.window.pointer_down(point, button, &rect, bounds);
                Vec::new()
            }
            DashboardMessage::PointerMove { point, rect, axis } => {
                let bounds = self.state.buffer.bounds();
                let outcome = self.state.window.pointer_move(point, &rect, &axis, bounds);
                self.gesture_actions(outcome)
            }
            DashboardMessage::PointerUp => {
                let outcome = self.state.window.pointer_up();
                self.gesture_actions(outcome)
            }
            DashboardMessage::TouchStart(touches) => {
                let bounds = self.state.buffer.bounds();
                self.state.window.touch_start(&touches, bounds);
                Vec::new()
            }
            DashboardMessage::TouchMove {
                touches,
                scale,
                axis,
            } => {
                let bounds = self.state.buffer.bounds();
                let outcome = self.state.window.touch_move(&touches, scale, &axis, bounds);
                self.gesture_actions(outcome)
            }
            DashboardMessage::TouchEnd(ids) => {
                let outcome = self.state.window.touch_end(&ids);
                self.gesture_actions(outcome)
            }
            DashboardMessage::SetDisplayConfig(display) => {
                self.state.set_display_config(display);
                let mut actions = vec![Action::PersistDisplayConfig(display)];
                actions.extend(self.render_if_visible());
                actions
            }
            DashboardMessage::Shutdown => vec![Action::CloseLink],
        }
    }

    /// Fires due timers.
    pub fn tick(&mut self, now: i64) -> Vec<Action> {
        let mut actions = Vec::new();
        for kind in self.state.timers.take_due(now) {
            match kind {
                TimerKind::AliveCheck => {
                    if self.state.link_stale(now) {
                        log::warn!("Device silent for too long, reconnecting");
                        self.state.labels.current_temperature = None;
                        self.state.labels.heating = false;
                        actions.push(Action::CloseLink);
                    }
                }
                TimerKind::ElapsedLabel => self.state.refresh_elapsed_label(now),
                TimerKind::BackfillSafety => on_backfill_timeout(&mut self.state),
                TimerKind::Reconnect => actions.push(Action::Connect),
            }
        }
        actions
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.state.timers.next_due()
    }

    fn feed_actions(&mut self, outcome: FeedOutcome) -> Vec<Action> {
        let mut actions = Vec::new();
        for request in outcome.requests {
            match request.to_json() {
                Ok(json) => actions.push(Action::Send(json)),
                Err(err) => log::error!("Failed to encode history request: {err}"),
            }
        }
        if outcome.render {
            actions.extend(self.render());
        }
        if outcome.refetch_settings {
            actions.push(Action::FetchSettings);
        }
        actions
    }

    fn gesture_actions(&mut self, outcome: GestureOutcome) -> Vec<Action> {
        let mut actions = Vec::new();
        if outcome.ended {
            self.state.sync_window_width();
            actions.push(Action::PersistDisplayConfig(self.state.display));
        }
        if outcome.redraw {
            actions.extend(self.render_if_visible());
        }
        actions
    }

    fn render(&mut self) -> Option<Action> {
        self.state.chart_frame().map(Action::Render)
    }

    fn render_if_visible(&mut self) -> Option<Action> {
        if self.state.chart_visible() {
            self.render()
        } else {
            None
        }
    }
}
