use brewpid_core::{LinearAxis, PlotPoint, PlotRect, PointerButton, Touch};
use dashboard_config::{DisplayConfig, KeyValueStore};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::message_handler::{DashboardEvent, DashboardMessage, DashboardSettings};
use crate::message_processor::Dashboard;
use crate::renderer::ChartRenderer;
use crate::runtime::{spawn_dashboard, LinkFactory};

/// Handle to a dashboard loop running on its own thread.
pub struct DashboardService {
    message_tx: Sender<DashboardMessage>,
    event_rx: Receiver<DashboardEvent>,
}

impl DashboardService {
    pub fn new(
        settings: DashboardSettings,
        display: DisplayConfig,
        connect: LinkFactory,
        renderer: Box<dyn ChartRenderer>,
        store: Option<KeyValueStore>,
    ) -> Result<Self, String> {
        let dashboard = Dashboard::new(settings, display);
        let (message_tx, event_rx) = spawn_dashboard(dashboard, connect, renderer, store)?;
        Ok(Self {
            message_tx,
            event_rx,
        })
    }

    pub fn send(&self, message: DashboardMessage) {
        let _ = self.message_tx.send(message);
    }

    pub fn navigate(&self, hash: &str) {
        self.send(DashboardMessage::Navigate(hash.to_string()));
    }

    pub fn set_visible(&self, visible: bool) {
        self.send(DashboardMessage::Visibility(visible));
    }

    pub fn resize(&self, plot_width_px: u32) {
        self.send(DashboardMessage::Resize(plot_width_px));
    }

    pub fn set_display_config(&self, display: DisplayConfig) {
        self.send(DashboardMessage::SetDisplayConfig(display));
    }

    pub fn pointer_down(&self, point: PlotPoint, button: PointerButton, rect: PlotRect) {
        self.send(DashboardMessage::PointerDown {
            point,
            button,
            rect,
        });
    }

    pub fn pointer_move(&self, point: PlotPoint, rect: PlotRect, axis: LinearAxis) {
        self.send(DashboardMessage::PointerMove { point, rect, axis });
    }

    pub fn pointer_up(&self) {
        self.send(DashboardMessage::PointerUp);
    }

    pub fn touch_start(&self, touches: Vec<Touch>) {
        self.send(DashboardMessage::TouchStart(touches));
    }

    pub fn touch_move(&self, touches: Vec<Touch>, scale: Option<f64>, axis: LinearAxis) {
        self.send(DashboardMessage::TouchMove {
            touches,
            scale,
            axis,
        });
    }

    pub fn touch_end(&self, ids: Vec<u64>) {
        self.send(DashboardMessage::TouchEnd(ids));
    }

    pub fn poll_event(&self) -> Option<DashboardEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn next_event(&self, timeout: Duration) -> Option<DashboardEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Feeds every event to `on_event` until `duration` has passed or the loop stopped.
    pub fn run_for_duration<F>(&self, duration: Duration, mut on_event: F) -> Result<(), String>
    where
        F: FnMut(DashboardEvent),
    {
        let start = Instant::now();
        while start.elapsed() < duration {
            let remaining = duration.saturating_sub(start.elapsed());
            match self.event_rx.recv_timeout(remaining.min(Duration::from_millis(100))) {
                Ok(event) => on_event(event),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err("Dashboard loop stopped".to_string());
                }
            }
        }
        Ok(())
    }

    pub fn shutdown(&self) {
        self.send(DashboardMessage::Shutdown);
    }
}

impl Drop for DashboardService {
    fn drop(&mut self) {
        let _ = self.message_tx.send(DashboardMessage::Shutdown);
    }
}
