use connection::{ConnectionError, DeviceLink, LinkEvent};
use dashboard_config::KeyValueStore;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::message_handler::{DashboardEvent, DashboardMessage, DashboardStatus};
use crate::message_processor::{Action, Dashboard};
use crate::renderer::ChartRenderer;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub type LinkFactory = Box<dyn FnMut() -> Result<Box<dyn DeviceLink>, ConnectionError> + Send>;

pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

struct DashboardLoop {
    dashboard: Dashboard,
    connect: LinkFactory,
    renderer: Box<dyn ChartRenderer>,
    store: Option<KeyValueStore>,
    event_tx: Sender<DashboardEvent>,
    link: Option<Box<dyn DeviceLink>>,
    last_status: Option<DashboardStatus>,
}

impl DashboardLoop {
    fn apply(&mut self, actions: Vec<Action>, now: i64) {
        let mut pending = actions;
        while !pending.is_empty() {
            let mut follow_up = Vec::new();
            for action in pending {
                match action {
                    Action::Connect => {
                        self.link = None;
                        match (self.connect)() {
                            Ok(link) => self.link = Some(link),
                            Err(err) => {
                                log::warn!("Connect failed: {err}");
                                follow_up.extend(
                                    self.dashboard.handle_link_event(LinkEvent::Closed, now),
                                );
                            }
                        }
                    }
                    Action::CloseLink => {
                        if let Some(link) = &self.link {
                            link.close();
                        }
                    }
                    Action::Send(text) => {
                        let sent = match &self.link {
                            Some(link) => link.send_text(text),
                            None => Err(ConnectionError::SendFailed),
                        };
                        if let Err(err) = sent {
                            log::warn!("Dropping outbound message: {err}");
                        }
                    }
                    Action::Render(frame) => self.renderer.render(&frame),
                    Action::FetchSettings => {
                        let _ = self.event_tx.send(DashboardEvent::SettingsChanged);
                    }
                    Action::PersistDisplayConfig(display) => {
                        if let Some(store) = self.store.as_mut() {
                            if let Err(err) = display.save(store, SystemTime::now()) {
                                log::error!("Failed to persist display config: {err}");
                            }
                        }
                    }
                }
            }
            pending = follow_up;
        }
    }

    fn poll_link(&mut self, now: i64) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut lost = false;
        if let Some(link) = &self.link {
            loop {
                match link.try_recv() {
                    Ok(Some(event)) => {
                        let closed = event == LinkEvent::Closed;
                        actions.extend(self.dashboard.handle_link_event(event, now));
                        if closed {
                            lost = true;
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        log::warn!("Link receive failed: {err}");
                        actions.extend(self.dashboard.handle_link_event(LinkEvent::Closed, now));
                        lost = true;
                        break;
                    }
                }
            }
        }
        if lost {
            self.link = None;
        }
        actions
    }

    fn publish_status(&mut self) {
        let status = DashboardStatus::from_state(self.dashboard.state());
        if self.last_status.as_ref() != Some(&status) {
            let _ = self.event_tx.send(DashboardEvent::Status(status.clone()));
            self.last_status = Some(status);
        }
    }

    fn run(mut self, rx: Receiver<DashboardMessage>) {
        let start = self.dashboard.start(now_ms());
        self.apply(start, now_ms());
        loop {
            let now = now_ms();
            let actions = self.poll_link(now);
            self.apply(actions, now);

            loop {
                match rx.try_recv() {
                    Ok(DashboardMessage::Shutdown) | Err(TryRecvError::Disconnected) => {
                        let actions = self.dashboard.handle_message(DashboardMessage::Shutdown, now);
                        self.apply(actions, now);
                        log::info!("Dashboard stopped");
                        return;
                    }
                    Ok(message) => {
                        let actions = self.dashboard.handle_message(message, now);
                        self.apply(actions, now);
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }

            let actions = self.dashboard.tick(now);
            self.apply(actions, now);
            self.publish_status();
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Starts the dashboard loop on its own thread.
pub fn spawn_dashboard(
    dashboard: Dashboard,
    connect: LinkFactory,
    renderer: Box<dyn ChartRenderer>,
    store: Option<KeyValueStore>,
) -> Result<(Sender<DashboardMessage>, Receiver<DashboardEvent>), String> {
    let (message_tx, message_rx) = mpsc::channel::<DashboardMessage>();
    let (event_tx, event_rx) = mpsc::channel::<DashboardEvent>();
    thread::Builder::new()
        .name("brewpid-dashboard".to_string())
        .spawn(move || {
            run_dashboard_current(dashboard, connect, renderer, store, message_rx, event_tx)
        })
        .map_err(|err| format!("Failed to spawn dashboard thread: {err}"))?;
    Ok((message_tx, event_rx))
}

/// Runs the dashboard loop on the calling thread until `Shutdown` arrives or
/// every sender is gone.
pub fn run_dashboard_current(
    dashboard: Dashboard,
    connect: LinkFactory,
    renderer: Box<dyn ChartRenderer>,
    store: Option<KeyValueStore>,
    message_rx: Receiver<DashboardMessage>,
    event_tx: Sender<DashboardEvent>,
) {
    DashboardLoop {
        dashboard,
        connect,
        renderer,
        store,
        event_tx,
        link: None,
        last_status: None,
    }
    .run(message_rx);
}
