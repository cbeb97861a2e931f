use std::sync::mpsc::{self, Receiver, Sender};

pub mod websocket;
pub use websocket::WebSocketLink;

pub const DEFAULT_WS_PORT: u16 = 81;

/// Everything the device side of a link can report to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    Opened,
    Text(String),
    Binary(Vec<u8>),
    Closed,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    WebSocket,
    InProcess,
}

#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub kind: ConnectionKind,
    pub url: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::for_host("coffeepid.local", DEFAULT_WS_PORT)
    }
}

impl ConnectionConfig {
    pub fn for_host(host: &str, port: u16) -> Self {
        Self {
            kind: ConnectionKind::WebSocket,
            url: format!("ws://{host}:{port}/"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConnectionError {
    #[error("send failed")]
    SendFailed,
    #[error("receive failed")]
    RecvFailed,
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    #[error("{0:?} links cannot be opened by url")]
    Unsupported(ConnectionKind),
}

/// A message-oriented channel to the device: text frames out, [`LinkEvent`]s in.
pub trait DeviceLink: Send {
    fn send_text(&self, text: String) -> Result<(), ConnectionError>;
    fn try_recv(&self) -> Result<Option<LinkEvent>, ConnectionError>;
    /// Requests a close; a [`LinkEvent::Closed`] follows once the link is down.
    fn close(&self);
}

/// Link whose device side lives in the same process, used by simulations and tests.
#[derive(Debug)]
pub struct InProcessLink {
    outbound: Sender<String>,
    inbound: Receiver<LinkEvent>,
    loopback: Sender<LinkEvent>,
}

/// The device half of an [`InProcessLink`].
#[derive(Debug)]
pub struct DeviceEnd {
    events: Sender<LinkEvent>,
    requests: Receiver<String>,
}

impl InProcessLink {
    pub fn pair() -> (Self, DeviceEnd) {
        let (outbound, requests) = mpsc::channel();
        let (events, inbound) = mpsc::channel();
        let link = Self {
            outbound,
            inbound,
            loopback: events.clone(),
        };
        (link, DeviceEnd { events, requests })
    }
}

impl DeviceLink for InProcessLink {
    fn send_text(&self, text: String) -> Result<(), ConnectionError> {
        self.outbound
            .send(text)
            .map_err(|_| ConnectionError::SendFailed)
    }

    fn try_recv(&self) -> Result<Option<LinkEvent>, ConnectionError> {
        match self.inbound.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(ConnectionError::RecvFailed),
        }
    }

    fn close(&self) {
        let _ = self.loopback.send(LinkEvent::Closed);
    }
}

impl DeviceEnd {
    pub fn send(&self, event: LinkEvent) -> Result<(), ConnectionError> {
        self.events
            .send(event)
            .map_err(|_| ConnectionError::SendFailed)
    }

    pub fn send_text(&self, text: impl Into<String>) -> Result<(), ConnectionError> {
        self.send(LinkEvent::Text(text.into()))
    }

    pub fn try_recv(&self) -> Result<Option<String>, ConnectionError> {
        match self.requests.try_recv() {
            Ok(text) => Ok(Some(text)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(ConnectionError::RecvFailed),
        }
    }

    pub fn drain(&self) -> Vec<String> {
        let mut requests = Vec::new();
        while let Ok(Some(text)) = self.try_recv() {
            requests.push(text);
        }
        requests
    }
}

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn create(config: &ConnectionConfig) -> Result<Box<dyn DeviceLink>, ConnectionError> {
        match config.kind {
            ConnectionKind::WebSocket => Ok(Box::new(WebSocketLink::connect(&config.url)?)),
            ConnectionKind::InProcess => Err(ConnectionError::Unsupported(config.kind)),
        }
    }
}
