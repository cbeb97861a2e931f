use crate::{ConnectionError, DeviceLink, LinkEvent};
use futures_util::{SinkExt, StreamExt};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::Message};

enum Outbound {
    Text(String),
    Close,
}

/// WebSocket link driven by a dedicated I/O thread.
///
/// The socket runs on a current-thread tokio runtime; frames cross into the
/// caller's thread through a std channel so the dashboard loop can keep polling.
pub struct WebSocketLink {
    outbound: UnboundedSender<Outbound>,
    inbound: Receiver<LinkEvent>,
}

impl WebSocketLink {
    pub fn connect(url: &str) -> Result<Self, ConnectionError> {
        let (outbound, outbound_rx) = unbounded_channel();
        let (inbound_tx, inbound) = mpsc::channel();
        let url = url.to_string();
        log::info!("Connecting to {url}");
        thread::Builder::new()
            .name("brewpid-link".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        let _ = inbound_tx.send(LinkEvent::Error(err.to_string()));
                        let _ = inbound_tx.send(LinkEvent::Closed);
                        return;
                    }
                };
                runtime.block_on(run_link(url, outbound_rx, inbound_tx));
            })
            .map_err(|err| ConnectionError::ConnectFailed(err.to_string()))?;
        Ok(Self { outbound, inbound })
    }
}

async fn run_link(
    url: String,
    mut outbound_rx: UnboundedReceiver<Outbound>,
    inbound_tx: Sender<LinkEvent>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(err) => {
            log::warn!("WebSocket connect to {url} failed: {err}");
            let _ = inbound_tx.send(LinkEvent::Error(err.to_string()));
            let _ = inbound_tx.send(LinkEvent::Closed);
            return;
        }
    };
    let _ = inbound_tx.send(LinkEvent::Opened);
    let (mut ws_tx, mut ws_rx) = stream.split();

    loop {
        tokio::select! {
            outbound = outbound_rx.recv() => match outbound {
                Some(Outbound::Text(text)) => {
                    if let Err(err) = ws_tx.send(Message::Text(text.into())).await {
                        let _ = inbound_tx.send(LinkEvent::Error(err.to_string()));
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                }
            },
            incoming = ws_rx.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let _ = inbound_tx.send(LinkEvent::Text(text.to_string()));
                }
                Some(Ok(Message::Binary(data))) => {
                    let _ = inbound_tx.send(LinkEvent::Binary(data.to_vec()));
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    log::warn!("WebSocket error: {err}");
                    let _ = inbound_tx.send(LinkEvent::Error(err.to_string()));
                    break;
                }
            }
        }
    }

    log::info!("Disconnected from {url}");
    let _ = inbound_tx.send(LinkEvent::Closed);
}

impl DeviceLink for WebSocketLink {
    fn send_text(&self, text: String) -> Result<(), ConnectionError> {
        self.outbound
            .send(Outbound::Text(text))
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
        let _ = self.outbound.send(Outbound::Close);
    }
}

impl Drop for WebSocketLink {
    fn drop(&mut self) {
        let _ = self.outbound.send(Outbound::Close);
    }
}
