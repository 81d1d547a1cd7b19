use crate::infrastructure::connection::{
    ConnectionHandle, Connector, Outgoing, SocketEvent, SocketEventKind,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn, Instrument};

/// Infrastructure adapter: real WebSocket via tokio-tungstenite
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    pub fn new() -> Self {
        Self
    }
}

impl Connector for WebSocketConnector {
    fn open(
        &self,
        endpoint: &str,
        generation: u64,
        events: mpsc::Sender<SocketEvent>,
    ) -> ConnectionHandle {
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let span = tracing::info_span!("lobby_socket", generation);

        tokio::spawn(
            run_socket(endpoint.to_string(), generation, outgoing_rx, events).instrument(span),
        );

        ConnectionHandle::new(generation, outgoing_tx)
    }
}

/// Reader and writer for one socket.
///
/// Reports everything the remote side does. A close requested through the
/// handle ends the task silently.
async fn run_socket(
    endpoint: String,
    generation: u64,
    mut outgoing: mpsc::UnboundedReceiver<Outgoing>,
    events: mpsc::Sender<SocketEvent>,
) {
    info!("Connecting to {}", endpoint);
    let stream = match tokio_tungstenite::connect_async(endpoint.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            error!("Failed to connect to {}: {}", endpoint, e);
            emit(&events, generation, SocketEventKind::Failed(e.to_string())).await;
            return;
        }
    };

    info!("Connected to {}", endpoint);
    if !emit(&events, generation, SocketEventKind::Opened).await {
        return;
    }

    let (mut write, mut read) = stream.split();

    loop {
        tokio::select! {
            out = outgoing.recv() => match out {
                Some(Outgoing::Text(text)) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        error!("Send failed: {}", e);
                        emit(&events, generation, SocketEventKind::Closed {
                            code: None,
                            reason: e.to_string(),
                        })
                        .await;
                        return;
                    }
                }
                Some(Outgoing::Close) | None => {
                    debug!("Closing socket on request");
                    let _ = write.send(Message::Close(None)).await;
                    let _ = write.close().await;
                    return;
                }
            },

            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if !emit(&events, generation, SocketEventKind::Text(text.to_string())).await {
                        return;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = match frame {
                        Some(frame) => (Some(u16::from(frame.code)), frame.reason.to_string()),
                        None => (None, String::new()),
                    };
                    info!("Server closed the connection (code {:?})", code);
                    emit(&events, generation, SocketEventKind::Closed { code, reason }).await;
                    return;
                }
                Some(Ok(Message::Binary(_))) => warn!("Ignoring binary frame"),
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Connection error: {}", e);
                    emit(&events, generation, SocketEventKind::Closed {
                        code: None,
                        reason: e.to_string(),
                    })
                    .await;
                    return;
                }
                None => {
                    emit(&events, generation, SocketEventKind::Closed {
                        code: None,
                        reason: "stream ended".to_string(),
                    })
                    .await;
                    return;
                }
            },
        }
    }
}

/// Report an event; `false` once nobody listens any more
async fn emit(events: &mpsc::Sender<SocketEvent>, generation: u64, kind: SocketEventKind) -> bool {
    events.send(SocketEvent::new(generation, kind)).await.is_ok()
}
