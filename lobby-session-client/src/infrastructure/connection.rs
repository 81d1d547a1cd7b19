use crate::error::{ClientError, Result};
use tokio::sync::mpsc;
use tracing::debug;

/// What happened on a socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEventKind {
    /// Handshake finished, frames may be sent
    Opened,

    /// A text frame arrived
    Text(String),

    /// The remote side (or the network) closed the socket
    Closed { code: Option<u16>, reason: String },

    /// The socket could not be opened at all
    Failed(String),
}

/// A socket event, tagged with the connection it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEvent {
    pub generation: u64,
    pub kind: SocketEventKind,
}

impl SocketEvent {
    pub fn new(generation: u64, kind: SocketEventKind) -> Self {
        Self { generation, kind }
    }
}

/// Instructions for a socket's writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Text(String),
    Close,
}

/// Opens sockets (allows mocking in tests)
pub trait Connector: Send + Sync {
    /// Start opening a socket to `endpoint`.
    ///
    /// Everything that happens on the socket is reported on `events`,
    /// tagged with `generation`. Must be called inside a tokio runtime.
    fn open(
        &self,
        endpoint: &str,
        generation: u64,
        events: mpsc::Sender<SocketEvent>,
    ) -> ConnectionHandle;
}

/// Owning handle to one socket. Dropping it closes the socket without
/// reporting a close event.
#[derive(Debug)]
pub struct ConnectionHandle {
    generation: u64,
    outgoing: mpsc::UnboundedSender<Outgoing>,
}

impl ConnectionHandle {
    pub fn new(generation: u64, outgoing: mpsc::UnboundedSender<Outgoing>) -> Self {
        Self {
            generation,
            outgoing,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queue a text frame for the writer
    pub fn send_text(&self, text: String) -> Result<()> {
        self.outgoing
            .send(Outgoing::Text(text))
            .map_err(|_| ClientError::NotConnected)
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        debug!("Closing connection #{}", self.generation);
        let _ = self.outgoing.send(Outgoing::Close);
    }
}
