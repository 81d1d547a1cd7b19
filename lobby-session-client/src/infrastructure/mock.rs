use crate::infrastructure::connection::{
    ConnectionHandle, Connector, Outgoing, SocketEvent, SocketEventKind,
};
use lobby_session_core::InboundFrame;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// One socket opened through [`MockConnector`]
#[derive(Debug)]
struct MockSocket {
    endpoint: String,
    generation: u64,
    events: mpsc::Sender<SocketEvent>,
    outgoing: mpsc::UnboundedReceiver<Outgoing>,
    sent: Vec<String>,
    closed: bool,
}

impl MockSocket {
    /// Move everything the client wrote so far into `sent`
    fn collect(&mut self) {
        while let Ok(out) = self.outgoing.try_recv() {
            match out {
                Outgoing::Text(text) => self.sent.push(text),
                Outgoing::Close => self.closed = true,
            }
        }
    }

    fn push(&self, kind: SocketEventKind) {
        let _ = self.events.try_send(SocketEvent::new(self.generation, kind));
    }
}

#[derive(Debug, Default)]
struct MockState {
    sockets: Vec<MockSocket>,
    hold_open: bool,
}

/// In-memory connector for tests: plays the server side of every socket
/// the client opens.
///
/// Sockets are indexed in the order they were opened. By default each
/// socket reports `Opened` right away.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep new sockets connecting until [`MockConnector::open_socket`]
    pub fn hold_open(self) -> Self {
        self.lock().hold_open = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn with_socket<T>(&self, index: usize, f: impl FnOnce(&mut MockSocket) -> T) -> Option<T> {
        self.lock().sockets.get_mut(index).map(f)
    }

    /// Number of sockets opened so far
    pub fn connection_count(&self) -> usize {
        self.lock().sockets.len()
    }

    /// Index of the most recently opened socket
    pub fn latest(&self) -> Option<usize> {
        self.connection_count().checked_sub(1)
    }

    pub fn endpoint(&self, index: usize) -> Option<String> {
        self.with_socket(index, |s| s.endpoint.clone())
    }

    /// Finish the handshake of a held socket
    pub fn open_socket(&self, index: usize) {
        self.with_socket(index, |s| s.push(SocketEventKind::Opened));
    }

    /// Raw text frames the client wrote on socket `index`
    pub fn sent_text(&self, index: usize) -> Vec<String> {
        self.with_socket(index, |s| {
            s.collect();
            s.sent.clone()
        })
        .unwrap_or_default()
    }

    /// Frames the client wrote on socket `index`, parsed as JSON
    pub fn sent_frames(&self, index: usize) -> Vec<Value> {
        self.sent_text(index)
            .iter()
            .filter_map(|text| serde_json::from_str(text).ok())
            .collect()
    }

    /// Whether the client closed socket `index`
    pub fn is_closed(&self, index: usize) -> bool {
        self.with_socket(index, |s| {
            s.collect();
            s.closed
        })
        .unwrap_or(false)
    }

    /// Deliver a raw text frame on socket `index`
    pub fn push_text(&self, index: usize, text: impl Into<String>) {
        let text = text.into();
        self.with_socket(index, |s| s.push(SocketEventKind::Text(text)));
    }

    /// Deliver a server frame on socket `index`
    pub fn push_frame(&self, index: usize, frame: &InboundFrame) {
        if let Ok(text) = frame.to_json() {
            self.push_text(index, text);
        }
    }

    /// Close socket `index` from the server side
    pub fn close(&self, index: usize, code: Option<u16>) {
        self.with_socket(index, |s| {
            s.push(SocketEventKind::Closed {
                code,
                reason: String::new(),
            })
        });
    }

    /// Fail socket `index` as if the server were unreachable
    pub fn fail(&self, index: usize, reason: &str) {
        self.with_socket(index, |s| s.push(SocketEventKind::Failed(reason.to_string())));
    }
}

impl Connector for MockConnector {
    fn open(
        &self,
        endpoint: &str,
        generation: u64,
        events: mpsc::Sender<SocketEvent>,
    ) -> ConnectionHandle {
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let mut state = self.lock();

        let socket = MockSocket {
            endpoint: endpoint.to_string(),
            generation,
            events,
            outgoing: outgoing_rx,
            sent: Vec::new(),
            closed: false,
        };
        if !state.hold_open {
            socket.push(SocketEventKind::Opened);
        }
        state.sockets.push(socket);

        ConnectionHandle::new(generation, outgoing_tx)
    }
}
