use crate::application::ClientConfig;
use crate::error::{ClientError, Result};
use crate::infrastructure::{ConnectionHandle, Connector, SocketEvent, SocketEventKind, TokenStore};
use instant::Instant;
use lobby_session_core::protocol::decode;
use lobby_session_core::{
    ClientFrame, JoinOutcome, LobbyAction, LobbyId, Notice, NoticeLevel, OutboundFrame,
    RequestId, SessionEffect, SessionMachine, SessionState,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

/// Read-only view of a manager (cheap to clone)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// A socket is open and authenticated frames may be sent
    pub connected: bool,
    /// A token is cached, so `connect()` would open a socket
    pub has_token: bool,
}

/// A join request waiting for the server's answer
#[derive(Debug)]
pub struct PendingJoin {
    pub request_id: RequestId,
    outcome: oneshot::Receiver<JoinOutcome>,
}

impl PendingJoin {
    /// Wait for the answer. Resolves `Disconnected` if the manager goes away.
    pub async fn wait(self) -> JoinOutcome {
        self.outcome.await.unwrap_or(JoinOutcome::Disconnected)
    }

    /// The answer, if it is already there
    pub fn try_outcome(&mut self) -> Option<JoinOutcome> {
        match self.outcome.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(JoinOutcome::Disconnected),
        }
    }
}

struct ActiveConnection {
    handle: ConnectionHandle,
    /// Token the authentication frame will carry
    token: String,
    open: bool,
}

/// Owns the WebSocket connection and the session state machine.
///
/// Socket events are processed one at a time to completion, through
/// [`SessionManager::next_event`] or [`SessionManager::pump`]. Dropping the
/// manager closes the socket without any UI-visible effect.
pub struct SessionManager {
    config: ClientConfig,
    machine: SessionMachine,
    store: Arc<dyn TokenStore>,
    connector: Arc<dyn Connector>,

    /// Cached token, follows every change made through the store
    token: Option<String>,
    token_rx: watch::Receiver<Option<String>>,
    token_watch_open: bool,

    connection: Option<ActiveConnection>,
    generation: u64,
    events_tx: mpsc::Sender<SocketEvent>,
    events_rx: mpsc::Receiver<SocketEvent>,

    join_waiters: HashMap<RequestId, oneshot::Sender<JoinOutcome>>,
    notices: Vec<Notice>,
}

impl SessionManager {
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(config.event_buffer.max(1));
        let mut token_rx = store.subscribe();
        let token = token_rx.borrow_and_update().clone();

        Self {
            machine: SessionMachine::new(config.max_pending_joins),
            config,
            store,
            connector,
            token,
            token_rx,
            token_watch_open: true,
            connection: None,
            generation: 0,
            events_tx,
            events_rx,
            join_waiters: HashMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        self.machine.state()
    }

    /// The token this manager currently believes in
    pub fn cached_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// A socket is open and past its handshake
    pub fn is_connected(&self) -> bool {
        self.connection.as_ref().is_some_and(|c| c.open)
    }

    /// A socket exists, open or still connecting
    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.machine.state().clone(),
            connected: self.is_connected(),
            has_token: self.token.is_some(),
        }
    }

    /// Take the notices produced since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Open a fresh connection with the stored token.
    ///
    /// Without a token nothing is opened: the page becomes `Auth` and a
    /// notice is raised. An existing socket is closed first, silently.
    pub fn connect(&mut self) -> Result<()> {
        if let Err(e) = self.store.refresh() {
            warn!("Failed to refresh token store: {}", e);
        }
        let token = self.store.load();
        self.token = token.clone();

        let Some(token) = token else {
            warn!("Cannot connect: no session token stored");
            self.release_connection();
            let effects = self.machine.missing_credentials();
            self.apply(effects);
            return Err(ClientError::MissingToken);
        };

        self.release_connection();

        self.generation += 1;
        info!(
            "Opening connection #{} to {}",
            self.generation, self.config.endpoint
        );
        let handle = self
            .connector
            .open(&self.config.endpoint, self.generation, self.events_tx.clone());

        self.connection = Some(ActiveConnection {
            handle,
            token,
            open: false,
        });
        Ok(())
    }

    /// Close the current socket (if any) without UI-visible effects.
    ///
    /// Pending joins resolve `Disconnected`.
    pub fn disconnect(&mut self) {
        self.release_connection();
    }

    fn release_connection(&mut self) {
        if let Some(connection) = self.connection.take() {
            debug!(
                "Releasing connection #{}",
                connection.handle.generation()
            );
            drop(connection);
            let effects = self.machine.connection_released();
            self.apply(effects);
        }
    }

    /// Serialize `frame` and write it to the open socket
    pub fn send_action(&mut self, frame: ClientFrame) -> Result<RequestId> {
        let outbound = OutboundFrame::new(frame);
        self.send_outbound(&outbound)?;
        Ok(outbound.request_id)
    }

    fn send_outbound(&self, outbound: &OutboundFrame) -> Result<()> {
        let Some(connection) = self.connection.as_ref().filter(|c| c.open) else {
            error!("Cannot send {}: not connected", outbound.frame.tag());
            return Err(ClientError::NotConnected);
        };

        let text = outbound.to_json()?;
        connection.handle.send_text(text)?;
        debug!(
            "Sent {} ({})",
            outbound.frame.tag(),
            outbound.request_id
        );
        Ok(())
    }

    /// Send the frame for a user action
    pub fn perform(&mut self, action: LobbyAction) -> Result<RequestId> {
        let frame = self.machine.frame_for(action)?;
        self.send_action(frame)
    }

    pub fn create_lobby(
        &mut self,
        name: &str,
        max_players: u8,
        is_private: bool,
        password: &str,
    ) -> Result<RequestId> {
        self.perform(LobbyAction::CreateLobby {
            name: name.to_string(),
            max_players,
            is_private,
            password: password.to_string(),
        })
    }

    /// Ask to join `lobby_id`; the returned handle resolves with the answer
    pub fn join_lobby(&mut self, lobby_id: LobbyId, password: &str) -> Result<PendingJoin> {
        if !self.is_connected() {
            error!("Cannot join {}: not connected", lobby_id);
            return Err(ClientError::NotConnected);
        }

        let frame = self.machine.frame_for(LobbyAction::JoinLobby {
            lobby_id: lobby_id.clone(),
            password: password.to_string(),
        })?;
        let outbound = OutboundFrame::new(frame);
        let request_id = outbound.request_id;

        self.machine
            .track_join(request_id, lobby_id, Instant::now())?;
        if let Err(e) = self.send_outbound(&outbound) {
            self.machine.cancel_join(&request_id);
            return Err(e);
        }

        let (tx, rx) = oneshot::channel();
        self.join_waiters.insert(request_id, tx);
        Ok(PendingJoin {
            request_id,
            outcome: rx,
        })
    }

    pub fn leave_lobby(&mut self) -> Result<RequestId> {
        self.perform(LobbyAction::LeaveLobby)
    }

    /// Mark ourselves ready
    pub fn start_game(&mut self) -> Result<RequestId> {
        self.perform(LobbyAction::StartGame)
    }

    /// Withdraw our ready mark
    pub fn cancel_game(&mut self) -> Result<RequestId> {
        self.perform(LobbyAction::CancelGame)
    }

    /// Forget the session: clear the stored token, close the socket and
    /// return to `Auth`.
    pub fn logout(&mut self) -> Result<()> {
        info!("Logging out");
        let cleared = self.store.clear();
        self.token = None;
        self.release_connection();
        let effects = self.machine.logout();
        self.apply(effects);
        cleared
    }

    /// Resolve join requests that outlived the request timeout
    pub fn expire_requests(&mut self) {
        let effects = self
            .machine
            .expire_requests(Instant::now(), self.config.request_timeout);
        self.apply(effects);
    }

    /// Ask the token store to pick up changes made elsewhere
    pub fn refresh_token_store(&mut self) {
        if let Err(e) = self.store.refresh() {
            warn!("Failed to refresh token store: {}", e);
        }
        self.sync_token();
    }

    /// Process one socket event
    pub fn handle_socket_event(&mut self, event: SocketEvent) {
        let current = self.connection.as_ref().map(|c| c.handle.generation());
        if current != Some(event.generation) {
            debug!(
                "Ignoring {:?} from superseded connection #{}",
                event.kind, event.generation
            );
            return;
        }

        match event.kind {
            SocketEventKind::Opened => self.on_open(),

            SocketEventKind::Text(text) => match decode(&text) {
                Ok(inbound) => {
                    let effects = self.machine.handle_frame(inbound);
                    self.apply(effects);
                }
                Err(e) => warn!("Dropping frame: {}", e),
            },

            SocketEventKind::Closed { code, reason } => {
                info!("Connection closed (code {:?}): {}", code, reason);
                self.connection = None;
                let effects = self.machine.handle_close(code, &self.config.auth_close_codes);
                self.apply(effects);
            }

            SocketEventKind::Failed(reason) => {
                error!("Connection failed: {}", reason);
                self.connection = None;
                let effects = self.machine.handle_close(None, &self.config.auth_close_codes);
                self.apply(effects);
            }
        }
    }

    fn on_open(&mut self) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        connection.open = true;
        info!("Connection #{} open, authenticating", connection.handle.generation());

        let auth = OutboundFrame::new(ClientFrame::Authenticate {
            token: connection.token.clone(),
        });
        if let Err(e) = self.send_outbound(&auth) {
            error!("Failed to send authentication frame: {}", e);
        }
    }

    /// Process everything already queued without waiting.
    /// Returns the number of socket events handled.
    pub fn pump(&mut self) -> usize {
        self.sync_token();

        let mut processed = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_socket_event(event);
            processed += 1;
        }
        processed
    }

    /// Wait for the next socket event or token change and process it
    pub async fn next_event(&mut self) {
        tokio::select! {
            Some(event) = self.events_rx.recv() => self.handle_socket_event(event),
            changed = self.token_rx.changed(), if self.token_watch_open => {
                if changed.is_err() {
                    self.token_watch_open = false;
                } else {
                    self.adopt_token();
                }
            }
        }
    }

    /// Mirror a token change made through any manager sharing our store.
    /// The socket is left alone.
    fn sync_token(&mut self) {
        if !self.token_watch_open {
            return;
        }
        match self.token_rx.has_changed() {
            Ok(true) => self.adopt_token(),
            Ok(false) => {}
            Err(_) => self.token_watch_open = false,
        }
    }

    fn adopt_token(&mut self) {
        let token = self.token_rx.borrow_and_update().clone();
        if token != self.token {
            debug!("Session token changed in the store");
            self.token = token;
        }
    }

    fn apply(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            match effect {
                SessionEffect::Notify(notice) => {
                    match notice.level {
                        NoticeLevel::Info => info!("{}", notice.message),
                        NoticeLevel::Warning | NoticeLevel::Error => warn!("{}", notice.message),
                    }
                    self.notices.push(notice);
                }

                SessionEffect::PageChanged { from, to } => {
                    info!("Page changed: {} -> {}", from, to);
                }

                SessionEffect::JoinResolved {
                    request_id,
                    outcome,
                } => {
                    if let Some(waiter) = self.join_waiters.remove(&request_id) {
                        let _ = waiter.send(outcome);
                    }
                }

                SessionEffect::ClearCredentials => {
                    if let Err(e) = self.store.clear() {
                        error!("Failed to clear session token: {}", e);
                    }
                    self.token = None;
                    // Closing our socket: the close it causes must not be reported
                    self.connection = None;
                }
            }
        }
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if self.connection.take().is_some() {
            info!("Session manager dropped, closing connection");
        }
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("endpoint", &self.config.endpoint)
            .field("page", &self.machine.page())
            .field("generation", &self.generation)
            .field("connected", &self.is_connected())
            .field("has_token", &self.token.is_some())
            .field("pending_joins", &self.machine.pending().len())
            .finish()
    }
}
