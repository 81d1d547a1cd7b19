use crate::application::{
    ActionError, JoinOutcome, LobbyAction, Notice, PendingError, PendingJoins, SessionEffect,
};
use crate::domain::{Lobby, LobbyId, LobbySummary, Page, Player};
use crate::protocol::{is_auth_error, ClientFrame, InboundFrame, RequestId, ServerFrame};
use instant::{Duration, Instant};
use tracing::{debug, info, warn};

/// Everything the UI renders from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub page: Page,
    pub player: Option<Player>,
    /// The lobby we hold a seat in, at most one
    pub lobby: Option<Lobby>,
    /// Public lobby list, replaced wholesale on every push
    pub lobbies: Vec<LobbySummary>,
}

/// I/O-free session state machine.
///
/// Frames and connection events are fed in one at a time; each call
/// updates the state to completion and returns the side effects its owner
/// must carry out.
#[derive(Debug, Default)]
pub struct SessionMachine {
    state: SessionState,
    pending: PendingJoins,
}

impl SessionMachine {
    pub fn new(max_pending_joins: usize) -> Self {
        Self {
            state: SessionState::default(),
            pending: PendingJoins::new(max_pending_joins),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn page(&self) -> Page {
        self.state.page
    }

    pub fn pending(&self) -> &PendingJoins {
        &self.pending
    }

    /// Build the frame for `action` against the lobby we currently hold.
    ///
    /// Joins are refused locally when the listed lobby is already full or
    /// already seats us.
    pub fn frame_for(&self, action: LobbyAction) -> Result<ClientFrame, ActionError> {
        if let LobbyAction::JoinLobby { lobby_id, .. } = &action {
            self.check_join(lobby_id)?;
        }
        action.into_frame(self.state.lobby.as_ref())
    }

    fn check_join(&self, lobby_id: &LobbyId) -> Result<(), ActionError> {
        let Some(listed) = self.state.lobbies.iter().find(|l| &l.id == lobby_id) else {
            return Ok(());
        };

        if listed.is_full() {
            return Err(ActionError::LobbyFull(lobby_id.clone()));
        }

        let seated = self
            .state
            .player
            .as_ref()
            .is_some_and(|me| listed.players.iter().any(|p| p.id == me.id));
        if seated {
            return Err(ActionError::AlreadyMember(lobby_id.clone()));
        }
        Ok(())
    }

    /// Apply one decoded server frame
    pub fn handle_frame(&mut self, inbound: InboundFrame) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        debug!("Handling {} frame", inbound.frame.tag());

        match inbound.frame {
            ServerFrame::Welcome(welcome) => {
                let Some(player) = welcome.player() else {
                    warn!("Dropping welcome frame without a player identity");
                    return effects;
                };
                info!("Authenticated as {}", player);
                self.state.player = Some(player);
                self.state.lobbies = welcome.lobbies;
                if let Some(message) = welcome.message.filter(|m| !m.is_empty()) {
                    effects.push(SessionEffect::Notify(Notice::info(message)));
                }
                self.set_page(Page::MainMenu, &mut effects);
            }

            ServerFrame::LobbyList { lobbies } => {
                debug!("Lobby list now has {} entries", lobbies.len());
                self.state.lobbies = lobbies;
            }

            ServerFrame::LobbyUpdated { lobby } => {
                self.state.lobby = Some(lobby);
            }

            ServerFrame::LobbyCreated { lobby } => {
                info!("Created lobby {} ({})", lobby.name, lobby.id);
                self.state.lobby = Some(lobby);
                self.set_page(Page::InLobby, &mut effects);
            }

            ServerFrame::JoinLobbySuccessful { lobby } => {
                info!("Joined lobby {} ({})", lobby.name, lobby.id);
                let lobby_id = lobby.id.clone();
                self.state.lobby = Some(lobby);
                self.set_page(Page::InLobby, &mut effects);
                self.resolve_join(inbound.request_id, JoinOutcome::Joined(lobby_id), &mut effects);
            }

            ServerFrame::JoinLobbyWrongPassword { .. } => {
                effects.push(SessionEffect::Notify(Notice::error("Wrong password")));
                self.resolve_join(inbound.request_id, JoinOutcome::WrongPassword, &mut effects);
            }

            ServerFrame::JoinLobbyFull { .. } => {
                effects.push(SessionEffect::Notify(Notice::error("Lobby is full")));
                self.resolve_join(inbound.request_id, JoinOutcome::Full, &mut effects);
            }

            ServerFrame::JoinLobbyFailed { message } => {
                let reason = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Could not join lobby".to_string());
                effects.push(SessionEffect::Notify(Notice::error(reason.clone())));
                self.resolve_join(inbound.request_id, JoinOutcome::Rejected(reason), &mut effects);
            }

            ServerFrame::LobbyLeft {} => {
                if let Some(lobby) = self.state.lobby.take() {
                    info!("Left lobby {}", lobby.id);
                }
                self.set_page(Page::MainMenu, &mut effects);
            }

            ServerFrame::Error { error } => {
                if is_auth_error(&error) {
                    warn!("Server rejected credentials: {}", error);
                    self.reset_to_auth(&mut effects);
                    effects.push(SessionEffect::ClearCredentials);
                    effects.push(SessionEffect::Notify(Notice::error(format!(
                        "Session expired, please log in again ({})",
                        error
                    ))));
                } else {
                    effects.push(SessionEffect::Notify(Notice::error(error)));
                }
            }
        }

        effects
    }

    /// The socket closed on its own (not by us)
    pub fn handle_close(&mut self, code: Option<u16>, auth_close_codes: &[u16]) -> Vec<SessionEffect> {
        let mut effects = Vec::new();

        if code.is_some_and(|code| auth_close_codes.contains(&code)) {
            warn!("Connection closed with authentication error code {:?}", code);
            self.reset_to_auth(&mut effects);
            effects.push(SessionEffect::ClearCredentials);
            effects.push(SessionEffect::Notify(Notice::error(
                "Authentication failed, please log in again",
            )));
            return effects;
        }

        info!("Connection closed (code {:?})", code);
        self.state.player = None;
        self.state.lobby = None;
        self.disconnect_pending(&mut effects);
        effects.push(SessionEffect::Notify(Notice::warning(
            "Connection to the lobby server closed",
        )));
        effects
    }

    /// `connect()` found no stored credential
    pub fn missing_credentials(&mut self) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        self.set_page(Page::Auth, &mut effects);
        effects.push(SessionEffect::Notify(Notice::error(
            "Not logged in, please log in first",
        )));
        effects
    }

    /// We closed the current socket ourselves (reconnect or teardown).
    ///
    /// The server drops our seat with the socket, so player and lobby go
    /// too; the page stays and no notice is raised.
    pub fn connection_released(&mut self) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        self.state.player = None;
        self.state.lobby = None;
        self.disconnect_pending(&mut effects);
        effects
    }

    /// Local logout: forget everything and return to `Auth`
    pub fn logout(&mut self) -> Vec<SessionEffect> {
        let mut effects = Vec::new();
        self.reset_to_auth(&mut effects);
        effects
    }

    /// Start tracking a `join_lobby` request sent with `request_id`
    pub fn track_join(
        &mut self,
        request_id: RequestId,
        lobby_id: LobbyId,
        now: Instant,
    ) -> Result<(), PendingError> {
        self.pending.track(request_id, lobby_id, now)
    }

    /// Stop tracking a request whose frame never made it to the socket
    pub fn cancel_join(&mut self, request_id: &RequestId) -> bool {
        self.pending.remove(request_id).is_some()
    }

    /// Resolve join requests older than `timeout` as expired
    pub fn expire_requests(&mut self, now: Instant, timeout: Duration) -> Vec<SessionEffect> {
        self.pending
            .expire(now, timeout)
            .into_iter()
            .map(|request_id| {
                warn!("Join request {} timed out", request_id);
                SessionEffect::JoinResolved {
                    request_id,
                    outcome: JoinOutcome::Expired,
                }
            })
            .collect()
    }

    fn resolve_join(
        &mut self,
        echoed: Option<RequestId>,
        outcome: JoinOutcome,
        effects: &mut Vec<SessionEffect>,
    ) {
        match self.pending.resolve(echoed) {
            Some((request_id, lobby_id)) => {
                debug!("Join request {} for {} resolved: {}", request_id, lobby_id, outcome);
                effects.push(SessionEffect::JoinResolved {
                    request_id,
                    outcome,
                });
            }
            None => debug!("Join answer matches no pending request"),
        }
    }

    fn disconnect_pending(&mut self, effects: &mut Vec<SessionEffect>) {
        effects.extend(self.pending.drain().into_iter().map(|request_id| {
            SessionEffect::JoinResolved {
                request_id,
                outcome: JoinOutcome::Disconnected,
            }
        }));
    }

    fn reset_to_auth(&mut self, effects: &mut Vec<SessionEffect>) {
        self.state.player = None;
        self.state.lobby = None;
        self.state.lobbies.clear();
        self.disconnect_pending(effects);
        self.set_page(Page::Auth, effects);
    }

    fn set_page(&mut self, to: Page, effects: &mut Vec<SessionEffect>) {
        let from = self.state.page;
        if from != to {
            debug!("Page {} -> {}", from, to);
            self.state.page = to;
            effects.push(SessionEffect::PageChanged { from, to });
        }
    }
}
