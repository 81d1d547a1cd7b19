use crate::application::{PendingJoin, SessionManager, SessionSnapshot};
use crate::error::{ClientError, Result};
use lobby_session_core::{LobbyAction, LobbyId, Notice, RequestId};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

type Reply<T> = oneshot::Sender<Result<T>>;

enum Command {
    Connect(Reply<()>),
    Perform(LobbyAction, Reply<RequestId>),
    Join {
        lobby_id: LobbyId,
        password: String,
        reply: Reply<PendingJoin>,
    },
    Logout(Reply<()>),
    Disconnect(Reply<()>),
    Shutdown,
}

/// Cloneable access to a running session, for UI layers
#[derive(Debug, Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<SessionSnapshot>,
    notice_tx: broadcast::Sender<Notice>,
}

impl SessionHandle {
    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| ClientError::RuntimeClosed)?;
        reply_rx.await.map_err(|_| ClientError::RuntimeClosed)?
    }

    pub async fn connect(&self) -> Result<()> {
        self.request(Command::Connect).await
    }

    pub async fn perform(&self, action: LobbyAction) -> Result<RequestId> {
        self.request(|reply| Command::Perform(action, reply)).await
    }

    pub async fn create_lobby(
        &self,
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
        .await
    }

    pub async fn join_lobby(&self, lobby_id: LobbyId, password: &str) -> Result<PendingJoin> {
        let password = password.to_string();
        self.request(|reply| Command::Join {
            lobby_id,
            password,
            reply,
        })
        .await
    }

    pub async fn leave_lobby(&self) -> Result<RequestId> {
        self.perform(LobbyAction::LeaveLobby).await
    }

    pub async fn start_game(&self) -> Result<RequestId> {
        self.perform(LobbyAction::StartGame).await
    }

    pub async fn cancel_game(&self) -> Result<RequestId> {
        self.perform(LobbyAction::CancelGame).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.request(Command::Logout).await
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.request(Command::Disconnect).await
    }

    /// Get latest state snapshot (always succeeds, never blocks)
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_rx.clone()
    }

    /// Receive notices raised from now on
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }
}

/// Background runtime that owns a [`SessionManager`]
pub struct SessionRuntime {
    handle: SessionHandle,
    task_handle: JoinHandle<()>,
}

impl SessionRuntime {
    /// Move `manager` onto its own task. Must be called inside a tokio runtime.
    pub fn spawn(manager: SessionManager) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (state_tx, state_rx) = watch::channel(manager.snapshot());
        let (notice_tx, _) = broadcast::channel(64);

        let task_handle = tokio::spawn(run(manager, cmd_rx, state_tx, notice_tx.clone()));

        Self {
            handle: SessionHandle {
                cmd_tx,
                state_rx,
                notice_tx,
            },
            task_handle,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Stop the runtime; the manager closes its socket silently
    pub async fn shutdown(self) {
        if self.handle.cmd_tx.send(Command::Shutdown).await.is_err() {
            debug!("Session runtime already stopped");
        }
        let _ = self.task_handle.await;
    }
}

async fn run(
    mut manager: SessionManager,
    mut cmd_rx: mpsc::Receiver<Command>,
    state_tx: watch::Sender<SessionSnapshot>,
    notice_tx: broadcast::Sender<Notice>,
) {
    let mut housekeeping = tokio::time::interval(housekeeping_period(&manager));
    housekeeping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("Session runtime started for {}", manager.config().endpoint);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Shutdown) | None => break,
                Some(cmd) => execute(&mut manager, cmd),
            },

            _ = manager.next_event() => {}

            _ = housekeeping.tick() => {
                manager.expire_requests();
                manager.refresh_token_store();
            }
        }

        publish(&mut manager, &state_tx, &notice_tx);
    }

    manager.disconnect();
    publish(&mut manager, &state_tx, &notice_tx);
    info!("Session runtime stopped");
}

fn housekeeping_period(manager: &SessionManager) -> Duration {
    (manager.config().request_timeout / 4).clamp(Duration::from_millis(50), Duration::from_secs(1))
}

fn execute(manager: &mut SessionManager, cmd: Command) {
    match cmd {
        Command::Connect(reply) => {
            let _ = reply.send(manager.connect());
        }
        Command::Perform(action, reply) => {
            let _ = reply.send(manager.perform(action));
        }
        Command::Join {
            lobby_id,
            password,
            reply,
        } => {
            let _ = reply.send(manager.join_lobby(lobby_id, &password));
        }
        Command::Logout(reply) => {
            let _ = reply.send(manager.logout());
        }
        Command::Disconnect(reply) => {
            manager.disconnect();
            let _ = reply.send(Ok(()));
        }
        Command::Shutdown => {}
    }
}

/// Push the latest snapshot (only if changed) and any new notices
fn publish(
    manager: &mut SessionManager,
    state_tx: &watch::Sender<SessionSnapshot>,
    notice_tx: &broadcast::Sender<Notice>,
) {
    let snapshot = manager.snapshot();
    state_tx.send_if_modified(|current| {
        if *current != snapshot {
            *current = snapshot;
            true
        } else {
            false
        }
    });

    for notice in manager.drain_notices() {
        let _ = notice_tx.send(notice);
    }
}
