//! Client-side session manager for the lobby server.
//!
//! [`SessionManager`] owns the WebSocket connection and the session state
//! machine. [`SessionRuntime`] drives a manager on a tokio task and hands
//! out cloneable [`SessionHandle`]s to UI layers.

pub mod application;
pub mod error;
pub mod infrastructure;

pub use application::{
    build_ws_url, ClientConfig, PendingJoin, SessionHandle, SessionManager, SessionRuntime,
    SessionSnapshot,
};
pub use error::{ClientError, Result};
pub use infrastructure::{
    ConnectionHandle, Connector, FileTokenStore, MemoryTokenStore, Outgoing, SocketEvent,
    SocketEventKind, TokenStore, WebSocketConnector, TOKEN_KEY,
};

#[cfg(any(test, feature = "test-support"))]
pub use infrastructure::MockConnector;

// Re-export core types UI layers need
pub use lobby_session_core::{
    JoinOutcome, Lobby, LobbyAction, LobbyId, LobbySummary, Notice, NoticeLevel, Page, Player,
    PlayerId, RequestId, SessionState,
};
