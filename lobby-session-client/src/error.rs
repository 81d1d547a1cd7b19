use lobby_session_core::{ActionError, LobbyError, LobbyId, PendingError, ProtocolError};

/// Errors surfaced by the session manager and its runtime
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("No session token stored, log in first")]
    MissingToken,

    #[error("Not connected to the lobby server")]
    NotConnected,

    #[error("Not in a lobby")]
    NoActiveLobby,

    #[error("Lobby {0} is full")]
    LobbyFull(LobbyId),

    #[error("You are already part of lobby {0}")]
    AlreadyMember(LobbyId),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Token store error: {0}")]
    TokenStore(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] ProtocolError),

    #[error("Invalid lobby settings: {0}")]
    Validation(#[from] LobbyError),

    #[error("Cannot track request: {0}")]
    Pending(#[from] PendingError),

    #[error("Session runtime stopped")]
    RuntimeClosed,
}

impl From<ActionError> for ClientError {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Validation(e) => ClientError::Validation(e),
            ActionError::NoActiveLobby => ClientError::NoActiveLobby,
            ActionError::LobbyFull(id) => ClientError::LobbyFull(id),
            ActionError::AlreadyMember(id) => ClientError::AlreadyMember(id),
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidEndpoint(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
