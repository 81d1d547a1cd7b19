use crate::domain::LobbyId;
use crate::protocol::ProtocolError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Client-generated correlation id attached to every outbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frames sent from the client to the lobby server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// First frame on every socket
    Authenticate { token: String },

    CreateLobby {
        #[serde(rename = "lobbyName")]
        lobby_name: String,
        #[serde(rename = "maxPlayers")]
        max_players: u8,
        #[serde(rename = "isPrivate")]
        is_private: bool,
        password: String,
    },

    JoinLobby {
        #[serde(rename = "lobbyID")]
        lobby_id: LobbyId,
        password: String,
    },

    LeaveLobby {
        #[serde(rename = "lobbyID")]
        lobby_id: LobbyId,
    },

    /// Mark ourselves ready
    StartGame {
        #[serde(rename = "lobbyID")]
        lobby_id: LobbyId,
    },

    /// Withdraw a previous ready mark
    CancelGame {
        #[serde(rename = "lobbyID")]
        lobby_id: LobbyId,
    },
}

impl ClientFrame {
    /// The wire tag, for logging
    pub fn tag(&self) -> &'static str {
        match self {
            ClientFrame::Authenticate { .. } => "authenticate",
            ClientFrame::CreateLobby { .. } => "create_lobby",
            ClientFrame::JoinLobby { .. } => "join_lobby",
            ClientFrame::LeaveLobby { .. } => "leave_lobby",
            ClientFrame::StartGame { .. } => "start_game",
            ClientFrame::CancelGame { .. } => "cancel_game",
        }
    }
}

/// A client frame plus its correlation id, as written to the socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutboundFrame {
    #[serde(rename = "requestID")]
    pub request_id: RequestId,

    #[serde(flatten)]
    pub frame: ClientFrame,
}

impl OutboundFrame {
    pub fn new(frame: ClientFrame) -> Self {
        Self {
            request_id: RequestId::new(),
            frame,
        }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}
