use crate::domain::{null_as_default, Lobby, LobbySummary, Player, PlayerId};
use crate::protocol::{ProtocolError, RequestId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every `type` tag the client understands, aliases included
pub const KNOWN_TAGS: [&str; 14] = [
    "welcome",
    "lobby_list",
    "lobby_created",
    "lobby_updated",
    "join_lobby_successful",
    "join_lobby_success",
    "join_lobby_failed",
    "join_lobby_unsuccessful",
    "join_lobby_wrong_password",
    "wrong_password",
    "join_lobby_full",
    "full",
    "lobby_left",
    "error",
];

/// Payload of the `welcome` frame
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Welcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<Player>,

    /// Flat identity sent by servers that predate the nested `player`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PlayerId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Vec<LobbySummary>")]
    pub lobbies: Vec<LobbySummary>,
}

impl Welcome {
    /// The identity assigned by the server, whichever shape it arrived in
    pub fn player(&self) -> Option<Player> {
        if let Some(player) = &self.player {
            return Some(player.clone());
        }
        self.id.as_ref().map(|id| Player {
            id: id.clone(),
            name: self.name.clone().unwrap_or_default(),
        })
    }
}

/// Frames pushed by the lobby server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Welcome(Welcome),

    LobbyList {
        #[serde(default, deserialize_with = "null_as_default")]
        #[schemars(with = "Vec<LobbySummary>")]
        lobbies: Vec<LobbySummary>,
    },

    LobbyCreated {
        lobby: Lobby,
    },

    LobbyUpdated {
        lobby: Lobby,
    },

    #[serde(alias = "join_lobby_success")]
    JoinLobbySuccessful {
        lobby: Lobby,
    },

    #[serde(alias = "join_lobby_unsuccessful")]
    JoinLobbyFailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    #[serde(alias = "wrong_password")]
    JoinLobbyWrongPassword {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    #[serde(alias = "full")]
    JoinLobbyFull {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    LobbyLeft {},

    Error {
        #[serde(alias = "message")]
        error: String,
    },
}

impl ServerFrame {
    pub fn tag(&self) -> &'static str {
        match self {
            ServerFrame::Welcome(_) => "welcome",
            ServerFrame::LobbyList { .. } => "lobby_list",
            ServerFrame::LobbyCreated { .. } => "lobby_created",
            ServerFrame::LobbyUpdated { .. } => "lobby_updated",
            ServerFrame::JoinLobbySuccessful { .. } => "join_lobby_successful",
            ServerFrame::JoinLobbyFailed { .. } => "join_lobby_failed",
            ServerFrame::JoinLobbyWrongPassword { .. } => "join_lobby_wrong_password",
            ServerFrame::JoinLobbyFull { .. } => "join_lobby_full",
            ServerFrame::LobbyLeft {} => "lobby_left",
            ServerFrame::Error { .. } => "error",
        }
    }

    /// Whether this frame answers a `join_lobby` request
    pub fn is_join_response(&self) -> bool {
        matches!(
            self,
            ServerFrame::JoinLobbySuccessful { .. }
                | ServerFrame::JoinLobbyFailed { .. }
                | ServerFrame::JoinLobbyWrongPassword { .. }
                | ServerFrame::JoinLobbyFull { .. }
        )
    }
}

/// A server frame together with the request id it echoes, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InboundFrame {
    #[serde(
        rename = "requestID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<RequestId>,

    #[serde(flatten)]
    pub frame: ServerFrame,
}

impl InboundFrame {
    pub fn new(frame: ServerFrame) -> Self {
        Self {
            request_id: None,
            frame,
        }
    }

    pub fn replying_to(request_id: RequestId, frame: ServerFrame) -> Self {
        Self {
            request_id: Some(request_id),
            frame,
        }
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Decode one text frame received from the server
pub fn decode(text: &str) -> Result<InboundFrame, ProtocolError> {
    let value: Value = serde_json::from_str(text)?;

    let tag = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?
        .to_string();

    if !KNOWN_TAGS.contains(&tag.as_str()) {
        return Err(ProtocolError::UnknownType(tag));
    }

    serde_json::from_value(value).map_err(|source| ProtocolError::InvalidPayload { tag, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LobbyId;

    #[test]
    fn test_decode_welcome_with_nested_player() {
        let inbound = decode(
            r#"{"type":"welcome","player":{"id":"p1","name":"Ann"},"message":"hi","lobbies":[]}"#,
        )
        .unwrap();

        let ServerFrame::Welcome(welcome) = inbound.frame else {
            panic!("expected welcome");
        };
        assert_eq!(welcome.player(), Some(Player::new("p1", "Ann")));
        assert_eq!(welcome.message.as_deref(), Some("hi"));
        assert!(welcome.lobbies.is_empty());
        assert_eq!(inbound.request_id, None);
    }

    #[test]
    fn test_decode_welcome_with_flat_identity_and_null_lobbies() {
        let inbound = decode(r#"{"type":"welcome","id":"p2","name":"Bo","lobbies":null}"#).unwrap();

        let ServerFrame::Welcome(welcome) = inbound.frame else {
            panic!("expected welcome");
        };
        assert_eq!(welcome.player(), Some(Player::new("p2", "Bo")));
        assert!(welcome.lobbies.is_empty());
    }

    #[test]
    fn test_decode_lobby_list() {
        let inbound = decode(
            r#"{"type":"lobby_list","lobbies":[{"id":"L1","name":"Friday","maxPlayers":3,"isPrivate":false,"players":null}]}"#,
        )
        .unwrap();

        let ServerFrame::LobbyList { lobbies } = inbound.frame else {
            panic!("expected lobby_list");
        };
        assert_eq!(lobbies.len(), 1);
        assert_eq!(lobbies[0].id, LobbyId::new("L1"));
        assert!(lobbies[0].players.is_empty());
    }

    #[test]
    fn test_decode_aliases() {
        let lobby = r#"{"id":"L1","name":"Friday","maxPlayers":2,"isPrivate":false,"password":"","players":[],"gameStart":null}"#;

        let frame = decode(&format!(r#"{{"type":"join_lobby_success","lobby":{lobby}}}"#))
            .unwrap()
            .frame;
        assert_eq!(frame.tag(), "join_lobby_successful");

        let frame = decode(r#"{"type":"wrong_password"}"#).unwrap().frame;
        assert_eq!(frame, ServerFrame::JoinLobbyWrongPassword { message: None });

        let frame = decode(r#"{"type":"full","message":"no seats"}"#).unwrap().frame;
        assert_eq!(
            frame,
            ServerFrame::JoinLobbyFull {
                message: Some("no seats".to_string())
            }
        );

        let frame = decode(r#"{"type":"join_lobby_unsuccessful"}"#).unwrap().frame;
        assert_eq!(frame.tag(), "join_lobby_failed");
        assert!(frame.is_join_response());
    }

    #[test]
    fn test_decode_echoed_request_id() {
        let request_id = RequestId::new();
        let text = format!(r#"{{"type":"lobby_left","requestID":"{request_id}","lobbyID":"L1"}}"#);

        let inbound = decode(&text).unwrap();
        assert_eq!(inbound.request_id, Some(request_id));
        assert_eq!(inbound.frame, ServerFrame::LobbyLeft {});
    }

    #[test]
    fn test_decode_error_frame() {
        let frame = decode(r#"{"type":"error","error":"Invalid token"}"#).unwrap().frame;
        assert_eq!(
            frame,
            ServerFrame::Error {
                error: "Invalid token".to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_bad_frames() {
        assert!(matches!(decode("not json"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(
            decode(r#"{"lobbies":[]}"#),
            Err(ProtocolError::MissingType)
        ));
        assert!(matches!(
            decode(r#"{"type":"teleport"}"#),
            Err(ProtocolError::UnknownType(tag)) if tag == "teleport"
        ));
        assert!(matches!(
            decode(r#"{"type":"lobby_created"}"#),
            Err(ProtocolError::InvalidPayload { tag, .. }) if tag == "lobby_created"
        ));
    }

    #[test]
    fn test_inbound_frame_encodes_for_test_servers() {
        let inbound = InboundFrame::new(ServerFrame::LobbyLeft {});
        assert_eq!(inbound.to_json().unwrap(), r#"{"type":"lobby_left"}"#);
    }
}
