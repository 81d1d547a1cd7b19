use crate::domain::{null_as_default, Player, PlayerId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest table a lobby can be opened for
pub const MIN_PLAYERS: u8 = 2;

/// Largest table a lobby can be opened for
pub const MAX_PLAYERS: u8 = 4;

/// Shortest password a private lobby can be opened with (after trimming)
pub const MIN_PASSWORD_LEN: usize = 4;

/// Server-assigned, opaque lobby identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct LobbyId(String);

impl LobbyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LobbyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LobbyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A player who pressed "start game" in the lobby
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReadyMark {
    /// Older servers send this field as `id`
    #[serde(rename = "playerID", alias = "id")]
    pub player_id: PlayerId,
}

/// Errors raised while validating lobby settings on the client
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LobbyError {
    #[error("Lobby name cannot be empty")]
    EmptyName,

    #[error("A lobby seats between 2 and 4 players, got {0}")]
    InvalidCapacity(u8),

    #[error("A private lobby needs a password of at least 4 characters")]
    PasswordTooShort,
}

/// Full lobby state, visible only to its members (includes the password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lobby {
    pub id: LobbyId,
    pub name: String,
    pub max_players: u8,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Vec<Player>")]
    pub players: Vec<Player>,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Vec<ReadyMark>")]
    pub game_start: Vec<ReadyMark>,
}

impl Lobby {
    /// Check lobby settings before a `create_lobby` frame goes out
    pub fn validate_settings(
        name: &str,
        max_players: u8,
        is_private: bool,
        password: &str,
    ) -> Result<(), LobbyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LobbyError::EmptyName);
        }

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&max_players) {
            return Err(LobbyError::InvalidCapacity(max_players));
        }

        if is_private && password.trim().chars().count() < MIN_PASSWORD_LEN {
            return Err(LobbyError::PasswordTooShort);
        }

        Ok(())
    }

    pub fn contains(&self, player_id: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id == player_id)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= usize::from(self.max_players)
    }

    pub fn is_ready(&self, player_id: &PlayerId) -> bool {
        self.game_start.iter().any(|m| &m.player_id == player_id)
    }

    /// Number of distinct seated players who are ready
    pub fn ready_count(&self) -> usize {
        self.players.iter().filter(|p| self.is_ready(&p.id)).count()
    }

    /// Every seat is taken and every seated player is ready
    pub fn all_ready(&self) -> bool {
        self.is_full() && self.ready_count() == self.players.len()
    }

    /// Password-redacted projection shown in the lobby browser
    pub fn summary(&self) -> LobbySummary {
        LobbySummary::from(self)
    }
}

/// Public view of a lobby as broadcast to every connected client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LobbySummary {
    pub id: LobbyId,
    pub name: String,
    pub max_players: u8,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Vec<Player>")]
    pub players: Vec<Player>,
}

impl LobbySummary {
    pub fn is_full(&self) -> bool {
        self.players.len() >= usize::from(self.max_players)
    }
}

impl From<&Lobby> for LobbySummary {
    fn from(lobby: &Lobby) -> Self {
        Self {
            id: lobby.id.clone(),
            name: lobby.name.clone(),
            max_players: lobby.max_players,
            is_private: lobby.is_private,
            players: lobby.players.clone(),
        }
    }
}
