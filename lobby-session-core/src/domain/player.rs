use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned, opaque player identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The authenticated identity of a connected client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub name: String,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_is_transparent_on_the_wire() {
        let id = PlayerId::new("p1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p1\"");
    }

    #[test]
    fn test_player_missing_name_defaults_to_empty() {
        let player: Player = serde_json::from_str(r#"{"id":"p1"}"#).unwrap();
        assert_eq!(player.id.as_str(), "p1");
        assert!(player.name.is_empty());
    }

    #[test]
    fn test_player_display() {
        let player = Player::new("p1", "Ann");
        assert_eq!(player.to_string(), "Ann (p1)");
    }
}
