use crate::domain::{Lobby, LobbyError, LobbyId};
use crate::protocol::ClientFrame;

/// User intents that turn into outbound frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyAction {
    /// Open a new lobby and take a seat in it
    CreateLobby {
        name: String,
        max_players: u8,
        is_private: bool,
        password: String,
    },

    /// Ask for a seat in an existing lobby
    JoinLobby { lobby_id: LobbyId, password: String },

    /// Leave the lobby we currently hold
    LeaveLobby,

    /// Mark ourselves ready in the lobby we currently hold
    StartGame,

    /// Withdraw our ready mark
    CancelGame,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] LobbyError),

    #[error("Not in a lobby")]
    NoActiveLobby,

    #[error("Lobby {0} is full")]
    LobbyFull(LobbyId),

    #[error("Already part of lobby {0}")]
    AlreadyMember(LobbyId),
}

impl LobbyAction {
    /// Build the wire frame for this action.
    ///
    /// Lobby-scoped actions use the id of `current`, the lobby we hold.
    pub fn into_frame(self, current: Option<&Lobby>) -> Result<ClientFrame, ActionError> {
        let current_id = || {
            current
                .map(|lobby| lobby.id.clone())
                .ok_or(ActionError::NoActiveLobby)
        };

        match self {
            LobbyAction::CreateLobby {
                name,
                max_players,
                is_private,
                password,
            } => {
                Lobby::validate_settings(&name, max_players, is_private, &password)?;
                Ok(ClientFrame::CreateLobby {
                    lobby_name: name.trim().to_string(),
                    max_players,
                    is_private,
                    // Public lobbies never carry a password
                    password: if is_private {
                        password.trim().to_string()
                    } else {
                        String::new()
                    },
                })
            }

            LobbyAction::JoinLobby { lobby_id, password } => {
                Ok(ClientFrame::JoinLobby { lobby_id, password })
            }

            LobbyAction::LeaveLobby => Ok(ClientFrame::LeaveLobby {
                lobby_id: current_id()?,
            }),

            LobbyAction::StartGame => Ok(ClientFrame::StartGame {
                lobby_id: current_id()?,
            }),

            LobbyAction::CancelGame => Ok(ClientFrame::CancelGame {
                lobby_id: current_id()?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held_lobby() -> Lobby {
        Lobby {
            id: LobbyId::new("L7"),
            name: "Friday".to_string(),
            max_players: 3,
            is_private: false,
            password: String::new(),
            players: Vec::new(),
            game_start: Vec::new(),
        }
    }

    #[test]
    fn test_create_lobby_frame() {
        let frame = LobbyAction::CreateLobby {
            name: "  Friday ".to_string(),
            max_players: 3,
            is_private: false,
            password: "ignored".to_string(),
        }
        .into_frame(None)
        .unwrap();

        assert_eq!(
            frame,
            ClientFrame::CreateLobby {
                lobby_name: "Friday".to_string(),
                max_players: 3,
                is_private: false,
                password: String::new(),
            }
        );
    }

    #[test]
    fn test_private_lobby_password_is_trimmed() {
        let frame = LobbyAction::CreateLobby {
            name: "Friday".to_string(),
            max_players: 2,
            is_private: true,
            password: "  s3cret ".to_string(),
        }
        .into_frame(None)
        .unwrap();

        assert_eq!(
            frame,
            ClientFrame::CreateLobby {
                lobby_name: "Friday".to_string(),
                max_players: 2,
                is_private: true,
                password: "s3cret".to_string(),
            }
        );

        let result = LobbyAction::CreateLobby {
            name: "Friday".to_string(),
            max_players: 2,
            is_private: true,
            password: "   ".to_string(),
        }
        .into_frame(None);
        assert_eq!(
            result,
            Err(ActionError::Validation(LobbyError::PasswordTooShort))
        );
    }

    #[test]
    fn test_create_lobby_validation() {
        let result = LobbyAction::CreateLobby {
            name: "Friday".to_string(),
            max_players: 6,
            is_private: false,
            password: String::new(),
        }
        .into_frame(None);

        assert_eq!(
            result,
            Err(ActionError::Validation(LobbyError::InvalidCapacity(6)))
        );
    }

    #[test]
    fn test_lobby_scoped_actions_need_a_lobby() {
        for action in [
            LobbyAction::LeaveLobby,
            LobbyAction::StartGame,
            LobbyAction::CancelGame,
        ] {
            assert_eq!(action.into_frame(None), Err(ActionError::NoActiveLobby));
        }
    }

    #[test]
    fn test_lobby_scoped_actions_use_held_lobby_id() {
        let lobby = held_lobby();

        let frame = LobbyAction::StartGame.into_frame(Some(&lobby)).unwrap();
        assert_eq!(
            frame,
            ClientFrame::StartGame {
                lobby_id: LobbyId::new("L7")
            }
        );

        let frame = LobbyAction::LeaveLobby.into_frame(Some(&lobby)).unwrap();
        assert_eq!(frame.tag(), "leave_lobby");
    }

    #[test]
    fn test_join_does_not_need_a_lobby() {
        let frame = LobbyAction::JoinLobby {
            lobby_id: LobbyId::new("L2"),
            password: "pw".to_string(),
        }
        .into_frame(None)
        .unwrap();

        assert_eq!(
            frame,
            ClientFrame::JoinLobby {
                lobby_id: LobbyId::new("L2"),
                password: "pw".to_string(),
            }
        );
    }
}
