use lobby_session_core::LobbyId;

/// Help text printed by `help`
pub const HELP: &str = "\
Commands:
  status                          show page, player and lobby
  lobbies                         list open lobbies
  create <name> <2-4> [password]  open a lobby (private when a password is given)
  join <lobby-id> [password]      ask for a seat in a lobby
  leave                           leave the current lobby
  ready | unready                 toggle your ready mark
  connect                         reconnect with the stored token
  logout                          forget the token and disconnect
  quit                            exit";

/// One line typed into the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Status,
    Lobbies,
    Create {
        name: String,
        max_players: u8,
        password: Option<String>,
    },
    Join {
        lobby_id: LobbyId,
        password: String,
    },
    Leave,
    Ready,
    Unready,
    Connect,
    Logout,
    Quit,
}

impl ShellCommand {
    /// Parse a line; `Ok(None)` for blank input
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_lowercase().as_str(), args.as_slice()) {
            ("help" | "?", []) => ShellCommand::Help,
            ("status", []) => ShellCommand::Status,
            ("lobbies" | "ls", []) => ShellCommand::Lobbies,
            ("create", [name, max, rest @ ..]) if rest.len() <= 1 => ShellCommand::Create {
                name: name.to_string(),
                max_players: max
                    .parse()
                    .map_err(|_| format!("'{}' is not a player count", max))?,
                password: rest.first().map(|p| p.to_string()),
            },
            ("join", [lobby_id]) => ShellCommand::Join {
                lobby_id: LobbyId::new(*lobby_id),
                password: String::new(),
            },
            ("join", [lobby_id, password]) => ShellCommand::Join {
                lobby_id: LobbyId::new(*lobby_id),
                password: password.to_string(),
            },
            ("leave", []) => ShellCommand::Leave,
            ("ready" | "start", []) => ShellCommand::Ready,
            ("unready" | "cancel", []) => ShellCommand::Unready,
            ("connect", []) => ShellCommand::Connect,
            ("logout", []) => ShellCommand::Logout,
            ("quit" | "exit", []) => ShellCommand::Quit,
            (verb, _) => return Err(format!("Unknown or malformed command '{}', try 'help'", verb)),
        };

        Ok(Some(command))
    }
}
