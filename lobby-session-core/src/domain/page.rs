use serde::{Deserialize, Serialize};
use std::fmt;

/// The screen the client should be showing.
///
/// Pages are derived state: they change only as a side effect of server
/// frames, socket closure, a failed connect or an explicit logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Auth,
    MainMenu,
    InLobby,
    GameOfTwo,
    GameOfThree,
    GameOfFour,
    LobbyScreen,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Page::Auth => "auth",
            Page::MainMenu => "mainmenu",
            Page::InLobby => "inlobby",
            Page::GameOfTwo => "gameoftwo",
            Page::GameOfThree => "gameofthree",
            Page::GameOfFour => "gameoffour",
            Page::LobbyScreen => "lobbyscreen",
        };
        write!(f, "{}", name)
    }
}
