use lobby_session_client::SessionSnapshot;
use lobby_session_core::{Lobby, LobbySummary};
use std::fmt::Write;

pub fn render_status(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let state = &snapshot.state;

    let _ = writeln!(out, "page:       {}", state.page);
    let _ = writeln!(
        out,
        "connection: {}",
        if snapshot.connected { "open" } else { "closed" }
    );
    let _ = writeln!(
        out,
        "token:      {}",
        if snapshot.has_token { "stored" } else { "none" }
    );
    match &state.player {
        Some(player) => {
            let _ = writeln!(out, "player:     {}", player);
        }
        None => {
            let _ = writeln!(out, "player:     -");
        }
    }
    match &state.lobby {
        Some(lobby) => out.push_str(&render_lobby(lobby)),
        None => {
            let _ = writeln!(out, "lobby:      -");
        }
    }
    out
}

pub fn render_lobby(lobby: &Lobby) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "lobby:      {} [{}] {}/{} seated, {} ready{}",
        lobby.name,
        lobby.id,
        lobby.players.len(),
        lobby.max_players,
        lobby.ready_count(),
        if lobby.is_private { ", private" } else { "" }
    );
    for player in &lobby.players {
        let mark = if lobby.is_ready(&player.id) { "x" } else { " " };
        let _ = writeln!(out, "  [{}] {}", mark, player);
    }
    if lobby.all_ready() {
        let _ = writeln!(out, "  everyone is ready");
    }
    out
}

pub fn render_lobbies(lobbies: &[LobbySummary]) -> String {
    if lobbies.is_empty() {
        return "no open lobbies\n".to_string();
    }

    let mut out = String::new();
    for lobby in lobbies {
        let _ = writeln!(
            out,
            "{:<12} {:<24} {}/{}{}{}",
            lobby.id.as_str(),
            lobby.name,
            lobby.players.len(),
            lobby.max_players,
            if lobby.is_private { " private" } else { "" },
            if lobby.is_full() { " full" } else { "" }
        );
    }
    out
}
