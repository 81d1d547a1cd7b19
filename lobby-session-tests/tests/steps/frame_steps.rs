use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use lobby_session_tests::{id_list, lobby_json, SessionWorld};
use serde_json::json;

fn lobby_created(world: &mut SessionWorld, id: &str, players: &str) {
    let lobby = lobby_json(id, id, 4, &id_list(players), &[]);
    world.receive_json(json!({ "type": "lobby_created", "lobby": lobby }));
}

// ===== Given Steps =====

#[given(expr = "the server confirms lobby {string} was created with players {string}")]
async fn given_lobby_created(world: &mut SessionWorld, id: String, players: String) {
    lobby_created(world, &id, &players);
}

// ===== When Steps =====

#[when(expr = "the server confirms lobby {string} was created with players {string}")]
async fn when_lobby_created(world: &mut SessionWorld, id: String, players: String) {
    lobby_created(world, &id, &players);
}

#[when(expr = "the server sends welcome for player {string} named {string} with no lobbies")]
async fn server_sends_welcome(world: &mut SessionWorld, id: String, name: String) {
    world.receive_json(json!({
        "type": "welcome",
        "player": { "id": id, "name": name },
        "lobbies": [],
    }));
}

#[when("the server sends the frame:")]
async fn server_sends_frame(world: &mut SessionWorld, step: &Step) {
    let text = step.docstring.as_ref().expect("step needs a doc string");
    world.receive(text.trim());
}

#[when(expr = "the server updates lobby {string} with players {string} and ready {string}")]
async fn server_updates_lobby(world: &mut SessionWorld, id: String, players: String, ready: String) {
    let lobby = lobby_json(&id, &id, 4, &id_list(&players), &id_list(&ready));
    world.receive_json(json!({ "type": "lobby_updated", "lobby": lobby }));
}

#[when("the client leaves the lobby")]
async fn client_leaves(world: &mut SessionWorld) {
    let result = world.manager.leave_lobby();
    world.record(result);
}

#[when("the client marks itself ready")]
async fn client_ready(world: &mut SessionWorld) {
    let result = world.manager.start_game();
    world.record(result);
}

#[when("the client withdraws its ready mark")]
async fn client_unready(world: &mut SessionWorld) {
    let result = world.manager.cancel_game();
    world.record(result);
}

#[when(expr = "the client creates lobby {string} for {int} players")]
async fn client_creates_lobby(world: &mut SessionWorld, name: String, max_players: u8) {
    let result = world.manager.create_lobby(&name, max_players, false, "");
    world.record(result);
}

#[when(expr = "the client creates private lobby {string} for {int} players with password {string}")]
async fn client_creates_private_lobby(
    world: &mut SessionWorld,
    name: String,
    max_players: u8,
    password: String,
) {
    let result = world.manager.create_lobby(&name, max_players, true, &password);
    world.record(result);
}

// ===== Then Steps =====

#[then("the lobby list is empty")]
async fn lobby_list_empty(world: &mut SessionWorld) {
    assert!(world.state().lobbies.is_empty());
}

#[then(expr = "the lobby list has {int} entries")]
async fn lobby_list_len(world: &mut SessionWorld, count: usize) {
    assert_eq!(world.state().lobbies.len(), count);
}

#[then(expr = "the held lobby is {string} with players {string}")]
async fn held_lobby_is(world: &mut SessionWorld, id: String, players: String) {
    let lobby = world.state().lobby.as_ref().expect("no lobby held");
    assert_eq!(lobby.id.as_str(), id);
    let held: Vec<&str> = lobby.players.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(held, id_list(&players));
}

#[then("no lobby is held")]
async fn no_lobby_held(world: &mut SessionWorld) {
    assert_eq!(world.state().lobby, None);
}

#[then(expr = "a {string} frame for lobby {string} was sent")]
async fn frame_for_lobby_sent(world: &mut SessionWorld, frame_type: String, lobby_id: String) {
    let frames = world.connector.sent_frames(world.socket());
    let last = frames.last().expect("no frame was sent");
    assert_eq!(last["type"], frame_type.as_str());
    assert_eq!(last["lobbyID"], lobby_id.as_str());
}
