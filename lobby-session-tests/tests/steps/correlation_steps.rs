use cucumber::{given, then, when};
use lobby_session_client::ClientConfig;
use lobby_session_core::LobbyId;
use lobby_session_tests::{id_list, lobby_json, SessionWorld};
use serde_json::json;
use std::time::Duration;

// ===== Given Steps =====

#[given("join requests expire immediately")]
async fn requests_expire_immediately(world: &mut SessionWorld) {
    world.reconfigure(ClientConfig::default().with_request_timeout(Duration::ZERO));
}

#[given(expr = "at most {int} join requests may be pending")]
async fn pending_limit(world: &mut SessionWorld, max: usize) {
    world.reconfigure(ClientConfig::default().with_max_pending_joins(max));
}

// ===== When Steps =====

#[when(expr = "the client asks to join lobby {string} as {string}")]
async fn client_asks_to_join(world: &mut SessionWorld, lobby_id: String, label: String) {
    match world.manager.join_lobby(LobbyId::new(lobby_id), "") {
        Ok(pending) => {
            world.joins.insert(label, pending);
            world.last_result = Some(Ok(()));
        }
        Err(e) => world.last_result = Some(Err(e.to_string())),
    }
}

#[when(expr = "the server accepts the join into lobby {string} with players {string}")]
async fn server_accepts_without_id(world: &mut SessionWorld, lobby_id: String, players: String) {
    let lobby = lobby_json(&lobby_id, &lobby_id, 4, &id_list(&players), &[]);
    world.receive_json(json!({ "type": "join_lobby_successful", "lobby": lobby }));
}

#[when(expr = "the server accepts join {string} into lobby {string}")]
async fn server_accepts_with_id(world: &mut SessionWorld, label: String, lobby_id: String) {
    let request_id = world
        .joins
        .get(&label)
        .unwrap_or_else(|| panic!("no join request labelled '{}'", label))
        .request_id;
    let lobby = lobby_json(&lobby_id, &lobby_id, 4, &["p1"], &[]);
    world.receive_json(json!({
        "type": "join_lobby_successful",
        "requestID": request_id.to_string(),
        "lobby": lobby,
    }));
}

#[when("the request timeout passes")]
async fn request_timeout_passes(world: &mut SessionWorld) {
    world.manager.expire_requests();
    world.pump();
}

// ===== Then Steps =====

#[then(expr = "join {string} ended as {string}")]
async fn join_ended_as(world: &mut SessionWorld, label: String, outcome: String) {
    assert_eq!(world.take_outcome(&label).to_string(), outcome);
}

#[then(expr = "join {string} is still pending")]
async fn join_still_pending(world: &mut SessionWorld, label: String) {
    let pending = world
        .joins
        .get_mut(&label)
        .unwrap_or_else(|| panic!("no join request labelled '{}'", label));
    assert_eq!(pending.try_outcome(), None);
}
