use cucumber::{given, then, when};
use lobby_session_client::TokenStore;
use lobby_session_tests::SessionWorld;

// ===== Given Steps =====

#[given("no session token is stored")]
async fn no_token_stored(world: &mut SessionWorld) {
    world.store.clear().expect("clear token");
}

#[given(expr = "the session token {string} is stored")]
async fn token_stored(world: &mut SessionWorld, token: String) {
    world.store.store(&token).expect("store token");
}

#[given("the client is connected")]
async fn client_is_connected(world: &mut SessionWorld) {
    world.connect();
    assert!(world.manager.is_connected(), "client failed to connect");
}

#[given(expr = "player {string} named {string} is logged in")]
async fn player_logged_in(world: &mut SessionWorld, id: String, name: String) {
    world.log_in(&id, &name);
}

// ===== When Steps =====

#[when("the client connects")]
async fn client_connects(world: &mut SessionWorld) {
    world.connect();
}

#[when(expr = "the server closes the socket with code {int}")]
async fn server_closes_socket(world: &mut SessionWorld, code: u16) {
    let socket = world.socket();
    world.connector.close(socket, Some(code));
    world.pump();
}

#[when(expr = "socket {int} is closed by the server with code {int}")]
async fn server_closes_socket_n(world: &mut SessionWorld, index: usize, code: u16) {
    world.connector.close(index, Some(code));
    world.pump();
}

// ===== Then Steps =====

#[then(expr = "the last operation failed with {string}")]
async fn last_operation_failed(world: &mut SessionWorld, expected: String) {
    match &world.last_result {
        Some(Err(message)) => assert!(
            message.contains(&expected),
            "expected error containing '{}', got '{}'",
            expected,
            message
        ),
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[then("no socket was opened")]
async fn no_socket_opened(world: &mut SessionWorld) {
    assert_eq!(world.connector.connection_count(), 0);
}

#[then(expr = "{int} sockets were opened")]
async fn sockets_opened(world: &mut SessionWorld, count: usize) {
    assert_eq!(world.connector.connection_count(), count);
}

#[then(expr = "the socket URL does not contain {string}")]
async fn url_does_not_contain(world: &mut SessionWorld, secret: String) {
    let endpoint = world
        .connector
        .endpoint(world.socket())
        .expect("socket endpoint");
    assert!(!endpoint.contains(&secret), "{} leaks the token", endpoint);
}

#[then(expr = "the first frame sent has type {string} and token {string}")]
async fn first_frame_is(world: &mut SessionWorld, frame_type: String, token: String) {
    let frames = world.connector.sent_frames(world.socket());
    let first = frames.first().expect("no frame was sent");
    assert_eq!(first["type"], frame_type.as_str());
    assert_eq!(first["token"], token.as_str());
}

#[then("every frame sent carries a request id")]
async fn frames_carry_request_ids(world: &mut SessionWorld) {
    let frames = world.connector.sent_frames(world.socket());
    assert!(!frames.is_empty());
    for frame in frames {
        assert!(
            frame["requestID"].as_str().is_some_and(|id| !id.is_empty()),
            "frame without request id: {}",
            frame
        );
    }
}

#[then(expr = "no {string} frame was sent")]
async fn no_frame_of_type_sent(world: &mut SessionWorld, frame_type: String) {
    let frames = world.connector.sent_frames(world.socket());
    assert!(
        frames.iter().all(|frame| frame["type"] != frame_type.as_str()),
        "unexpected {} frame in {:?}",
        frame_type,
        frames
    );
}

#[then("the socket was closed by the client")]
async fn socket_closed_by_client(world: &mut SessionWorld) {
    assert!(world.connector.is_closed(world.socket()));
    assert!(!world.manager.has_connection());
}

#[then("the socket is still open")]
async fn socket_still_open(world: &mut SessionWorld) {
    assert!(!world.connector.is_closed(world.socket()));
    assert!(world.manager.is_connected());
}
