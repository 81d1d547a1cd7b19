use cucumber::{given, then, when};
use lobby_session_client::{ClientConfig, TokenStore};
use lobby_session_tests::SessionWorld;

// ===== Given Steps =====

#[given("another tab shares the token store")]
async fn another_tab(world: &mut SessionWorld) {
    world.sibling = Some(SessionWorld::build_manager(
        ClientConfig::default(),
        &world.store,
        &world.connector,
    ));
}

#[given("the session state is recorded")]
async fn given_state_recorded(world: &mut SessionWorld) {
    record_state(world);
}

#[when("the session state is recorded")]
async fn when_state_recorded(world: &mut SessionWorld) {
    record_state(world);
}

fn record_state(world: &mut SessionWorld) {
    world.recorded_state = Some(world.state().clone());
}

// ===== When Steps =====

#[when("the client logs out")]
async fn client_logs_out(world: &mut SessionWorld) {
    let result = world.manager.logout();
    world.record(result);
    world.pump();
}

#[when(expr = "another tab stores the token {string}")]
async fn sibling_stores_token(world: &mut SessionWorld, token: String) {
    world.store.store(&token).expect("store token");
    world.pump();
}

#[when("another tab logs out")]
async fn sibling_logs_out(world: &mut SessionWorld) {
    world
        .sibling
        .as_mut()
        .expect("no other tab")
        .logout()
        .expect("other tab logout");
    world.pump();
}

// ===== Then Steps =====

#[then(expr = "the page is {string}")]
async fn page_is(world: &mut SessionWorld, page: String) {
    assert_eq!(world.state().page.to_string(), page);
}

#[then(expr = "the player is {string} named {string}")]
async fn player_is(world: &mut SessionWorld, id: String, name: String) {
    let player = world.state().player.as_ref().expect("no player set");
    assert_eq!(player.id.as_str(), id);
    assert_eq!(player.name, name);
}

#[then("no player is set")]
async fn no_player(world: &mut SessionWorld) {
    assert_eq!(world.state().player, None);
}

#[then("the session state is unchanged")]
async fn state_unchanged(world: &mut SessionWorld) {
    let recorded = world
        .recorded_state
        .as_ref()
        .expect("no state was recorded");
    assert_eq!(world.state(), recorded);
}

#[then("a notice was raised")]
async fn notice_raised(world: &mut SessionWorld) {
    assert!(!world.notices.is_empty(), "no notice was raised");
}

#[then(expr = "a notice containing {string} was raised")]
async fn notice_containing(world: &mut SessionWorld, text: String) {
    assert!(
        world.notices.iter().any(|n| n.message.contains(&text)),
        "no notice contains '{}': {:?}",
        text,
        world.notices
    );
}

#[then(expr = "the stored token is {string}")]
async fn stored_token_is(world: &mut SessionWorld, token: String) {
    assert_eq!(world.store.load(), Some(token));
}

#[then("no session token is stored anymore")]
async fn token_gone(world: &mut SessionWorld) {
    assert_eq!(world.store.load(), None);
    assert_eq!(world.manager.cached_token(), None);
}

#[then(expr = "the cached token is {string}")]
async fn cached_token_is(world: &mut SessionWorld, token: String) {
    assert_eq!(world.manager.cached_token(), Some(token.as_str()));
}

#[then("the client has no cached token")]
async fn no_cached_token(world: &mut SessionWorld) {
    assert_eq!(world.manager.cached_token(), None);
}
