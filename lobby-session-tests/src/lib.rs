use cucumber::World;
use lobby_session_client::{
    ClientConfig, ClientError, MemoryTokenStore, MockConnector, PendingJoin, SessionManager,
    TokenStore,
};
use lobby_session_core::{JoinOutcome, Notice, SessionState};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, World)]
pub struct SessionWorld {
    /// Token store shared by every manager in the scenario
    pub store: MemoryTokenStore,

    /// Plays the server side of every socket
    pub connector: MockConnector,

    /// The manager under test
    pub manager: SessionManager,

    /// A second manager on the same store (another "tab")
    pub sibling: Option<SessionManager>,

    /// Result of the last operation that can fail
    pub last_result: Option<Result<(), String>>,

    /// Join requests by the label the scenario gave them
    pub joins: HashMap<String, PendingJoin>,

    /// Notices collected from the manager
    pub notices: Vec<Notice>,

    /// State captured for before/after comparisons
    pub recorded_state: Option<SessionState>,
}

impl Default for SessionWorld {
    fn default() -> Self {
        Self::with_config(ClientConfig::default())
    }
}

impl SessionWorld {
    pub fn with_config(config: ClientConfig) -> Self {
        let store = MemoryTokenStore::new();
        let connector = MockConnector::new();
        let manager = Self::build_manager(config, &store, &connector);

        Self {
            store,
            connector,
            manager,
            sibling: None,
            last_result: None,
            joins: HashMap::new(),
            notices: Vec::new(),
            recorded_state: None,
        }
    }

    pub fn build_manager(
        config: ClientConfig,
        store: &MemoryTokenStore,
        connector: &MockConnector,
    ) -> SessionManager {
        SessionManager::new(config, Arc::new(store.clone()), Arc::new(connector.clone()))
    }

    /// Replace the manager, keeping store and connector
    pub fn reconfigure(&mut self, config: ClientConfig) {
        self.manager = Self::build_manager(config, &self.store, &self.connector);
    }

    pub fn record<T>(&mut self, result: Result<T, ClientError>) {
        self.last_result = Some(result.map(|_| ()).map_err(|e| e.to_string()));
    }

    /// Process everything queued and collect notices
    pub fn pump(&mut self) {
        self.manager.pump();
        self.notices.extend(self.manager.drain_notices());
    }

    pub fn connect(&mut self) {
        let result = self.manager.connect();
        self.record(result);
        self.pump();
    }

    /// Index of the socket opened last
    pub fn socket(&self) -> usize {
        self.connector
            .latest()
            .expect("no socket has been opened")
    }

    /// Deliver a raw frame on the current socket and process it
    pub fn receive(&mut self, text: &str) {
        self.connector.push_text(self.socket(), text);
        self.pump();
    }

    pub fn receive_json(&mut self, frame: Value) {
        self.receive(&frame.to_string());
    }

    /// Log in as `id`/`name`: store a token, connect and receive `welcome`
    pub fn log_in(&mut self, id: &str, name: &str) {
        self.store.store("test-token").expect("store token");
        self.connect();
        self.receive_json(json!({
            "type": "welcome",
            "player": { "id": id, "name": name },
            "lobbies": [],
        }));
    }

    pub fn state(&self) -> &SessionState {
        self.manager.state()
    }

    pub fn take_outcome(&mut self, label: &str) -> JoinOutcome {
        let mut pending = self
            .joins
            .remove(label)
            .unwrap_or_else(|| panic!("no join request labelled '{}'", label));
        pending
            .try_outcome()
            .unwrap_or_else(|| panic!("join request '{}' is still pending", label))
    }
}

/// A lobby payload as the server sends it
pub fn lobby_json(id: &str, name: &str, max_players: u8, players: &[&str], ready: &[&str]) -> Value {
    json!({
        "id": id,
        "name": name,
        "maxPlayers": max_players,
        "isPrivate": false,
        "password": "",
        "players": players
            .iter()
            .map(|p| json!({ "id": p, "name": p }))
            .collect::<Vec<_>>(),
        "gameStart": ready
            .iter()
            .map(|p| json!({ "playerID": p }))
            .collect::<Vec<_>>(),
    })
}

/// Split a comma separated step argument ("p1, p2") into ids
pub fn id_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
