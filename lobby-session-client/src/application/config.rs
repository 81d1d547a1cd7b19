use crate::error::{ClientError, Result};
use lobby_session_core::protocol::{AUTH_ERROR_CLOSE_CODE, POLICY_VIOLATION_CLOSE_CODE};
use std::time::Duration;
use url::Url;

/// Server the client talks to when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:4000/ws";

/// Configuration for a session manager
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint, always `ws(s)://<host>/ws`
    pub endpoint: String,

    /// How long a join request may stay unanswered
    pub request_timeout: Duration,

    /// Close codes that mean "your credentials are no good"
    pub auth_close_codes: Vec<u16>,

    /// Capacity of the socket event channel
    pub event_buffer: usize,

    /// Join requests that may be in flight at once
    pub max_pending_joins: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(10),
            auth_close_codes: vec![AUTH_ERROR_CLOSE_CODE, POLICY_VIOLATION_CLOSE_CODE],
            event_buffer: 256,
            max_pending_joins: 16,
        }
    }
}

impl ClientConfig {
    /// Config for the server at `base` (see [`build_ws_url`])
    pub fn new(base: &str) -> Result<Self> {
        Ok(Self {
            endpoint: build_ws_url(base)?.to_string(),
            ..Default::default()
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_auth_close_codes(mut self, codes: Vec<u16>) -> Self {
        self.auth_close_codes = codes;
        self
    }

    pub fn with_event_buffer(mut self, size: usize) -> Self {
        self.event_buffer = size.max(1);
        self
    }

    pub fn with_max_pending_joins(mut self, max: usize) -> Self {
        self.max_pending_joins = max;
        self
    }
}

/// Turn a server address ("localhost:4000", "https://host", "ws://host/x")
/// into the lobby WebSocket URL.
///
/// `http(s)` maps to `ws(s)` and the path is forced to `/ws`.
pub fn build_ws_url(base: &str) -> Result<Url> {
    let base = base.trim();
    let mut url = match Url::parse(base) {
        // "localhost:4000" parses with "localhost" as its scheme
        Ok(url) if url.host_str().is_some() => url,
        _ => Url::parse(&format!("http://{}", base))?,
    };

    match url.scheme() {
        "http" => url.set_scheme("ws").ok(),
        "https" => url.set_scheme("wss").ok(),
        "ws" | "wss" => Some(()),
        _ => None,
    }
    .ok_or_else(|| ClientError::InvalidEndpoint(format!("unsupported scheme: {}", url.scheme())))?;

    if url.path() != "/ws" {
        url.set_path("/ws");
    }
    url.set_query(None);
    Ok(url)
}
