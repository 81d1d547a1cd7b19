mod connection;
#[cfg(any(test, feature = "test-support"))]
mod mock;
mod token_store;
mod websocket;

pub use connection::{ConnectionHandle, Connector, Outgoing, SocketEvent, SocketEventKind};
#[cfg(any(test, feature = "test-support"))]
pub use mock::MockConnector;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
pub use websocket::WebSocketConnector;
