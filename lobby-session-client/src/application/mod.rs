mod config;
mod manager;
mod runtime;

pub use config::{build_ws_url, ClientConfig};
pub use manager::{PendingJoin, SessionManager, SessionSnapshot};
pub use runtime::{SessionHandle, SessionRuntime};
