mod commands;
mod effects;
mod pending;
mod session_machine;

pub use commands::{ActionError, LobbyAction};
pub use effects::{JoinOutcome, Notice, NoticeLevel, SessionEffect};
pub use pending::{PendingError, PendingJoins};
pub use session_machine::{SessionMachine, SessionState};
