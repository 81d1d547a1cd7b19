use crate::domain::{LobbyId, Page};
use crate::protocol::RequestId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Transient, user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{}] {}", label, self.message)
    }
}

/// How a `join_lobby` request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined(LobbyId),
    WrongPassword,
    Full,
    /// Rejected for another reason, as reported by the server
    Rejected(String),
    /// No answer within the request timeout
    Expired,
    /// The connection went away before an answer arrived
    Disconnected,
}

impl fmt::Display for JoinOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinOutcome::Joined(id) => write!(f, "joined lobby {}", id),
            JoinOutcome::WrongPassword => write!(f, "wrong password"),
            JoinOutcome::Full => write!(f, "lobby is full"),
            JoinOutcome::Rejected(reason) => write!(f, "rejected: {}", reason),
            JoinOutcome::Expired => write!(f, "no answer from server"),
            JoinOutcome::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Side effects the session machine asks its owner to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Show a notice to the user
    Notify(Notice),

    /// The current page changed
    PageChanged { from: Page, to: Page },

    /// A tracked join request has an answer
    JoinResolved {
        request_id: RequestId,
        outcome: JoinOutcome,
    },

    /// The stored credential is no longer valid: clear it and close the socket
    ClearCredentials,
}
