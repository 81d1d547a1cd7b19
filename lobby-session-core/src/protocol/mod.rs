//! JSON wire protocol spoken over the lobby WebSocket.
//!
//! Every frame is a JSON object tagged with `type`. Outbound frames carry a
//! client-generated `requestID`; the server may echo it on the frame that
//! answers the request.
//!
//! Handshake: the first frame on a fresh socket is always
//! `{"type":"authenticate","token":"…"}`. The token never appears in the
//! endpoint URL or in any other frame.

mod client_frame;
mod error;
mod server_frame;

pub use client_frame::{ClientFrame, OutboundFrame, RequestId};
pub use error::ProtocolError;
pub use server_frame::{decode, InboundFrame, ServerFrame, Welcome, KNOWN_TAGS};

/// Close code the server uses when it rejects the session's credentials
pub const AUTH_ERROR_CLOSE_CODE: u16 = 4001;

/// RFC 6455 "policy violation", also treated as an authentication close
pub const POLICY_VIOLATION_CLOSE_CODE: u16 = 1008;

const AUTH_ERROR_MARKERS: [&str; 5] = [
    "token",
    "unauthorized",
    "unauthenticated",
    "authentication",
    "player not found",
];

/// Whether an `error` frame reports a missing, invalid or expired credential
pub fn is_auth_error(message: &str) -> bool {
    let message = message.to_lowercase();
    AUTH_ERROR_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
