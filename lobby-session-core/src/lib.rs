pub mod application;
pub mod domain;
pub mod protocol;

pub use application::{
    ActionError, JoinOutcome, LobbyAction, Notice, NoticeLevel, PendingError, PendingJoins,
    SessionEffect, SessionMachine, SessionState,
};
pub use domain::{Lobby, LobbyError, LobbyId, LobbySummary, Page, Player, PlayerId, ReadyMark};
pub use protocol::{
    ClientFrame, InboundFrame, OutboundFrame, ProtocolError, RequestId, ServerFrame, Welcome,
};
