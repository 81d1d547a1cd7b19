pub mod lobby;
pub mod page;
pub mod player;

pub use lobby::{Lobby, LobbyError, LobbyId, LobbySummary, ReadyMark};
pub use page::Page;
pub use player::{Player, PlayerId};

use serde::{Deserialize, Deserializer};

/// The lobby server marshals empty lists as `null`; treat them as empty.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
