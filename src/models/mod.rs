//! Data structures for the tournament core: players and live sessions.

mod player;
mod session;

pub use player::{Player, PlayerId, PlayerKind};
pub use session::{RoundInfo, TournamentId, TournamentSession};
