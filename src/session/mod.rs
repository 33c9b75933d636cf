//! Automated play: the turn-protocol driver and its bookkeeping.

mod driver;
mod stats;

pub use driver::BotSession;
pub use stats::{SessionStats, SessionSummary};
