//! Move-picking agents that drive the engine without a human player.

mod agent;
mod random;

pub use agent::Agent;
pub use random::RandomAgent;
