//! Move selection for automated opponents.

mod agent;
mod random;

pub use agent::Agent;
pub use random::{RandomAgent, DEFAULT_ATTEMPTS};
