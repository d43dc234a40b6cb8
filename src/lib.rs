//! Regtest courier: funds a node wallet and broadcasts a payment carrying an
//! `OP_RETURN` message over JSON-RPC.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod orchestrator;
pub mod resilience;

pub use config::CourierConfig;
pub use orchestrator::{Orchestrator, OrchestratorError, RunReport};
