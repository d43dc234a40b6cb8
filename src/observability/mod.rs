//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator stages and RPC calls produce:
//!     → tracing events with structured fields (method, request_id, txid)
//!
//! Consumers:
//!     → stderr via the fmt layer, filtered by RUST_LOG or config level
//! ```

pub mod logging;

pub use logging::init_tracing;
