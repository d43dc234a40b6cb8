//! Node integration subsystem.
//!
//! # Data Flow
//! ```text
//! NodeConfig (endpoint URL with credentials)
//!     → client.rs (JSON-RPC transport, per-call timeouts)
//!     → wallet.rs (ensure wallet, addresses, mining, balances)
//!     → transaction.rs (create, fund, sign, broadcast)
//! ```
//!
//! # Security Constraints
//! - Credentials are split out of the URL and sent as basic auth
//! - Never log credentials
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::NodeClient;
pub use transaction::{decode_message, encode_message, message_outputs, TxBuilder, TxOutput};
pub use types::{Amount, BlockchainError, BlockchainResult, FeeRate, Txid};
pub use wallet::{Wallet, WalletSetup};
