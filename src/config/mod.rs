//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → COURIER_RPC_URL / CLI flag overrides
//!     → validation.rs (semantic checks)
//!     → CourierConfig (validated, immutable)
//!     → passed by value to the orchestrator
//! ```
//!
//! # Design Decisions
//! - Config is immutable for the lifetime of a run
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Validation runs once, after every override layer

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    apply_env_overrides, apply_overrides_from, load_config, ConfigError, RPC_URL_ENV_VAR,
};
pub use schema::{
    CourierConfig, FundingConfig, MiningConfig, NodeConfig, ObservabilityConfig, OutputConfig,
    PaymentConfig, WalletConfig,
};
pub use validation::{validate_config, ValidationError};
