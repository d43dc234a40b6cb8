//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (amounts within one satoshi and the supply cap,
//!   fee rates positive, timeouts > 0)
//! - Check the endpoint URL is an HTTP(S) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CourierConfig → Result<(), Vec<ValidationError>>
//! - Runs after file, env and CLI layers are merged, before the orchestrator

use std::fmt;

use url::Url;

use crate::blockchain::Amount;
use crate::config::schema::CourierConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "payment.amount_btc").
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &CourierConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.node.endpoint_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "node.endpoint_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        // The parse error never echoes the URL, so credentials stay out of logs.
        Err(e) => errors.push(ValidationError::new(
            "node.endpoint_url",
            format!("invalid URL: {}", e),
        )),
    }

    if config.node.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "node.rpc_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.wallet.name.trim().is_empty() {
        errors.push(ValidationError::new("wallet.name", "must not be empty"));
    }

    if config.payment.recipient_address.trim().is_empty() {
        errors.push(ValidationError::new(
            "payment.recipient_address",
            "must not be empty",
        ));
    }

    let amount = config.payment.amount_btc;
    if !amount.is_finite() || amount <= 0.0 {
        errors.push(ValidationError::new(
            "payment.amount_btc",
            format!("must be a positive amount, got {}", amount),
        ));
    } else if amount > Amount::MAX_MONEY.to_btc() {
        errors.push(ValidationError::new(
            "payment.amount_btc",
            format!("must not exceed {}, got {}", Amount::MAX_MONEY, amount),
        ));
    } else if Amount::from_btc(amount) == Amount::ZERO {
        errors.push(ValidationError::new(
            "payment.amount_btc",
            format!("must be at least one satoshi, got {}", amount),
        ));
    }

    let fee_rate = config.payment.fee_rate_sat_vb;
    if !fee_rate.is_finite() || fee_rate <= 0.0 {
        errors.push(ValidationError::new(
            "payment.fee_rate_sat_vb",
            format!("must be a positive rate, got {}", fee_rate),
        ));
    }

    if config.mining.funding_blocks.is_empty() {
        errors.push(ValidationError::new(
            "mining.funding_blocks",
            "must contain at least one block count",
        ));
    } else if config.mining.funding_blocks.contains(&0) {
        errors.push(ValidationError::new(
            "mining.funding_blocks",
            "block counts must be greater than zero",
        ));
    }

    if config.funding.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "funding.poll_interval_ms",
            "must be greater than zero",
        ));
    }

    if config.funding.max_poll_interval_ms < config.funding.poll_interval_ms {
        errors.push(ValidationError::new(
            "funding.max_poll_interval_ms",
            "must not be smaller than funding.poll_interval_ms",
        ));
    }

    if config.funding.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "funding.timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.output.path.trim().is_empty() {
        errors.push(ValidationError::new("output.path", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
