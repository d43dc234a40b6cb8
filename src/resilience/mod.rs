//! Resilience helpers.
//!
//! Remote calls are never retried. Backoff only paces the balance poll that
//! waits for freshly mined funds to become spendable.

pub mod backoff;

pub use backoff::Backoff;
