//! Waiting for mined funds to become spendable.
//!
//! Freshly mined coinbase outputs show up in the wallet's balance view with a
//! short lag. The balance is polled with backoff until it strictly exceeds
//! the intended spend, bounded by a timeout.

use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::blockchain::{Amount, Wallet};
use crate::config::FundingConfig;
use crate::orchestrator::OrchestratorError;
use crate::resilience::Backoff;

/// Poll the wallet until its trusted balance exceeds `required`.
///
/// Returns the balance that satisfied the check. RPC faults end the wait
/// immediately.
pub async fn wait_for_funds(
    wallet: &Wallet,
    required: Amount,
    config: &FundingConfig,
) -> Result<Amount, OrchestratorError> {
    let mut last_seen = Amount::ZERO;
    let mut backoff = Backoff::new(config.poll_interval_ms, config.max_poll_interval_ms);

    let poll = async {
        loop {
            let balances = wallet.balances().await?;
            last_seen = balances.trusted();

            if last_seen > required {
                return Ok::<_, OrchestratorError>(last_seen);
            }

            let delay = backoff.next_delay();
            tracing::debug!(
                wallet = wallet.name(),
                trusted = %last_seen,
                pending = %balances.untrusted_pending(),
                immature = %balances.immature(),
                required = %required,
                polls = backoff.polls(),
                "Waiting for spendable balance"
            );
            sleep(delay).await;
        }
    };

    let outcome = timeout(Duration::from_secs(config.timeout_secs), poll).await;
    match outcome {
        Ok(result) => {
            let available = result?;
            tracing::info!(wallet = wallet.name(), balance = %available, "Wallet funded");
            Ok(available)
        }
        Err(_) => Err(OrchestratorError::FundingTimeout {
            required,
            available: last_seen,
            waited_secs: config.timeout_secs,
        }),
    }
}
