//! Run orchestration.
//!
//! # Data Flow
//! ```text
//! CourierConfig
//!     → NodeClient (chain info check)
//!     → Wallet::ensure (create or load)
//!     → new address → funding blocks → wait_for_funds
//!     → TxBuilder::send_with_message (create → fund → sign → broadcast)
//!     → confirmation blocks
//!     → output::persist_txid
//! ```
//!
//! Every step is awaited before the next one starts. The first fault ends
//! the run and nothing is written locally.

pub mod funding;
pub mod output;

use std::path::Path;
use thiserror::Error;

use crate::blockchain::{
    Amount, BlockchainError, FeeRate, NodeClient, TxBuilder, Txid, Wallet, WalletSetup,
};
use crate::config::CourierConfig;

pub use funding::wait_for_funds;
pub use output::persist_txid;

/// Coinbase outputs become spendable after this many confirmations.
pub const COINBASE_MATURITY: u64 = 100;

/// Errors that end a courier run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    /// Wallet balance never covered the spend.
    #[error("Wallet balance {available} did not exceed {required} within {waited_secs} seconds")]
    FundingTimeout {
        required: Amount,
        available: Amount,
        waited_secs: u64,
    },

    /// Writing the txid file failed.
    #[error("Failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// What a successful run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub wallet_setup: WalletSetup,
    pub address: String,
    pub chain: String,
    pub blocks_mined: u64,
    pub txid: Txid,
}

/// Sequences the node calls for one run.
pub struct Orchestrator {
    config: CourierConfig,
}

impl Orchestrator {
    /// Create an orchestrator for an already validated configuration.
    pub fn new(config: CourierConfig) -> Self {
        Self { config }
    }

    /// Execute the full run.
    pub async fn run(&self) -> Result<RunReport, OrchestratorError> {
        let node = NodeClient::new(&self.config.node)?;

        let info = node.get_blockchain_info().await?;
        tracing::info!(
            chain = %info.chain,
            blocks = info.blocks,
            best_block = %info.bestblockhash,
            initial_block_download = info.initialblockdownload,
            "Connected to node"
        );

        let (wallet, wallet_setup) = Wallet::ensure(&node, &self.config.wallet.name).await?;
        let address = wallet.new_address().await?;
        tracing::info!(wallet = wallet.name(), address = %address, "Coinbase address generated");

        let mining = &self.config.mining;
        if mining.total_funding_blocks() <= COINBASE_MATURITY && wallet_setup == WalletSetup::Created {
            tracing::warn!(
                funding_blocks = mining.total_funding_blocks(),
                "A new wallet needs more than {} blocks before any coinbase is spendable",
                COINBASE_MATURITY
            );
        }

        let mut blocks_mined = 0u64;
        for &count in &mining.funding_blocks {
            blocks_mined += wallet.generate_to_address(count, &address).await?.len() as u64;
        }

        let payment = &self.config.payment;
        let amount = Amount::from_btc(payment.amount_btc);
        funding::wait_for_funds(&wallet, amount, &self.config.funding).await?;

        let txid = TxBuilder::new(&wallet)
            .send_with_message(
                &payment.recipient_address,
                &payment.message,
                amount,
                FeeRate::from_sat_per_vb(payment.fee_rate_sat_vb),
            )
            .await?;

        if mining.confirmation_blocks > 0 {
            blocks_mined += wallet
                .generate_to_address(mining.confirmation_blocks, &address)
                .await?
                .len() as u64;
        }

        output::persist_txid(&txid, Path::new(&self.config.output.path))?;

        Ok(RunReport {
            wallet_setup,
            address,
            chain: info.chain,
            blocks_mined,
            txid,
        })
    }
}
