//! Wallet setup and wallet-scoped operations.
//!
//! A [`Wallet`] can only be obtained through [`Wallet::ensure`], so every
//! address, mining and transaction call runs against a wallet the node has
//! loaded.

use serde_json::json;

use crate::blockchain::client::NodeClient;
use crate::blockchain::types::{BalanceBreakdown, Balances, BlockchainResult};

/// How `ensure` obtained the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletSetup {
    /// The wallet did not exist and was created.
    Created,
    /// The wallet existed on disk and was loaded.
    Loaded,
    /// The wallet was already loaded by the node.
    AlreadyLoaded,
}

/// Handle to a named wallet loaded on the node.
#[derive(Debug, Clone)]
pub struct Wallet {
    name: String,
    rpc: NodeClient,
}

impl Wallet {
    /// Make sure the named wallet exists and is loaded, creating it if needed.
    ///
    /// Existence is checked up front. A node that reports the wallet as
    /// already present (e.g., a concurrent creator won the race) is treated
    /// as success; every other fault propagates.
    pub async fn ensure(node: &NodeClient, name: &str) -> BlockchainResult<(Self, WalletSetup)> {
        let setup = if node.list_wallets().await?.iter().any(|w| w == name) {
            WalletSetup::AlreadyLoaded
        } else if node.list_wallet_dir().await?.iter().any(|w| w == name) {
            Self::load(node, name).await?
        } else {
            match node.create_wallet(name).await {
                Ok(created) => {
                    if let Some(warning) = created.warning.filter(|w| !w.is_empty()) {
                        tracing::warn!(wallet = name, warning = %warning, "Node warning on wallet creation");
                    }
                    WalletSetup::Created
                }
                Err(e) if e.is_wallet_already_present() => {
                    tracing::debug!(wallet = name, error = %e, "Wallet appeared during creation");
                    Self::load(node, name).await?
                }
                Err(e) => return Err(e),
            }
        };

        tracing::info!(wallet = name, setup = ?setup, "Wallet ready");

        let rpc = node.wallet_scoped(name)?;
        Ok((
            Self {
                name: name.to_string(),
                rpc,
            },
            setup,
        ))
    }

    async fn load(node: &NodeClient, name: &str) -> BlockchainResult<WalletSetup> {
        match node.load_wallet(name).await {
            Ok(_) => Ok(WalletSetup::Loaded),
            Err(e) if e.is_wallet_already_present() => Ok(WalletSetup::AlreadyLoaded),
            Err(e) => Err(e),
        }
    }

    /// Wallet name on the node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wallet-scoped RPC client.
    pub fn rpc(&self) -> &NodeClient {
        &self.rpc
    }

    /// Request a fresh receiving address.
    pub async fn new_address(&self) -> BlockchainResult<String> {
        self.rpc.call("getnewaddress", json!([])).await
    }

    /// Mine `count` blocks paying the coinbase to `address`.
    ///
    /// Returns the hashes of the generated blocks.
    pub async fn generate_to_address(&self, count: u32, address: &str) -> BlockchainResult<Vec<String>> {
        let hashes: Vec<String> = self
            .rpc
            .call("generatetoaddress", json!([count, address]))
            .await?;

        tracing::info!(
            wallet = %self.name,
            requested = count,
            mined = hashes.len(),
            tip = hashes.last().map(String::as_str).unwrap_or_default(),
            "Blocks generated"
        );
        Ok(hashes)
    }

    /// Current balances owned by this wallet.
    pub async fn balances(&self) -> BlockchainResult<BalanceBreakdown> {
        let balances: Balances = self.rpc.call("getbalances", json!([])).await?;
        Ok(balances.mine)
    }
}
