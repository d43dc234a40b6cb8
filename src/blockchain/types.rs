//! Node-facing types and error definitions.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Generic wallet error (Bitcoin Core `RPC_WALLET_ERROR`).
pub const RPC_WALLET_ERROR: i64 = -4;
/// Not enough funds in wallet or account.
pub const RPC_WALLET_INSUFFICIENT_FUNDS: i64 = -6;
/// This same wallet is already loaded.
pub const RPC_WALLET_ALREADY_LOADED: i64 = -35;
/// There is already a wallet with the same name.
pub const RPC_WALLET_ALREADY_EXISTS: i64 = -36;

const SATS_PER_BTC: u64 = 100_000_000;

/// Errors that can occur while talking to the node.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Endpoint URL could not be parsed or scoped.
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// HTTP transport failed before a response arrived.
    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-JSON response with a failing HTTP status (e.g., bad credentials).
    #[error("RPC HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Node { code: i64, message: String },

    /// Response could not be decoded into the expected shape.
    #[error("Failed to decode {method} response: {reason}")]
    Decode { method: String, reason: String },

    /// RPC request timed out.
    #[error("RPC {method} timed out after {secs} seconds")]
    Timeout { method: String, secs: u64 },

    /// The wallet could not produce a complete signature set.
    #[error("Transaction signing incomplete: {0}")]
    IncompleteSignature(String),

    /// The node returned something that is not a transaction id.
    #[error("Invalid transaction id '{0}'")]
    InvalidTxid(String),

    /// Null-data payload is not valid hex or not UTF-8.
    #[error("Invalid message payload: {0}")]
    InvalidMessage(String),
}

impl BlockchainError {
    /// Whether the node reported that the wallet already exists or is loaded.
    ///
    /// Dedicated codes are preferred. Older nodes only return the generic
    /// wallet error for an existing database, so that code is matched on its
    /// message as well.
    pub fn is_wallet_already_present(&self) -> bool {
        match self {
            BlockchainError::Node { code, .. }
                if *code == RPC_WALLET_ALREADY_LOADED || *code == RPC_WALLET_ALREADY_EXISTS =>
            {
                true
            }
            BlockchainError::Node { code, message } if *code == RPC_WALLET_ERROR => {
                message.contains("already exists")
            }
            _ => false,
        }
    }
}

/// Result type for node operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// An amount of coin, held as integer satoshis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);
    /// Total supply cap; no valid output can carry more.
    pub const MAX_MONEY: Amount = Amount(21_000_000 * SATS_PER_BTC);

    pub fn from_sat(sats: u64) -> Self {
        Self(sats)
    }

    /// Convert a BTC value as reported by the node. Negative values clamp to zero.
    pub fn from_btc(btc: f64) -> Self {
        if !btc.is_finite() || btc <= 0.0 {
            return Self::ZERO;
        }
        Self((btc * SATS_PER_BTC as f64).round() as u64)
    }

    pub fn to_sat(self) -> u64 {
        self.0
    }

    pub fn to_btc(self) -> f64 {
        self.0 as f64 / SATS_PER_BTC as f64
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:08} BTC",
            self.0 / SATS_PER_BTC,
            self.0 % SATS_PER_BTC
        )
    }
}

// The node's JSON interface expresses amounts in BTC.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_btc())
    }
}

/// Fee rate in satoshis per virtual byte.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FeeRate(f64);

impl FeeRate {
    pub fn from_sat_per_vb(rate: f64) -> Self {
        Self(rate)
    }

    pub fn sat_per_vb(self) -> f64 {
        self.0
    }

    /// The `feeRate` option unit: BTC per 1000 virtual bytes.
    pub fn btc_per_kvb(self) -> f64 {
        // Rounded to whole satoshis per kvB to avoid float noise on the wire.
        (self.0 * 1000.0).round() / SATS_PER_BTC as f64
    }
}

/// A 32-byte transaction identifier in its 64-char hex form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Txid(String);

impl Txid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Txid {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(BlockchainError::InvalidTxid(s.to_string()))
        }
    }
}

impl fmt::Display for Txid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subset of `getblockchaininfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockchainInfo {
    pub chain: String,
    pub blocks: u64,
    #[serde(default)]
    pub bestblockhash: String,
    #[serde(default)]
    pub initialblockdownload: bool,
}

/// `listwalletdir` result.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletDir {
    pub wallets: Vec<WalletDirEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletDirEntry {
    pub name: String,
}

/// `createwallet` / `loadwallet` result.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadedWallet {
    pub name: String,
    #[serde(default)]
    pub warning: Option<String>,
}

/// `getbalances` result.
#[derive(Debug, Clone, Deserialize)]
pub struct Balances {
    pub mine: BalanceBreakdown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceBreakdown {
    pub trusted: f64,
    #[serde(default)]
    pub untrusted_pending: f64,
    #[serde(default)]
    pub immature: f64,
}

impl BalanceBreakdown {
    pub fn trusted(&self) -> Amount {
        Amount::from_btc(self.trusted)
    }

    pub fn untrusted_pending(&self) -> Amount {
        Amount::from_btc(self.untrusted_pending)
    }

    pub fn immature(&self) -> Amount {
        Amount::from_btc(self.immature)
    }
}
