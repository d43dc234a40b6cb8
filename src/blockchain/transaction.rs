//! Transaction building, funding, signing and broadcast.
//!
//! # Responsibilities
//! - Encode the message as a null-data payload
//! - Build the output set (one payment, one null-data entry)
//! - Drive the node through create → fund → sign → broadcast
//!
//! Every stage consumes the previous stage's output. Nothing is retried: a
//! fault at any stage ends the send before later stages are attempted.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use crate::blockchain::types::{Amount, BlockchainError, BlockchainResult, FeeRate, Txid};
use crate::blockchain::wallet::Wallet;

/// Hex-encode a message's UTF-8 bytes for a null-data output.
pub fn encode_message(message: &str) -> String {
    hex::encode(message.as_bytes())
}

/// Decode a null-data payload back into text.
pub fn decode_message(payload: &str) -> BlockchainResult<String> {
    let bytes = hex::decode(payload).map_err(|e| BlockchainError::InvalidMessage(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| BlockchainError::InvalidMessage(e.to_string()))
}

/// One entry of a `createrawtransaction` output list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutput {
    /// Pay `amount` to `address`.
    Payment { address: String, amount: Amount },
    /// Null-data output carrying hex `data`.
    Data { data: String },
}

impl Serialize for TxOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            TxOutput::Payment { address, amount } => map.serialize_entry(address, amount)?,
            TxOutput::Data { data } => map.serialize_entry("data", data)?,
        }
        map.end()
    }
}

/// Output set paying `amount` to `recipient` and embedding `message`.
pub fn message_outputs(recipient: &str, amount: Amount, message: &str) -> Vec<TxOutput> {
    vec![
        TxOutput::Payment {
            address: recipient.to_string(),
            amount,
        },
        TxOutput::Data {
            data: encode_message(message),
        },
    ]
}

/// `fundrawtransaction` result.
#[derive(Debug, Clone, Deserialize)]
pub struct FundedTransaction {
    pub hex: String,
    /// Fee paid, in BTC.
    pub fee: f64,
    /// Position of the added change output, -1 if none.
    pub changepos: i64,
}

/// `signrawtransactionwithwallet` result.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedTransaction {
    pub hex: String,
    pub complete: bool,
    #[serde(default)]
    pub errors: Vec<Value>,
}

/// Drives the node-side transaction pipeline for one wallet.
pub struct TxBuilder<'a> {
    wallet: &'a Wallet,
}

impl<'a> TxBuilder<'a> {
    pub fn new(wallet: &'a Wallet) -> Self {
        Self { wallet }
    }

    /// Create an unsigned transaction with no inputs and the given outputs.
    pub async fn create_raw(&self, outputs: &[TxOutput]) -> BlockchainResult<String> {
        self.wallet
            .rpc()
            .call("createrawtransaction", json!([[], outputs]))
            .await
    }

    /// Let the wallet select inputs and add change at `fee_rate`.
    pub async fn fund(&self, raw_hex: &str, fee_rate: FeeRate) -> BlockchainResult<FundedTransaction> {
        let options = json!({ "feeRate": fee_rate.btc_per_kvb() });
        self.wallet
            .rpc()
            .call("fundrawtransaction", json!([raw_hex, options]))
            .await
    }

    /// Sign with wallet keys. An incomplete signature set is an error.
    pub async fn sign(&self, funded_hex: &str) -> BlockchainResult<SignedTransaction> {
        let signed: SignedTransaction = self
            .wallet
            .rpc()
            .call("signrawtransactionwithwallet", json!([funded_hex]))
            .await?;

        if !signed.complete {
            let detail = serde_json::to_string(&signed.errors).unwrap_or_default();
            return Err(BlockchainError::IncompleteSignature(detail));
        }
        Ok(signed)
    }

    /// Submit a signed transaction to the node's mempool.
    pub async fn broadcast(&self, signed_hex: &str) -> BlockchainResult<Txid> {
        let txid: String = self
            .wallet
            .rpc()
            .call("sendrawtransaction", json!([signed_hex]))
            .await?;
        txid.parse()
    }

    /// Pay `amount` to `recipient` with `message` embedded, returning the txid.
    pub async fn send_with_message(
        &self,
        recipient: &str,
        message: &str,
        amount: Amount,
        fee_rate: FeeRate,
    ) -> BlockchainResult<Txid> {
        let outputs = message_outputs(recipient, amount, message);
        let raw = self.create_raw(&outputs).await?;

        let funded = self.fund(&raw, fee_rate).await?;
        tracing::info!(
            wallet = self.wallet.name(),
            fee = %Amount::from_btc(funded.fee),
            fee_rate_sat_vb = fee_rate.sat_per_vb(),
            change_position = funded.changepos,
            "Transaction funded"
        );

        let signed = self.sign(&funded.hex).await?;
        let txid = self.broadcast(&signed.hex).await?;

        tracing::info!(
            wallet = self.wallet.name(),
            txid = %txid,
            recipient,
            amount = %amount,
            "Transaction broadcast"
        );
        Ok(txid)
    }
}
