//! opreturn-courier
//!
//! Drives a regtest node over JSON-RPC: ensures a wallet, mines funds into
//! it, broadcasts one payment carrying an `OP_RETURN` message and writes the
//! resulting txid to a file.
//!
//! ```text
//!   config.toml ─┐
//!   COURIER_RPC_URL ─┼─▶ CourierConfig ─▶ Orchestrator ──JSON-RPC──▶ node
//!   CLI flags ───┘                         │
//!                                          └─▶ out.txt (txid)
//! ```

use std::path::PathBuf;

use clap::Parser;
use opreturn_courier::config::{self, ConfigError, CourierConfig};
use opreturn_courier::observability::init_tracing;
use opreturn_courier::Orchestrator;

#[derive(Parser)]
#[command(name = "opreturn-courier")]
#[command(about = "Broadcast a payment with an OP_RETURN message on a regtest node", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node endpoint URL with embedded credentials.
    #[arg(long)]
    rpc_url: Option<String>,

    /// Wallet to create or load.
    #[arg(short, long)]
    wallet: Option<String>,

    /// Payment recipient address.
    #[arg(short, long)]
    recipient: Option<String>,

    /// Message embedded in the null-data output.
    #[arg(short, long)]
    message: Option<String>,

    /// Payment amount in BTC.
    #[arg(long)]
    amount_btc: Option<f64>,

    /// Fee rate in sat/vB.
    #[arg(long)]
    fee_rate: Option<f64>,

    /// Blocks to mine before spending; repeat for several requests.
    #[arg(long = "mine")]
    funding_blocks: Vec<u32>,

    /// File receiving the broadcast txid.
    #[arg(short, long)]
    output: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut CourierConfig) {
        if let Some(url) = self.rpc_url {
            config.node.endpoint_url = url;
        }
        if let Some(wallet) = self.wallet {
            config.wallet.name = wallet;
        }
        if let Some(recipient) = self.recipient {
            config.payment.recipient_address = recipient;
        }
        if let Some(message) = self.message {
            config.payment.message = message;
        }
        if let Some(amount) = self.amount_btc {
            config.payment.amount_btc = amount;
        }
        if let Some(rate) = self.fee_rate {
            config.payment.fee_rate_sat_vb = rate;
        }
        if !self.funding_blocks.is_empty() {
            config.mining.funding_blocks = self.funding_blocks;
        }
        if let Some(output) = self.output {
            config.output.path = output;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => CourierConfig::default(),
    };
    config::apply_env_overrides(&mut config);
    cli.apply(&mut config);
    config::validate_config(&config).map_err(ConfigError::Validation)?;

    init_tracing(&config.observability.log_level);

    tracing::info!(
        wallet = %config.wallet.name,
        recipient = %config.payment.recipient_address,
        amount_btc = config.payment.amount_btc,
        fee_rate_sat_vb = config.payment.fee_rate_sat_vb,
        funding_blocks = ?config.mining.funding_blocks,
        output = %config.output.path,
        "Configuration loaded"
    );

    let report = Orchestrator::new(config).run().await?;

    println!("Broadcasted TXID: {}", report.txid);
    tracing::info!(
        chain = %report.chain,
        wallet_setup = ?report.wallet_setup,
        blocks_mined = report.blocks_mined,
        "Run complete"
    );
    Ok(())
}
