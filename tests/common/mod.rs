//! In-process mock of a regtest node's JSON-RPC interface.

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri};
use axum::Json;
use axum::Router;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const MOCK_TXID: &str = "4f2d1c0a9b8e7d6c5b4a39281706f5e4d3c2b1a0998877665544332211000ffe";
pub const MOCK_ADDRESS: &str = "bcrt1qmockcoinbase0000000000000000000000000";
const SUBSIDY_BTC: f64 = 50.0;
const MATURITY: u64 = 100;

/// One JSON-RPC request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub wallet: Option<String>,
    pub method: String,
    pub params: Value,
}

/// Mutable node state shared with the HTTP handler.
#[derive(Debug, Default)]
pub struct NodeState {
    pub wallets_on_disk: BTreeSet<String>,
    pub loaded_wallets: BTreeSet<String>,
    /// Wallets on disk that `listwalletdir` does not report.
    pub unlisted_wallets: BTreeSet<String>,
    pub height: u64,
    /// Number of `getbalances` calls that report nothing spendable yet.
    pub lagging_balance_polls: u32,
    /// Signing reports `complete: false` with a missing-key error.
    pub incomplete_signature: bool,
    /// Replaces the txid returned by `sendrawtransaction`.
    pub broadcast_result: Option<Value>,
    /// Faults injected per method: (code, message).
    pub faults: HashMap<String, (i64, String)>,
    pub calls: Vec<RecordedCall>,
}

impl NodeState {
    pub fn with_wallet(name: &str, loaded: bool) -> Self {
        let mut state = Self::default();
        state.wallets_on_disk.insert(name.to_string());
        if loaded {
            state.loaded_wallets.insert(name.to_string());
        }
        state
    }

    pub fn fail(mut self, method: &str, code: i64, message: &str) -> Self {
        self.faults
            .insert(method.to_string(), (code, message.to_string()));
        self
    }

    fn trusted_balance(&self) -> f64 {
        self.height.saturating_sub(MATURITY) as f64 * SUBSIDY_BTC
    }
}

/// A running mock node.
pub struct MockNode {
    pub addr: std::net::SocketAddr,
    pub state: Arc<Mutex<NodeState>>,
}

impl MockNode {
    pub async fn start() -> Self {
        Self::start_with(NodeState::default()).await
    }

    pub async fn start_with(state: NodeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Endpoint URL with credentials, as a user would configure it.
    pub fn url(&self) -> String {
        format!("http://alice:password@{}", self.addr)
    }

    /// Endpoint URL without credentials.
    pub fn anonymous_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<Mutex<NodeState>>>,
    headers: HeaderMap,
    uri: Uri,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(Value::Null));
    }

    let method = request["method"].as_str().unwrap_or_default().to_string();
    let params = request.get("params").cloned().unwrap_or_else(|| json!([]));
    let wallet = uri
        .path()
        .strip_prefix("/wallet/")
        .map(|name| name.to_string());

    let mut node = state.lock().unwrap();
    node.calls.push(RecordedCall {
        wallet: wallet.clone(),
        method: method.clone(),
        params: params.clone(),
    });

    let fault = node.faults.get(&method).cloned();
    let outcome = match fault {
        Some(fault) => Err(fault),
        None => dispatch(&mut node, wallet.as_deref(), &method, &params),
    };

    match outcome {
        Ok(result) => (
            StatusCode::OK,
            Json(json!({ "result": result, "error": null, "id": id })),
        ),
        Err((code, message)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "result": null,
                "error": { "code": code, "message": message },
                "id": id,
            })),
        ),
    }
}

fn dispatch(
    node: &mut NodeState,
    wallet: Option<&str>,
    method: &str,
    params: &Value,
) -> Result<Value, (i64, String)> {
    let require_wallet = |node: &NodeState| match wallet {
        Some(name) if node.loaded_wallets.contains(name) => Ok(()),
        _ => Err((
            -18,
            "Requested wallet does not exist or is not loaded".to_string(),
        )),
    };

    match method {
        "getblockchaininfo" => Ok(json!({
            "chain": "regtest",
            "blocks": node.height,
            "bestblockhash": "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206",
            "initialblockdownload": false,
        })),
        "listwallets" => Ok(json!(node.loaded_wallets.iter().collect::<Vec<_>>())),
        "listwalletdir" => Ok(json!({
            "wallets": node
                .wallets_on_disk
                .iter()
                .filter(|name| !node.unlisted_wallets.contains(*name))
                .map(|name| json!({ "name": name }))
                .collect::<Vec<_>>(),
        })),
        "createwallet" => {
            let name = params[0].as_str().unwrap_or_default().to_string();
            if node.wallets_on_disk.contains(&name) {
                return Err((
                    -4,
                    format!(
                        "Wallet file verification failed. Failed to create database path '/regtest/wallets/{}'. Database already exists.",
                        name
                    ),
                ));
            }
            node.wallets_on_disk.insert(name.clone());
            node.loaded_wallets.insert(name.clone());
            Ok(json!({ "name": name, "warning": "" }))
        }
        "loadwallet" => {
            let name = params[0].as_str().unwrap_or_default().to_string();
            if node.loaded_wallets.contains(&name) {
                return Err((-35, format!("Wallet \"{}\" is already loaded.", name)));
            }
            if !node.wallets_on_disk.contains(&name) {
                return Err((-18, format!("Wallet file not found: {}", name)));
            }
            node.loaded_wallets.insert(name.clone());
            Ok(json!({ "name": name, "warning": "" }))
        }
        "getnewaddress" => {
            require_wallet(&*node)?;
            Ok(json!(MOCK_ADDRESS))
        }
        "generatetoaddress" => {
            let count = params[0].as_u64().unwrap_or_default();
            let hashes: Vec<String> = (0..count)
                .map(|i| format!("{:064x}", node.height + i + 1))
                .collect();
            node.height += count;
            Ok(json!(hashes))
        }
        "getbalances" => {
            require_wallet(&*node)?;
            let trusted = if node.lagging_balance_polls > 0 {
                node.lagging_balance_polls -= 1;
                0.0
            } else {
                node.trusted_balance()
            };
            Ok(json!({
                "mine": {
                    "trusted": trusted,
                    "untrusted_pending": 0.0,
                    "immature": node.height.min(MATURITY) as f64 * SUBSIDY_BTC,
                }
            }))
        }
        "createrawtransaction" => Ok(json!("0200000000010000000000")),
        "fundrawtransaction" => {
            require_wallet(&*node)?;
            Ok(json!({ "hex": "02000000funded", "fee": 0.0000294, "changepos": 1 }))
        }
        "signrawtransactionwithwallet" => {
            require_wallet(&*node)?;
            if node.incomplete_signature {
                return Ok(json!({
                    "hex": "02000000partial",
                    "complete": false,
                    "errors": [{
                        "txid": "00".repeat(32),
                        "vout": 0,
                        "error": "Unable to sign input, missing private key",
                    }],
                }));
            }
            Ok(json!({ "hex": "02000000signed", "complete": true }))
        }
        "sendrawtransaction" => Ok(node
            .broadcast_result
            .clone()
            .unwrap_or_else(|| json!(MOCK_TXID))),
        _ => Err((-32601, "Method not found".to_string())),
    }
}
