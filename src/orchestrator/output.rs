//! Local output of the broadcast transaction id.

use std::fs;
use std::path::Path;

use crate::blockchain::Txid;
use crate::orchestrator::OrchestratorError;

/// Write `txid` as the entire contents of `path`, replacing any existing file.
///
/// No trailing newline is written.
pub fn persist_txid(txid: &Txid, path: &Path) -> Result<(), OrchestratorError> {
    fs::write(path, txid.as_str()).map_err(|source| OrchestratorError::Output {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), txid = %txid, "Transaction id written");
    Ok(())
}
