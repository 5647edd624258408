//! Session-store reconciliation.
//!
//! The engine compares local against remote metadata, plans an action per
//! session, and executes transfers through the generic
//! [`StorageBackend`] contract. Sessions are processed independently and
//! sequentially: one failed transfer is reported in that session's result
//! and never aborts the batch.

mod plan;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

pub use plan::{ConflictData, ConflictStrategy, PlannedAction, SyncAction, SyncPolicy, plan};

use crate::error::{StorageError, SyncError};
use crate::storage::StorageBackend;

/// Outcome of one session's sync action.
///
/// Conflicts report `success = true`: a detected divergence is a
/// successful detection, not a transfer failure.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
	pub success: bool,
	pub session_id: String,
	pub action: SyncAction,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub conflict: Option<ConflictData>,
}

/// Reconciles a local session store against a remote one.
///
/// Deletions are not tombstoned: a session deleted from one store and not
/// the other reappears on the next pass, because "absent" is
/// indistinguishable from "never existed."
pub struct SyncEngine {
	local: Arc<dyn StorageBackend>,
	remote: Arc<dyn StorageBackend>,
}

impl SyncEngine {
	pub fn new(local: Arc<dyn StorageBackend>, remote: Arc<dyn StorageBackend>) -> Self {
		Self { local, remote }
	}

	/// Lists both stores and computes the action plan without executing
	/// anything.
	pub async fn plan(&self, policy: &SyncPolicy) -> Result<Vec<PlannedAction>, SyncError> {
		let local = self.local.list().await.map_err(|source| SyncError::List {
			side: "local",
			source,
		})?;
		let remote = self.remote.list().await.map_err(|source| SyncError::List {
			side: "remote",
			source,
		})?;
		Ok(plan(&local, &remote, policy))
	}

	/// Plans and executes one reconciliation pass.
	///
	/// Idempotent: a second pass with no intervening mutation plans zero
	/// transfers.
	pub async fn sync(&self, policy: &SyncPolicy) -> Result<Vec<SyncResult>, SyncError> {
		let actions = self.plan(policy).await?;
		info!(target: "sp.sync", planned = actions.len(), "sync pass starting");

		let mut results = Vec::with_capacity(actions.len());
		for action in actions {
			results.push(self.execute(action).await);
		}
		Ok(results)
	}

	async fn execute(&self, planned: PlannedAction) -> SyncResult {
		let outcome = match planned.action {
			SyncAction::Upload => {
				self.transfer(&planned.session_id, &self.local, &self.remote)
					.await
			}
			SyncAction::Download => {
				self.transfer(&planned.session_id, &self.remote, &self.local)
					.await
			}
			SyncAction::Conflict => {
				let conflict = match (planned.local.clone(), planned.remote.clone()) {
					(Some(local), Some(remote)) => Some(ConflictData { local, remote }),
					_ => None,
				};
				info!(target: "sp.sync", session = %planned.session_id, "conflict reported for manual review");
				return SyncResult {
					success: true,
					session_id: planned.session_id,
					action: SyncAction::Conflict,
					message: Some("divergent updates; manual review required".into()),
					conflict,
				};
			}
		};

		match outcome {
			Ok(()) => {
				debug!(target: "sp.sync", session = %planned.session_id, action = ?planned.action, "session reconciled");
				SyncResult {
					success: true,
					session_id: planned.session_id,
					action: planned.action,
					message: None,
					conflict: None,
				}
			}
			Err(err) => {
				warn!(target: "sp.sync", session = %planned.session_id, error = %err, "session transfer failed");
				SyncResult {
					success: false,
					session_id: planned.session_id,
					action: planned.action,
					message: Some(err.to_string()),
					conflict: None,
				}
			}
		}
	}

	async fn transfer(
		&self,
		id: &str,
		source: &Arc<dyn StorageBackend>,
		dest: &Arc<dyn StorageBackend>,
	) -> Result<(), StorageError> {
		let stored = source.download(id).await?;
		dest.upload(id, &stored.bytes, &stored.metadata).await
	}
}
