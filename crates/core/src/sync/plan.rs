//! Pure reconciliation planning over local and remote metadata.
//!
//! No I/O here: given both metadata sets and a policy, compute the action
//! per session. The engine in `mod.rs` executes the plan.

use std::collections::BTreeMap;

use serde::Serialize;
use sessionport_protocol::SessionMetadata;

/// How a divergent session (remote strictly newer) is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictStrategy {
	/// Last writer wins: download and overwrite local.
	#[default]
	LatestWins,
	/// Report the divergence and let the caller decide. No content merge
	/// is attempted.
	ManualReview,
}

/// Sync policy, open to future knobs beyond conflict handling.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncPolicy {
	pub conflict_resolution: ConflictStrategy,
}

/// Direction (or non-direction) of one planned per-session action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
	Upload,
	Download,
	Conflict,
}

/// Both sides of a reported divergence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictData {
	pub local: SessionMetadata,
	pub remote: SessionMetadata,
}

/// One session's planned action, with the metadata that justified it.
#[derive(Debug, Clone)]
pub struct PlannedAction {
	pub session_id: String,
	pub action: SyncAction,
	pub local: Option<SessionMetadata>,
	pub remote: Option<SessionMetadata>,
}

/// Computes the per-session action set.
///
/// Rules, in order of the local listing then remote-only ids:
/// * local only → upload
/// * both, local strictly newer → upload (overwrite remote)
/// * both, remote strictly newer → download under [`ConflictStrategy::LatestWins`],
///   conflict under [`ConflictStrategy::ManualReview`]
/// * both, equal `updated_at` → nothing (neither side is stale)
/// * remote only → download
///
/// Equal-clock sessions planning to nothing is what makes back-to-back
/// syncs idempotent.
pub fn plan(
	local: &[SessionMetadata],
	remote: &[SessionMetadata],
	policy: &SyncPolicy,
) -> Vec<PlannedAction> {
	let remote_by_id: BTreeMap<&str, &SessionMetadata> =
		remote.iter().map(|m| (m.id.as_str(), m)).collect();
	let local_ids: std::collections::BTreeSet<&str> =
		local.iter().map(|m| m.id.as_str()).collect();

	let mut actions = Vec::new();

	for ours in local {
		match remote_by_id.get(ours.id.as_str()) {
			None => actions.push(PlannedAction {
				session_id: ours.id.clone(),
				action: SyncAction::Upload,
				local: Some(ours.clone()),
				remote: None,
			}),
			Some(theirs) if ours.updated_at > theirs.updated_at => {
				actions.push(PlannedAction {
					session_id: ours.id.clone(),
					action: SyncAction::Upload,
					local: Some(ours.clone()),
					remote: Some((*theirs).clone()),
				});
			}
			Some(theirs) if theirs.updated_at > ours.updated_at => {
				let action = match policy.conflict_resolution {
					ConflictStrategy::LatestWins => SyncAction::Download,
					ConflictStrategy::ManualReview => SyncAction::Conflict,
				};
				actions.push(PlannedAction {
					session_id: ours.id.clone(),
					action,
					local: Some(ours.clone()),
					remote: Some((*theirs).clone()),
				});
			}
			Some(_) => {}
		}
	}

	for theirs in remote {
		if !local_ids.contains(theirs.id.as_str()) {
			actions.push(PlannedAction {
				session_id: theirs.id.clone(),
				action: SyncAction::Download,
				local: None,
				remote: Some(theirs.clone()),
			});
		}
	}

	actions
}
