//! Session metadata, the unit of store reconciliation.

use serde::{Deserialize, Serialize};

/// Metadata describing one stored session.
///
/// `updated_at` is the logical clock for conflict resolution between
/// stores: strictly newer wins under the latest-wins policy. All times are
/// epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
	pub id: String,
	pub name: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,
	pub created_at: u64,
	pub updated_at: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expire_at: Option<u64>,
}

impl SessionMetadata {
	/// Creates metadata for a fresh session: `updated_at` starts equal to
	/// `created_at`.
	pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: u64) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			tags: Vec::new(),
			created_at,
			updated_at: created_at,
			expire_at: None,
		}
	}

	/// Whether the session is past its expiry at `now` (epoch ms).
	pub fn is_expired(&self, now: u64) -> bool {
		self.expire_at.is_some_and(|at| at <= now)
	}
}
