//! Error types for the capture, replay, storage, and sync subsystems.
//!
//! Propagation policy differs per subsystem: recorder attach failures are
//! collected and logged (recording must not crash a live automation run),
//! replay and sync failures surface to the caller as typed values, and
//! per-session sync transport failures are reported inside that session's
//! result instead of aborting the batch.

use sessionport_protocol::EventKind;
use thiserror::Error;

/// A listener kind could not be installed. Non-fatal: the recorder keeps
/// attaching the remaining kinds.
#[derive(Debug, Clone, Error)]
#[error("failed to attach {kind} listener: {reason}")]
pub struct AttachError {
	pub kind: EventKind,
	pub reason: String,
}

/// Replay failure for a single event.
#[derive(Debug, Error)]
pub enum ReplayError {
	#[error("playback speed must be a positive number, got {0}")]
	InvalidSpeed(f64),

	#[error("{kind} event carries no target selector")]
	MissingTarget { kind: EventKind },

	/// The recorded selector did not resolve to a live node. Fatal when
	/// targets are validated, skipped otherwise.
	#[error("selector `{selector}` did not resolve to a live node")]
	Resolution { selector: String },

	/// The target resolved but the action itself failed (element not
	/// interactable, navigation refused, timeout).
	#[error("{kind} action failed on `{target}`: {cause}")]
	Action {
		kind: EventKind,
		target: String,
		cause: String,
	},
}

/// Storage backend failure for one operation.
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("session `{id}` not found")]
	NotFound { id: String },

	#[error("invalid session id `{id}`: {reason}")]
	InvalidId { id: String, reason: String },

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Serde(#[from] serde_json::Error),

	#[error("{0}")]
	Backend(String),
}

/// Sync failure that aborts the whole run. Per-session transfer failures
/// never take this path — they land in that session's `SyncResult`.
#[derive(Debug, Error)]
pub enum SyncError {
	#[error("failed to list the {side} store: {source}")]
	List {
		side: &'static str,
		source: StorageError,
	},
}
