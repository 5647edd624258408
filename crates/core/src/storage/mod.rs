//! Storage backend contract and the reference backends.
//!
//! Backends key session payloads and metadata identically regardless of the
//! physical tier (in-memory, local filesystem, object store), which is what
//! lets the sync engine compare stores without knowing what they are.

use async_trait::async_trait;
use sessionport_protocol::SessionMetadata;

use crate::error::StorageError;

mod local;
mod memory;

pub use local::LocalBackend;
pub use memory::MemoryBackend;

/// A downloaded session: serialized payload plus its metadata.
#[derive(Debug, Clone)]
pub struct StoredSession {
	pub bytes: Vec<u8>,
	pub metadata: SessionMetadata,
}

/// Abstract session store keyed by session id.
#[async_trait]
pub trait StorageBackend: Send + Sync {
	/// Writes (or overwrites) a session payload and its metadata.
	async fn upload(
		&self,
		id: &str,
		bytes: &[u8],
		metadata: &SessionMetadata,
	) -> Result<(), StorageError>;

	async fn download(&self, id: &str) -> Result<StoredSession, StorageError>;

	/// Metadata for every stored session, in stable id order.
	async fn list(&self) -> Result<Vec<SessionMetadata>, StorageError>;

	/// Removes a session. Deleting an absent id is a no-op — deletion is
	/// not tombstoned, so "absent" and "deleted" are indistinguishable.
	async fn delete(&self, id: &str) -> Result<(), StorageError>;

	async fn exists(&self, id: &str) -> Result<bool, StorageError>;
}

/// Rejects ids that cannot double as file/object keys.
pub(crate) fn check_id(id: &str) -> Result<(), StorageError> {
	if id.is_empty() {
		return Err(StorageError::InvalidId {
			id: id.to_string(),
			reason: "empty".into(),
		});
	}
	if id.contains(['/', '\\', '\0']) || id == "." || id == ".." {
		return Err(StorageError::InvalidId {
			id: id.to_string(),
			reason: "contains path separators or reserved names".into(),
		});
	}
	Ok(())
}
