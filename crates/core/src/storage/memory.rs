//! In-memory backend for tests, examples, and ephemeral tiers.
//!
//! Keeps an operation log and supports per-id failure injection so sync
//! behavior under transport failure is testable without a network.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sessionport_protocol::SessionMetadata;

use super::{StorageBackend, StoredSession, check_id};
use crate::error::StorageError;

#[derive(Default)]
struct MemoryInner {
	entries: BTreeMap<String, StoredSession>,
	ops: Vec<String>,
	poisoned: HashSet<String>,
}

/// In-process session store.
///
/// Clones share the same underlying store, so a test can hold one handle
/// for inspection while the engine works through another.
#[derive(Clone, Default)]
pub struct MemoryBackend {
	inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Pre-populates one session.
	pub fn seed(&self, id: &str, bytes: impl Into<Vec<u8>>, metadata: SessionMetadata) {
		self.inner.lock().entries.insert(
			id.to_string(),
			StoredSession {
				bytes: bytes.into(),
				metadata,
			},
		);
	}

	/// Makes every transfer touching `id` fail with an injected transport
	/// error.
	pub fn poison(&self, id: &str) {
		self.inner.lock().poisoned.insert(id.to_string());
	}

	/// Takes the operation log, clearing it.
	pub fn take_ops(&self) -> Vec<String> {
		std::mem::take(&mut self.inner.lock().ops)
	}

	pub fn len(&self) -> usize {
		self.inner.lock().entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.lock().entries.is_empty()
	}

	/// Metadata snapshot without going through the async contract.
	pub fn metadata_of(&self, id: &str) -> Option<SessionMetadata> {
		self.inner
			.lock()
			.entries
			.get(id)
			.map(|s| s.metadata.clone())
	}

	fn check_poison(inner: &MemoryInner, id: &str) -> Result<(), StorageError> {
		if inner.poisoned.contains(id) {
			return Err(StorageError::Backend(format!(
				"injected transport failure for `{id}`"
			)));
		}
		Ok(())
	}
}

#[async_trait]
impl StorageBackend for MemoryBackend {
	async fn upload(
		&self,
		id: &str,
		bytes: &[u8],
		metadata: &SessionMetadata,
	) -> Result<(), StorageError> {
		check_id(id)?;
		let mut inner = self.inner.lock();
		inner.ops.push(format!("upload:{id}"));
		Self::check_poison(&inner, id)?;
		inner.entries.insert(
			id.to_string(),
			StoredSession {
				bytes: bytes.to_vec(),
				metadata: metadata.clone(),
			},
		);
		Ok(())
	}

	async fn download(&self, id: &str) -> Result<StoredSession, StorageError> {
		check_id(id)?;
		let mut inner = self.inner.lock();
		inner.ops.push(format!("download:{id}"));
		Self::check_poison(&inner, id)?;
		inner
			.entries
			.get(id)
			.cloned()
			.ok_or_else(|| StorageError::NotFound { id: id.to_string() })
	}

	async fn list(&self) -> Result<Vec<SessionMetadata>, StorageError> {
		let mut inner = self.inner.lock();
		inner.ops.push("list".into());
		Ok(inner
			.entries
			.values()
			.map(|s| s.metadata.clone())
			.collect())
	}

	async fn delete(&self, id: &str) -> Result<(), StorageError> {
		check_id(id)?;
		let mut inner = self.inner.lock();
		inner.ops.push(format!("delete:{id}"));
		Self::check_poison(&inner, id)?;
		inner.entries.remove(id);
		Ok(())
	}

	async fn exists(&self, id: &str) -> Result<bool, StorageError> {
		check_id(id)?;
		Ok(self.inner.lock().entries.contains_key(id))
	}
}
