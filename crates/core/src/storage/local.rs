//! Local filesystem backend.
//!
//! One payload file (`<id>.json`) plus one metadata sidecar
//! (`<id>.meta.json`) per session under a root directory. Metadata is kept
//! separate so `list()` never has to parse full session payloads.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sessionport_protocol::SessionMetadata;
use tracing::{debug, warn};

use super::{StorageBackend, StoredSession, check_id};
use crate::error::StorageError;

const META_SUFFIX: &str = ".meta.json";

/// Filesystem-backed session store rooted at one directory.
#[derive(Debug, Clone)]
pub struct LocalBackend {
	root: PathBuf,
}

impl LocalBackend {
	/// Creates a backend over `root`. The directory is created lazily on
	/// the first upload.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn payload_path(&self, id: &str) -> PathBuf {
		self.root.join(format!("{id}.json"))
	}

	fn meta_path(&self, id: &str) -> PathBuf {
		self.root.join(format!("{id}{META_SUFFIX}"))
	}
}

#[async_trait]
impl StorageBackend for LocalBackend {
	async fn upload(
		&self,
		id: &str,
		bytes: &[u8],
		metadata: &SessionMetadata,
	) -> Result<(), StorageError> {
		check_id(id)?;
		fs::create_dir_all(&self.root)?;
		fs::write(self.payload_path(id), bytes)?;
		let meta_json = serde_json::to_string_pretty(metadata)?;
		fs::write(self.meta_path(id), meta_json)?;
		debug!(target: "sp.store", %id, root = %self.root.display(), "session written");
		Ok(())
	}

	async fn download(&self, id: &str) -> Result<StoredSession, StorageError> {
		check_id(id)?;
		let bytes = match fs::read(self.payload_path(id)) {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				return Err(StorageError::NotFound { id: id.to_string() });
			}
			Err(err) => return Err(err.into()),
		};
		let meta_json = fs::read_to_string(self.meta_path(id))
			.map_err(|_| StorageError::NotFound { id: id.to_string() })?;
		let metadata = serde_json::from_str(&meta_json)?;
		Ok(StoredSession { bytes, metadata })
	}

	async fn list(&self) -> Result<Vec<SessionMetadata>, StorageError> {
		let entries = match fs::read_dir(&self.root) {
			Ok(entries) => entries,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(err) => return Err(err.into()),
		};

		let mut sessions = Vec::new();
		for entry in entries {
			let path = entry?.path();
			let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
				continue;
			};
			if !name.ends_with(META_SUFFIX) {
				continue;
			}
			match fs::read_to_string(&path)
				.map_err(StorageError::from)
				.and_then(|json| serde_json::from_str::<SessionMetadata>(&json).map_err(Into::into))
			{
				Ok(metadata) => sessions.push(metadata),
				Err(err) => {
					// A corrupt sidecar should not hide the rest of the store.
					warn!(target: "sp.store", path = %path.display(), error = %err, "skipping unreadable metadata");
				}
			}
		}

		sessions.sort_by(|a, b| a.id.cmp(&b.id));
		Ok(sessions)
	}

	async fn delete(&self, id: &str) -> Result<(), StorageError> {
		check_id(id)?;
		for path in [self.payload_path(id), self.meta_path(id)] {
			match fs::remove_file(&path) {
				Ok(()) => {}
				Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
				Err(err) => return Err(err.into()),
			}
		}
		Ok(())
	}

	async fn exists(&self, id: &str) -> Result<bool, StorageError> {
		check_id(id)?;
		Ok(self.payload_path(id).exists() && self.meta_path(id).exists())
	}
}

#[cfg(test)]
mod tests {
	use tempfile::TempDir;

	use super::*;

	fn meta(id: &str, updated_at: u64) -> SessionMetadata {
		let mut m = SessionMetadata::new(id, id, 1);
		m.updated_at = updated_at;
		m
	}

	#[tokio::test]
	async fn upload_creates_root_and_round_trips() {
		let tmp = TempDir::new().unwrap();
		let backend = LocalBackend::new(tmp.path().join("store"));

		backend.upload("s1", b"{}", &meta("s1", 5)).await.unwrap();
		assert!(backend.exists("s1").await.unwrap());

		let stored = backend.download("s1").await.unwrap();
		assert_eq!(stored.bytes, b"{}");
		assert_eq!(stored.metadata.id, "s1");
	}

	#[tokio::test]
	async fn list_is_sorted_and_skips_corrupt_sidecars() {
		let tmp = TempDir::new().unwrap();
		let backend = LocalBackend::new(tmp.path());

		backend.upload("b", b"{}", &meta("b", 1)).await.unwrap();
		backend.upload("a", b"{}", &meta("a", 1)).await.unwrap();
		fs::write(tmp.path().join("junk.meta.json"), "not json").unwrap();

		let listed = backend.list().await.unwrap();
		let ids: Vec<&str> = listed.iter().map(|m| m.id.as_str()).collect();
		assert_eq!(ids, vec!["a", "b"]);
	}

	#[tokio::test]
	async fn list_of_missing_root_is_empty() {
		let tmp = TempDir::new().unwrap();
		let backend = LocalBackend::new(tmp.path().join("never-created"));
		assert!(backend.list().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn delete_is_idempotent() {
		let tmp = TempDir::new().unwrap();
		let backend = LocalBackend::new(tmp.path());

		backend.upload("s1", b"{}", &meta("s1", 1)).await.unwrap();
		backend.delete("s1").await.unwrap();
		backend.delete("s1").await.unwrap();
		assert!(!backend.exists("s1").await.unwrap());
	}

	#[tokio::test]
	async fn download_missing_payload_is_not_found() {
		let tmp = TempDir::new().unwrap();
		let backend = LocalBackend::new(tmp.path());
		let err = backend.download("ghost").await.unwrap_err();
		assert!(matches!(err, StorageError::NotFound { .. }));
	}
}
