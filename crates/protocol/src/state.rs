//! Root session snapshot and its storage/history components.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::cookie::Cookie;
use crate::recording::RecordingState;

/// Current session file format version.
pub const FORMAT_VERSION: &str = "1.0.0";

/// Origin-keyed key/value storage tree (`origin → key → value`).
///
/// `BTreeMap` keeps both levels ordered so the serialized form is
/// deterministic and inner keys are unique by construction.
pub type OriginStorage = BTreeMap<String, BTreeMap<String, String>>;

/// Cookie jar plus web storage for every captured origin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageState {
	#[serde(default)]
	pub cookies: Vec<Cookie>,
	#[serde(default)]
	pub local_storage: OriginStorage,
	#[serde(default)]
	pub session_storage: OriginStorage,
}

impl StorageState {
	/// Merges `incoming` cookies into the jar. Cookie identity is
	/// (name, domain, path); on collision the incoming value replaces the
	/// existing one in place, so jar order stays stable.
	pub fn merge_cookies(&mut self, incoming: impl IntoIterator<Item = Cookie>) {
		for cookie in incoming {
			match self
				.cookies
				.iter_mut()
				.find(|c| c.identity() == cookie.identity())
			{
				Some(existing) => *existing = cookie,
				None => self.cookies.push(cookie),
			}
		}
	}
}

/// One navigation history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
	pub url: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Epoch milliseconds when the entry was visited.
	pub timestamp: u64,
}

/// Captured navigation history for the session's tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
	pub current_url: String,
	#[serde(default)]
	pub entries: Vec<HistoryEntry>,
	#[serde(default)]
	pub current_index: usize,
}

/// One point-in-time snapshot of browser session state.
///
/// This is the root of the portable session file format. `timestamp` must
/// strictly increase across successive captures of the same logical session;
/// [`SessionState::supersedes`] is the comparison consumers use to enforce
/// that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
	pub version: String,
	/// Capture time, epoch milliseconds.
	pub timestamp: u64,
	/// URL origin (scheme + host [+ port]) the snapshot was taken against.
	pub origin: String,
	pub storage: StorageState,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub history: Option<HistoryState>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub recording: Option<RecordingState>,
	/// Adapter-specific opaque extensions keyed by namespace.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extensions: Option<BTreeMap<String, serde_json::Value>>,
}

impl SessionState {
	/// Creates an empty snapshot for `origin` stamped at `timestamp`.
	pub fn new(origin: impl Into<String>, timestamp: u64) -> Self {
		Self {
			version: FORMAT_VERSION.to_string(),
			timestamp,
			origin: origin.into(),
			storage: StorageState::default(),
			history: None,
			recording: None,
			extensions: None,
		}
	}

	/// Whether this snapshot is a strictly newer capture than `prev`.
	pub fn supersedes(&self, prev: &SessionState) -> bool {
		self.timestamp > prev.timestamp
	}

	/// Validates the snapshot against the format invariants, collecting
	/// every violation rather than stopping at the first.
	pub fn validate(&self) -> Result<(), ValidationError> {
		let mut issues = Vec::new();

		if !is_valid_origin(&self.origin) {
			issues.push(ValidationIssue::InvalidOrigin {
				origin: self.origin.clone(),
			});
		}

		let mut seen = std::collections::HashSet::new();
		for cookie in &self.storage.cookies {
			let identity = (
				cookie.name.clone(),
				cookie.domain.clone(),
				cookie.path.clone(),
			);
			if !seen.insert(identity) {
				issues.push(ValidationIssue::DuplicateCookie {
					name: cookie.name.clone(),
					domain: cookie.domain.clone(),
					path: cookie.path.clone(),
				});
			}
		}

		if let Some(recording) = &self.recording {
			if !recording.is_sorted() {
				issues.push(ValidationIssue::UnsortedRecording);
			}
			if let Some(max) = recording.events.iter().map(|e| e.timestamp).max() {
				if recording.duration < max {
					issues.push(ValidationIssue::DurationTooShort {
						duration: recording.duration,
						last_event: max,
					});
				}
			}
		}

		if let Some(history) = &self.history {
			if !history.entries.is_empty() && history.current_index >= history.entries.len() {
				issues.push(ValidationIssue::HistoryIndexOutOfRange {
					index: history.current_index,
					len: history.entries.len(),
				});
			}
		}

		if issues.is_empty() {
			Ok(())
		} else {
			Err(ValidationError { issues })
		}
	}
}

/// Returns `true` when `origin` is exactly a URL origin: scheme + host
/// [+ port], nothing else (no path, query, fragment, or credentials).
pub fn is_valid_origin(origin: &str) -> bool {
	match Url::parse(origin) {
		Ok(url) => url.origin().ascii_serialization() == origin,
		Err(_) => false,
	}
}

/// A single invariant violation found by [`SessionState::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationIssue {
	#[error("`{origin}` is not a valid URL origin (scheme + host [+ port])")]
	InvalidOrigin { origin: String },
	#[error("duplicate cookie ({name}, {domain}, {path})")]
	DuplicateCookie {
		name: String,
		domain: String,
		path: String,
	},
	#[error("recording events are not sorted ascending by timestamp")]
	UnsortedRecording,
	#[error("recording duration {duration}ms is shorter than its last event at {last_event}ms")]
	DurationTooShort { duration: u64, last_event: u64 },
	#[error("history currentIndex {index} out of range for {len} entries")]
	HistoryIndexOutOfRange { index: usize, len: usize },
}

/// Every invariant violation found in one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
	pub issues: Vec<ValidationIssue>,
}

impl std::error::Error for ValidationError {}

impl std::fmt::Display for ValidationError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "session state failed validation ({} issue", self.issues.len())?;
		if self.issues.len() != 1 {
			write!(f, "s")?;
		}
		write!(f, ")")?;
		for issue in &self.issues {
			write!(f, "\n  - {issue}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cookie::SameSite;
	use crate::recording::{Event, EventData, InputData, RecordingState};

	fn cookie(name: &str) -> Cookie {
		Cookie {
			name: name.into(),
			value: "v".into(),
			domain: "example.com".into(),
			path: "/".into(),
			expires: None,
			http_only: false,
			secure: true,
			same_site: SameSite::Lax,
			partitioned: false,
		}
	}

	#[test]
	fn valid_origins() {
		assert!(is_valid_origin("https://example.com"));
		assert!(is_valid_origin("http://localhost:3000"));
		assert!(!is_valid_origin("https://example.com/"));
		assert!(!is_valid_origin("https://example.com/path"));
		assert!(!is_valid_origin("example.com"));
		assert!(!is_valid_origin(""));
	}

	#[test]
	fn empty_state_for_valid_origin_passes() {
		let state = SessionState::new("https://example.com", 1);
		assert!(state.validate().is_ok());
	}

	#[test]
	fn validate_collects_every_violation() {
		let mut state = SessionState::new("not-an-origin", 1);
		state.storage.cookies = vec![cookie("sid"), cookie("sid")];
		state.recording = Some(RecordingState {
			events: vec![
				Event {
					timestamp: 500,
					target: None,
					data: EventData::Input(InputData { value: "a".into() }),
				},
				Event {
					timestamp: 100,
					target: None,
					data: EventData::Input(InputData { value: "b".into() }),
				},
			],
			start_time: 0,
			duration: 10,
		});

		let err = state.validate().unwrap_err();
		assert_eq!(err.issues.len(), 4);
		assert!(err.issues.contains(&ValidationIssue::UnsortedRecording));
	}

	#[test]
	fn merge_cookies_replaces_by_identity_in_place() {
		let mut storage = StorageState {
			cookies: vec![cookie("a"), cookie("b")],
			..Default::default()
		};
		let mut newer = cookie("a");
		newer.value = "updated".into();
		storage.merge_cookies([newer, cookie("c")]);

		let names: Vec<&str> = storage.cookies.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["a", "b", "c"]);
		assert_eq!(storage.cookies[0].value, "updated");
	}

	#[test]
	fn storage_maps_round_trip_as_nested_objects() {
		let mut state = SessionState::new("https://example.com", 42);
		state
			.storage
			.local_storage
			.entry("https://example.com".into())
			.or_default()
			.insert("theme".into(), "dark".into());

		let json = serde_json::to_value(&state).unwrap();
		assert_eq!(
			json["storage"]["localStorage"]["https://example.com"]["theme"],
			"dark"
		);

		let back: SessionState = serde_json::from_value(json).unwrap();
		assert_eq!(back, state);
	}

	#[test]
	fn supersedes_requires_strictly_newer_timestamp() {
		let a = SessionState::new("https://example.com", 100);
		let b = SessionState::new("https://example.com", 101);
		assert!(b.supersedes(&a));
		assert!(!a.supersedes(&b));
		assert!(!a.supersedes(&a));
	}
}
