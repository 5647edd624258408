//! Recorded interaction events and the recording container.
//!
//! Events are a closed sum over the five supported kinds. On the wire each
//! event is `{"timestamp", "target"?, "type", "data"}` — the payload enum is
//! adjacently tagged so the JSON shape matches the portable session format.

use serde::{Deserialize, Serialize};

/// The five recordable interaction kinds.
///
/// Used as the attach/capture key; the payload for each kind lives in
/// [`EventData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
	Click,
	Input,
	Keydown,
	Navigation,
	Scroll,
}

impl std::fmt::Display for EventKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			EventKind::Click => "click",
			EventKind::Input => "input",
			EventKind::Keydown => "keydown",
			EventKind::Navigation => "navigation",
			EventKind::Scroll => "scroll",
		};
		f.write_str(s)
	}
}

/// Modifier-key state at event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifiers {
	#[serde(default)]
	pub alt: bool,
	#[serde(default)]
	pub ctrl: bool,
	#[serde(default)]
	pub meta: bool,
	#[serde(default)]
	pub shift: bool,
}

/// Click payload: button index plus client coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickData {
	#[serde(default)]
	pub button: u8,
	pub x: f64,
	pub y: f64,
	#[serde(default)]
	pub modifiers: Modifiers,
}

/// Input payload: the whole value at event time, not a diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputData {
	pub value: String,
}

/// Keydown payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeydownData {
	pub key: String,
	pub code: String,
	#[serde(default)]
	pub modifiers: Modifiers,
}

/// How a navigation event was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationType {
	/// Programmatic history push/replace.
	Navigate,
	/// Browser back/forward signal.
	BackForward,
}

/// Navigation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationData {
	pub url: String,
	pub navigation_type: NavigationType,
}

/// Scroll payload: absolute position after the debounce window closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollData {
	pub x: f64,
	pub y: f64,
}

/// Kind-specific event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum EventData {
	Click(ClickData),
	Input(InputData),
	Keydown(KeydownData),
	Navigation(NavigationData),
	Scroll(ScrollData),
}

impl EventData {
	pub fn kind(&self) -> EventKind {
		match self {
			EventData::Click(_) => EventKind::Click,
			EventData::Input(_) => EventKind::Input,
			EventData::Keydown(_) => EventKind::Keydown,
			EventData::Navigation(_) => EventKind::Navigation,
			EventData::Scroll(_) => EventKind::Scroll,
		}
	}
}

/// One recorded interaction.
///
/// `timestamp` is milliseconds relative to [`RecordingState::start_time`];
/// `target` is the CSS path of the event target where one exists. Events are
/// immutable once appended to a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub timestamp: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub target: Option<String>,
	#[serde(flatten)]
	pub data: EventData,
}

impl Event {
	pub fn kind(&self) -> EventKind {
		self.data.kind()
	}
}

/// A chronological recording bound to one capture window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingState {
	pub events: Vec<Event>,
	/// Epoch milliseconds at which recording started.
	pub start_time: u64,
	/// Total capture window length in milliseconds.
	pub duration: u64,
}

impl RecordingState {
	/// Appends a drained batch, keeping `events` sorted ascending by
	/// timestamp. Batches can arrive out of order across poll cycles, so
	/// this merges rather than blindly extends. The sort is stable: equal
	/// timestamps keep their arrival order.
	pub fn append(&mut self, batch: impl IntoIterator<Item = Event>) {
		let mut added = false;
		for event in batch {
			if self.duration < event.timestamp {
				self.duration = event.timestamp;
			}
			self.events.push(event);
			added = true;
		}
		// Cheap fast path: nothing to do when batches arrive sorted and
		// later than everything before them.
		if added && !self.is_sorted() {
			self.events.sort_by_key(|e| e.timestamp);
		}
	}

	/// Whether `events` satisfies the ascending-timestamp invariant.
	pub fn is_sorted(&self) -> bool {
		self.events
			.windows(2)
			.all(|w| w[0].timestamp <= w[1].timestamp)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn click(ts: u64) -> Event {
		Event {
			timestamp: ts,
			target: Some("button#go".into()),
			data: EventData::Click(ClickData {
				button: 0,
				x: 10.0,
				y: 20.0,
				modifiers: Modifiers::default(),
			}),
		}
	}

	fn nav(ts: u64, url: &str) -> Event {
		Event {
			timestamp: ts,
			target: None,
			data: EventData::Navigation(NavigationData {
				url: url.into(),
				navigation_type: NavigationType::Navigate,
			}),
		}
	}

	#[test]
	fn event_wire_shape_is_type_plus_data() {
		let json = serde_json::to_value(click(120)).unwrap();
		assert_eq!(json["timestamp"], 120);
		assert_eq!(json["type"], "click");
		assert_eq!(json["target"], "button#go");
		assert_eq!(json["data"]["x"], 10.0);
		assert_eq!(json["data"]["button"], 0);
	}

	#[test]
	fn event_without_target_omits_the_field() {
		let json = serde_json::to_value(nav(5, "https://example.com/a")).unwrap();
		assert!(json.get("target").is_none());
		assert_eq!(json["data"]["navigationType"], "navigate");
	}

	#[test]
	fn append_merges_out_of_order_batches() {
		let mut rec = RecordingState::default();
		rec.append([click(0), click(500)]);
		// A later poll cycle delivers an event that fired before the
		// previous batch was flushed.
		rec.append([nav(250, "https://example.com/b")]);
		assert!(rec.is_sorted());
		let stamps: Vec<u64> = rec.events.iter().map(|e| e.timestamp).collect();
		assert_eq!(stamps, vec![0, 250, 500]);
		assert_eq!(rec.duration, 500);
	}

	#[test]
	fn append_tracks_duration_invariant() {
		let mut rec = RecordingState {
			duration: 100,
			..Default::default()
		};
		rec.append([click(750)]);
		assert!(rec.duration >= rec.events.iter().map(|e| e.timestamp).max().unwrap());
	}

	#[test]
	fn unknown_event_type_is_rejected() {
		let err = serde_json::from_str::<Event>(
			r#"{"timestamp":1,"type":"hover","data":{"x":1,"y":2}}"#,
		);
		assert!(err.is_err());
	}
}
