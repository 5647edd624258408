//! Interaction recording with a pull-based drain API.
//!
//! The recorder owns an explicit single-owner queue. Listener closures get a
//! cloneable [`EventSink`] at `start()` time and append through it; the host
//! polls [`EventRecorder::drain`], which atomically swaps the buffer out.
//! Two concurrent recordings over distinct targets are independent by
//! construction — there is no ambient global buffer.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use sessionport_protocol::{Event, EventData, EventKind, RecordingState};
use tracing::{debug, warn};

use crate::adapter::InteractionSurface;
use crate::error::AttachError;

/// Scroll positions are debounced: only the last position within this idle
/// window is recorded.
pub const SCROLL_IDLE_MS: u64 = 100;

/// Which event kinds to record.
///
/// Everything defaults to enabled except scroll (high frequency, low
/// signal). Hosts without a usable history hook simply fail the navigation
/// attach non-fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFlags {
	pub click: bool,
	pub input: bool,
	pub keydown: bool,
	pub navigation: bool,
	pub scroll: bool,
}

impl Default for CaptureFlags {
	fn default() -> Self {
		Self {
			click: true,
			input: true,
			keydown: true,
			navigation: true,
			scroll: false,
		}
	}
}

impl CaptureFlags {
	pub fn enabled(&self, kind: EventKind) -> bool {
		match kind {
			EventKind::Click => self.click,
			EventKind::Input => self.input,
			EventKind::Keydown => self.keydown,
			EventKind::Navigation => self.navigation,
			EventKind::Scroll => self.scroll,
		}
	}

	/// The kinds `start()` will try to attach, in a fixed order.
	pub fn enabled_kinds(&self) -> Vec<EventKind> {
		[
			EventKind::Click,
			EventKind::Input,
			EventKind::Keydown,
			EventKind::Navigation,
			EventKind::Scroll,
		]
		.into_iter()
		.filter(|kind| self.enabled(*kind))
		.collect()
	}
}

/// Which kinds attached and which failed during `start()`.
///
/// Attach is best-effort: a failed kind never prevents the others.
#[derive(Debug, Default)]
pub struct AttachReport {
	pub attached: Vec<EventKind>,
	pub failed: Vec<AttachError>,
}

impl AttachReport {
	/// True when at least one listener kind is live.
	pub fn is_recording(&self) -> bool {
		!self.attached.is_empty()
	}
}

struct QueueInner {
	events: Vec<Event>,
	/// Scroll event held back until its idle window closes.
	pending_scroll: Option<Event>,
	closed: bool,
}

/// Single-writer/single-reader event buffer with swap-on-read drain.
///
/// Listeners append while `drain` runs; the buffer swap is one indivisible
/// step under the lock, so no event is delivered twice or lost.
struct EventQueue {
	clock: Instant,
	inner: Mutex<QueueInner>,
}

impl EventQueue {
	fn new() -> Self {
		Self {
			clock: Instant::now(),
			inner: Mutex::new(QueueInner {
				events: Vec::new(),
				pending_scroll: None,
				closed: false,
			}),
		}
	}

	fn elapsed_ms(&self) -> u64 {
		u64::try_from(self.clock.elapsed().as_millis()).unwrap_or(u64::MAX)
	}

	fn push(&self, target: Option<String>, data: EventData) {
		let timestamp = self.elapsed_ms();
		let mut inner = self.inner.lock();
		if inner.closed {
			return;
		}
		let event = Event {
			timestamp,
			target,
			data,
		};
		match &event.data {
			EventData::Scroll(_) => match inner.pending_scroll.take() {
				Some(pending) if timestamp.saturating_sub(pending.timestamp) <= SCROLL_IDLE_MS => {
					// Still inside the idle window: the newer position wins.
					inner.pending_scroll = Some(event);
				}
				Some(pending) => {
					inner.events.push(pending);
					inner.pending_scroll = Some(event);
				}
				None => inner.pending_scroll = Some(event),
			},
			_ => {
				// Any non-scroll arrival closes the scroll window, keeping
				// the buffer in timestamp order.
				if let Some(pending) = inner.pending_scroll.take() {
					inner.events.push(pending);
				}
				inner.events.push(event);
			}
		}
	}

	fn drain(&self) -> Vec<Event> {
		let mut inner = self.inner.lock();
		if let Some(pending) = inner.pending_scroll.take() {
			inner.events.push(pending);
		}
		std::mem::take(&mut inner.events)
	}

	fn close(&self) {
		self.inner.lock().closed = true;
	}
}

/// Cloneable append handle handed to listener closures.
///
/// Stamps each event with milliseconds elapsed since recording start.
/// Sinks from a previous recording window go stale at the next `start()`
/// and their appends are dropped.
#[derive(Clone)]
pub struct EventSink {
	queue: Arc<EventQueue>,
}

impl EventSink {
	/// Records one observed interaction against the active window.
	pub fn record(&self, target: Option<String>, data: EventData) {
		self.queue.push(target, data);
	}
}

impl std::fmt::Debug for EventSink {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventSink").finish_non_exhaustive()
	}
}

/// Records chronological user-interaction events from one target.
///
/// Lifecycle: `start()` installs listeners and opens a capture window;
/// `drain()` is polled by the host; `stop()` closes the window and returns
/// the full accumulated recording.
pub struct EventRecorder {
	queue: Arc<EventQueue>,
	accumulated: RecordingState,
	active: bool,
}

impl EventRecorder {
	pub fn new() -> Self {
		Self {
			queue: Arc::new(EventQueue::new()),
			accumulated: RecordingState::default(),
			active: false,
		}
	}

	/// Whether a capture window is currently open.
	pub fn is_active(&self) -> bool {
		self.active
	}

	/// Opens a capture window: resets the buffer, stamps `start_time`, and
	/// attaches one listener per enabled kind.
	///
	/// Attach is best-effort; inspect the report to learn which kinds are
	/// live. Calling `start` while active restarts the window.
	pub fn start(&mut self, surface: &dyn InteractionSurface, flags: CaptureFlags) -> AttachReport {
		if self.active {
			debug!(target: "sp.recorder", "restarting active recorder");
			surface.detach_all();
			self.queue.close();
		}

		self.queue = Arc::new(EventQueue::new());
		self.accumulated = RecordingState {
			events: Vec::new(),
			start_time: epoch_ms(),
			duration: 0,
		};
		self.active = true;

		let mut report = AttachReport::default();
		for kind in flags.enabled_kinds() {
			let sink = EventSink {
				queue: Arc::clone(&self.queue),
			};
			match surface.attach(kind, sink) {
				Ok(()) => report.attached.push(kind),
				Err(err) => {
					warn!(target: "sp.recorder", kind = %err.kind, reason = %err.reason, "listener attach failed");
					report.failed.push(err);
				}
			}
		}

		debug!(
			target: "sp.recorder",
			attached = report.attached.len(),
			failed = report.failed.len(),
			"recording started"
		);
		report
	}

	/// Atomically removes and returns everything buffered since the last
	/// drain. Infallible on an empty buffer. The only consumption mode —
	/// there is no peek.
	pub fn drain(&mut self) -> Vec<Event> {
		let batch = self.queue.drain();
		if !batch.is_empty() {
			self.accumulated.append(batch.iter().cloned());
		}
		batch
	}

	/// Closes the capture window: final drain, listeners detached, and the
	/// full accumulated recording returned.
	pub fn stop(&mut self, surface: &dyn InteractionSurface) -> RecordingState {
		let _ = self.drain();
		self.queue.close();
		surface.detach_all();
		self.active = false;

		let elapsed = self.queue.elapsed_ms();
		if self.accumulated.duration < elapsed {
			self.accumulated.duration = elapsed;
		}

		debug!(
			target: "sp.recorder",
			events = self.accumulated.events.len(),
			duration_ms = self.accumulated.duration,
			"recording stopped"
		);
		std::mem::take(&mut self.accumulated)
	}
}

impl Default for EventRecorder {
	fn default() -> Self {
		Self::new()
	}
}

fn epoch_ms() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
		.unwrap_or(0)
}
