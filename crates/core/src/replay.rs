//! Timed re-dispatch of recorded events against a live target.
//!
//! Playback walks the event list in the order given (the recording
//! invariant guarantees ascending timestamps), dispatches each event to its
//! kind-specific actor, and sleeps the speed-scaled gap to the next event.
//! Error policy is a two-way switch: strict verification replay halts on
//! the first failure, best-effort demo replay logs and keeps going.

use std::time::Duration;

use sessionport_protocol::{Event, EventData};
use tracing::{debug, warn};

use crate::adapter::{ElementHandle, ReplayTarget, TargetError};
use crate::error::ReplayError;

/// Playback tuning.
#[derive(Debug, Clone)]
pub struct PlaybackOptions {
	/// Pacing divisor: 2.0 plays twice as fast, 0.5 half speed. Must be a
	/// positive finite number.
	pub speed: f64,
	/// Strict mode: a resolution or action failure halts playback and the
	/// remaining events are not attempted. When false the failure is
	/// logged and playback continues.
	pub validate_targets: bool,
	/// Upper bound for one locate-plus-action round.
	pub action_timeout: Duration,
}

impl Default for PlaybackOptions {
	fn default() -> Self {
		Self {
			speed: 1.0,
			validate_targets: true,
			action_timeout: Duration::from_secs(30),
		}
	}
}

/// What a completed playback run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
	/// Events dispatched successfully.
	pub dispatched: usize,
	/// Events skipped after a tolerated failure (lenient mode only).
	pub skipped: usize,
}

/// Drives playback of one event list. Stateless between `play` calls; a
/// replayer must not be driven concurrently for the same target.
#[derive(Debug, Default)]
pub struct EventReplayer;

impl EventReplayer {
	pub fn new() -> Self {
		Self
	}

	/// Plays `events` in order against `target`.
	///
	/// In strict mode (`validate_targets`) the first failure halts
	/// playback and propagates; any pending inter-event sleep is never
	/// entered. In lenient mode failures are logged, counted as skipped,
	/// and pacing continues so the rest of the recording keeps its
	/// rhythm.
	pub async fn play(
		&self,
		events: &[Event],
		target: &dyn ReplayTarget,
		options: &PlaybackOptions,
	) -> Result<ReplayReport, ReplayError> {
		if !(options.speed.is_finite() && options.speed > 0.0) {
			return Err(ReplayError::InvalidSpeed(options.speed));
		}

		let mut report = ReplayReport::default();

		for (index, event) in events.iter().enumerate() {
			match self.dispatch(event, target, options.action_timeout).await {
				Ok(()) => {
					report.dispatched += 1;
					debug!(
						target: "sp.replay",
						kind = %event.kind(),
						timestamp = event.timestamp,
						"event dispatched"
					);
				}
				Err(err) if options.validate_targets => {
					warn!(target: "sp.replay", error = %err, "playback halted");
					return Err(err);
				}
				Err(err) => {
					report.skipped += 1;
					warn!(target: "sp.replay", error = %err, "event skipped");
				}
			}

			if let Some(next) = events.get(index + 1) {
				let gap_ms = next.timestamp.saturating_sub(event.timestamp);
				let scaled = Duration::from_secs_f64(gap_ms as f64 / 1000.0 / options.speed);
				if !scaled.is_zero() {
					tokio::time::sleep(scaled).await;
				}
			}
		}

		Ok(report)
	}

	async fn dispatch(
		&self,
		event: &Event,
		target: &dyn ReplayTarget,
		action_timeout: Duration,
	) -> Result<(), ReplayError> {
		let kind = event.kind();
		let action = self.act(event, target);
		match tokio::time::timeout(action_timeout, action).await {
			Ok(result) => result,
			Err(_) => Err(ReplayError::Action {
				kind,
				target: event.target.clone().unwrap_or_else(|| "<page>".into()),
				cause: format!("timed out after {}ms", action_timeout.as_millis()),
			}),
		}
	}

	async fn act(&self, event: &Event, target: &dyn ReplayTarget) -> Result<(), ReplayError> {
		match &event.data {
			EventData::Click(data) => {
				let element = self.locate_required(event, target).await?;
				target
					.click(&*element, data)
					.await
					.map_err(|err| action_error(event, err))
			}
			EventData::Input(data) => {
				let element = self.locate_required(event, target).await?;
				target
					.set_value(&*element, &data.value)
					.await
					.map_err(|err| action_error(event, err))
			}
			EventData::Keydown(data) => {
				let element = match event.target.as_deref() {
					Some(selector) => Some(self.locate(event, selector, target).await?),
					None => None,
				};
				target
					.press_key(element.as_deref(), data)
					.await
					.map_err(|err| action_error(event, err))
			}
			EventData::Navigation(data) => target
				.navigate(&data.url)
				.await
				.map_err(|err| action_error(event, err)),
			EventData::Scroll(data) => target
				.scroll_to(data.x, data.y)
				.await
				.map_err(|err| action_error(event, err)),
		}
	}

	async fn locate_required(
		&self,
		event: &Event,
		target: &dyn ReplayTarget,
	) -> Result<Box<dyn ElementHandle>, ReplayError> {
		let selector = event
			.target
			.as_deref()
			.ok_or(ReplayError::MissingTarget { kind: event.kind() })?;
		self.locate(event, selector, target).await
	}

	async fn locate(
		&self,
		event: &Event,
		selector: &str,
		target: &dyn ReplayTarget,
	) -> Result<Box<dyn ElementHandle>, ReplayError> {
		target.locate(selector).await.map_err(|err| action_error(event, err))
	}
}

fn action_error(event: &Event, err: TargetError) -> ReplayError {
	match err {
		TargetError::NotFound { selector } => ReplayError::Resolution { selector },
		TargetError::Failed { message } => ReplayError::Action {
			kind: event.kind(),
			target: event.target.clone().unwrap_or_else(|| "<page>".into()),
			cause: message,
		},
	}
}
