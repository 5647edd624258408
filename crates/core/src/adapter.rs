//! Contracts the engine consumes from framework adapters.
//!
//! A concrete adapter (Playwright, Selenium, CDP, ...) implements these
//! traits against its own DOM-access primitive. The engine never talks to a
//! browser directly: the recorder installs listeners through
//! [`InteractionSurface`], the replayer acts through [`ReplayTarget`], and
//! capture/restore flows through [`BrowserAdapter`].

use async_trait::async_trait;
use downcast_rs::{DowncastSync, impl_downcast};
use sessionport_protocol::{ClickData, EventKind, KeydownData, SessionState};
use thiserror::Error;

use crate::error::AttachError;
use crate::recorder::EventSink;

/// Opaque handle to a located live node.
///
/// Adapters downcast to their concrete handle type inside their own action
/// implementations.
pub trait ElementHandle: DowncastSync + std::fmt::Debug {}
impl_downcast!(sync ElementHandle);

/// Failure surfaced by a replay-target primitive.
#[derive(Debug, Clone, Error)]
pub enum TargetError {
	#[error("no element matched `{selector}`")]
	NotFound { selector: String },

	#[error("{message}")]
	Failed { message: String },
}

/// Target-resolution capability plus the primitive actions replay needs.
///
/// Every method is bounded by the replayer's action timeout; adapters do
/// not need their own deadline handling.
#[async_trait]
pub trait ReplayTarget: Send + Sync {
	/// Resolves a recorded CSS path to a live node.
	async fn locate(&self, selector: &str) -> Result<Box<dyn ElementHandle>, TargetError>;

	async fn click(&self, element: &dyn ElementHandle, click: &ClickData) -> Result<(), TargetError>;

	async fn set_value(&self, element: &dyn ElementHandle, value: &str) -> Result<(), TargetError>;

	/// Presses a key, focusing `element` first when one was recorded.
	async fn press_key(
		&self,
		element: Option<&dyn ElementHandle>,
		key: &KeydownData,
	) -> Result<(), TargetError>;

	async fn navigate(&self, url: &str) -> Result<(), TargetError>;

	async fn scroll_to(&self, x: f64, y: f64) -> Result<(), TargetError>;
}

/// Listener installation surface for the recorder.
///
/// `attach` wires one event kind to the recorder's sink; events observed by
/// the host flow back through [`EventSink::record`]. Attach is per-kind so
/// one unavailable hook (e.g. no history interception) does not block the
/// rest.
pub trait InteractionSurface {
	fn attach(&self, kind: EventKind, sink: EventSink) -> Result<(), AttachError>;

	/// Removes every listener this surface installed.
	fn detach_all(&self);
}

/// Capture/restore failure reported by an adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
	#[error("state capture failed: {reason}")]
	Capture { reason: String },

	#[error("state restore failed: {reason}")]
	Apply { reason: String },
}

/// A framework adapter: produces a [`SessionState`] from a live browser
/// target and consumes one to mutate a live browser target.
#[async_trait]
pub trait BrowserAdapter: ReplayTarget {
	async fn capture_state(&self) -> Result<SessionState, AdapterError>;

	async fn apply_state(&self, state: &SessionState) -> Result<(), AdapterError>;

	/// The listener surface the recorder attaches to.
	fn interaction_surface(&self) -> &dyn InteractionSurface;
}
