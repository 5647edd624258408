//! Framework-agnostic engine for portable browser sessions.
//!
//! The crate covers the three moving parts of the portable-session core:
//!
//! * **Recording** — [`recorder::EventRecorder`] buffers chronological
//!   interaction events behind a pull-based drain API, with
//!   [`selector`] deriving stable CSS paths for event targets.
//! * **Replay** — [`replay::EventReplayer`] re-dispatches a recording
//!   against a live target with timing fidelity and a strict/lenient
//!   failure policy.
//! * **Sync** — [`sync::SyncEngine`] reconciles a local session store with
//!   a remote one through the [`storage::StorageBackend`] contract.
//!
//! Concrete browser integrations implement the contracts in [`adapter`];
//! the engine itself never launches or controls a browser. Wire types live
//! in [`sessionport_protocol`], re-exported here as [`protocol`].

pub mod adapter;
pub mod error;
pub mod recorder;
pub mod replay;
pub mod selector;
pub mod storage;
pub mod sync;

pub use sessionport_protocol as protocol;

pub use adapter::{
	AdapterError, BrowserAdapter, ElementHandle, InteractionSurface, ReplayTarget, TargetError,
};
pub use error::{AttachError, ReplayError, StorageError, SyncError};
pub use recorder::{AttachReport, CaptureFlags, EventRecorder, EventSink};
pub use replay::{EventReplayer, PlaybackOptions, ReplayReport};
pub use storage::{LocalBackend, MemoryBackend, StorageBackend, StoredSession};
pub use sync::{
	ConflictData, ConflictStrategy, PlannedAction, SyncAction, SyncEngine, SyncPolicy, SyncResult,
};
