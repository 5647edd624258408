//! Wire types for portable browser session state.
//!
//! This crate contains the serde-serializable types that make up a session
//! snapshot as it appears on disk and on the wire: storage (cookies,
//! localStorage, sessionStorage), navigation history, recorded interaction
//! events, and the metadata used to reconcile session stores.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond validation and merge helpers
//! * Stable: Changes only when the file format changes
//! * Ordered: origin→key→value trees use `BTreeMap` so serialization is
//!   deterministic
//!
//! Higher-level capture/replay/sync machinery is built on top of these
//! types in `sessionport`.

pub mod cookie;
pub mod metadata;
pub mod recording;
pub mod state;

pub use cookie::*;
pub use metadata::*;
pub use recording::*;
pub use state::*;
