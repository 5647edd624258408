//! Library surface of the `spc` binary, split out so integration tests and
//! the entrypoint share the same dispatch path.

pub mod cli;
pub mod commands;
pub mod logging;
