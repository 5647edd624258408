//! Command implementations and dispatch.

mod list;
mod show;
mod sync;
mod validate;

use anyhow::Result;

use crate::cli::{Cli, Commands};

pub async fn dispatch(cli: Cli) -> Result<()> {
	match cli.command {
		Commands::Show { file } => show::run(&file),
		Commands::Validate { file } => validate::run(&file),
		Commands::List { store } => list::run(&store, cli.format).await,
		Commands::Sync {
			local,
			remote,
			strategy,
			dry_run,
		} => sync::run(&local, &remote, strategy, dry_run, cli.format).await,
	}
}

/// Loads and parses a session file.
pub(crate) fn load_session(
	path: &std::path::Path,
) -> Result<sessionport_protocol::SessionState> {
	let raw = std::fs::read_to_string(path)
		.map_err(|err| anyhow::anyhow!("failed to read {}: {err}", path.display()))?;
	serde_json::from_str(&raw)
		.map_err(|err| anyhow::anyhow!("{} is not a valid session file: {err}", path.display()))
}
