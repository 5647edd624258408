use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output rendering for machine-facing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
	#[default]
	Table,
	Json,
}

#[derive(Parser, Debug)]
#[command(name = "spc")]
#[command(about = "Portable browser sessions - inspect, validate, and sync session stores")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format for list/sync results
	#[arg(short, long, global = true, value_enum, default_value = "table")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Summarize a session file (storage, history, recording)
	Show {
		/// Session file to display
		file: PathBuf,
	},

	/// Check a session file against the format invariants
	Validate {
		/// Session file to validate
		file: PathBuf,
	},

	/// List sessions in a local store directory
	List {
		/// Store root directory
		#[arg(long, value_name = "DIR")]
		store: PathBuf,
	},

	/// Reconcile a local store against a remote store
	Sync {
		/// Local store root
		#[arg(long, value_name = "DIR")]
		local: PathBuf,

		/// Remote store root
		#[arg(long, value_name = "DIR")]
		remote: PathBuf,

		/// Conflict handling: latest (last writer wins) or manual (report)
		#[arg(long, default_value = "latest")]
		strategy: ConflictArg,

		/// Print the plan without transferring anything
		#[arg(long)]
		dry_run: bool,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConflictArg {
	Latest,
	Manual,
}

impl From<ConflictArg> for sessionport::ConflictStrategy {
	fn from(arg: ConflictArg) -> Self {
		match arg {
			ConflictArg::Latest => sessionport::ConflictStrategy::LatestWins,
			ConflictArg::Manual => sessionport::ConflictStrategy::ManualReview,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_show_command() {
		let cli = Cli::try_parse_from(["spc", "show", "session.json"]).unwrap();
		match cli.command {
			Commands::Show { file } => assert_eq!(file, PathBuf::from("session.json")),
			_ => panic!("expected Show command"),
		}
	}

	#[test]
	fn parse_sync_with_strategy_and_dry_run() {
		let cli = Cli::try_parse_from([
			"spc", "sync", "--local", "a", "--remote", "b", "--strategy", "manual", "--dry-run",
		])
		.unwrap();
		match cli.command {
			Commands::Sync {
				local,
				remote,
				strategy,
				dry_run,
			} => {
				assert_eq!(local, PathBuf::from("a"));
				assert_eq!(remote, PathBuf::from("b"));
				assert_eq!(strategy, ConflictArg::Manual);
				assert!(dry_run);
			}
			_ => panic!("expected Sync command"),
		}
	}

	#[test]
	fn sync_defaults_to_latest_wins() {
		let cli = Cli::try_parse_from(["spc", "sync", "--local", "a", "--remote", "b"]).unwrap();
		match cli.command {
			Commands::Sync { strategy, dry_run, .. } => {
				assert_eq!(strategy, ConflictArg::Latest);
				assert!(!dry_run);
			}
			_ => panic!("expected Sync command"),
		}
	}

	#[test]
	fn format_flag_is_global() {
		let cli = Cli::try_parse_from(["spc", "-f", "json", "list", "--store", "dir"]).unwrap();
		assert_eq!(cli.format, OutputFormat::Json);
	}

	#[test]
	fn unknown_command_fails() {
		assert!(Cli::try_parse_from(["spc", "frobnicate"]).is_err());
	}
}
