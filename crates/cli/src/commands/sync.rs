//! `spc sync` - reconcile two local stores.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use sessionport::{LocalBackend, SyncEngine, SyncPolicy, SyncResult};

use crate::cli::{ConflictArg, OutputFormat};

pub async fn run(
	local: &Path,
	remote: &Path,
	strategy: ConflictArg,
	dry_run: bool,
	format: OutputFormat,
) -> Result<()> {
	let engine = SyncEngine::new(
		Arc::new(LocalBackend::new(local)),
		Arc::new(LocalBackend::new(remote)),
	);
	let policy = SyncPolicy {
		conflict_resolution: strategy.into(),
	};

	if dry_run {
		return print_plan(&engine, &policy, format).await;
	}

	let results = engine.sync(&policy).await?;

	match format {
		OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
		OutputFormat::Table => print_results_table(&results),
	}

	let failed = results.iter().filter(|r| !r.success).count();
	if failed > 0 {
		anyhow::bail!("{failed} of {} session(s) failed to sync", results.len());
	}
	Ok(())
}

async fn print_plan(engine: &SyncEngine, policy: &SyncPolicy, format: OutputFormat) -> Result<()> {
	let planned = engine.plan(policy).await?;

	match format {
		OutputFormat::Json => {
			let entries: Vec<_> = planned
				.iter()
				.map(|p| {
					json!({
						"sessionId": p.session_id,
						"action": p.action,
						"localUpdatedAt": p.local.as_ref().map(|m| m.updated_at),
						"remoteUpdatedAt": p.remote.as_ref().map(|m| m.updated_at),
					})
				})
				.collect();
			println!("{}", serde_json::to_string_pretty(&entries)?);
		}
		OutputFormat::Table => {
			if planned.is_empty() {
				println!("Stores already reconciled; nothing to do.");
				return Ok(());
			}
			for p in &planned {
				println!("{:<10} {}", format!("{:?}", p.action).to_lowercase(), p.session_id);
			}
			println!();
			println!("{} action(s) planned (dry run, nothing transferred)", planned.len());
		}
	}
	Ok(())
}

fn print_results_table(results: &[SyncResult]) {
	if results.is_empty() {
		println!("Stores already reconciled; nothing to do.");
		return;
	}

	for result in results {
		let status = if result.success {
			"ok".green()
		} else {
			"failed".red()
		};
		let action = format!("{:?}", result.action).to_lowercase();
		match &result.message {
			Some(message) => println!("{status:<8} {action:<10} {:<24} {message}", result.session_id),
			None => println!("{status:<8} {action:<10} {}", result.session_id),
		}
	}

	let succeeded = results.iter().filter(|r| r.success).count();
	println!();
	println!("{succeeded}/{} session(s) reconciled", results.len());
}
