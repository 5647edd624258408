//! `spc list` - enumerate a local store's sessions.

use std::path::Path;

use anyhow::Result;
use sessionport::{LocalBackend, StorageBackend};

use crate::cli::OutputFormat;

pub async fn run(store: &Path, format: OutputFormat) -> Result<()> {
	let backend = LocalBackend::new(store);
	let sessions = backend.list().await?;

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&sessions)?);
		}
		OutputFormat::Table => {
			if sessions.is_empty() {
				println!("No sessions in {}", store.display());
				return Ok(());
			}

			println!("{:<24} {:<28} {:<16} TAGS", "ID", "NAME", "UPDATED");
			println!("{}", "-".repeat(80));
			for meta in &sessions {
				println!(
					"{:<24} {:<28} {:<16} {}",
					meta.id,
					truncate(&meta.name, 27),
					meta.updated_at,
					meta.tags.join(",")
				);
			}
			println!();
			println!("Total: {} sessions", sessions.len());
		}
	}

	Ok(())
}

fn truncate(s: &str, max: usize) -> String {
	if s.len() > max {
		format!("{}...", &s[..max.saturating_sub(3)])
	} else {
		s.to_string()
	}
}
