//! `spc validate` - format invariant checking.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

pub fn run(file: &Path) -> Result<()> {
	let state = super::load_session(file)?;

	match state.validate() {
		Ok(()) => {
			println!("{} {}", "valid".green().bold(), file.display());
			Ok(())
		}
		Err(err) => {
			println!("{} {}", "invalid".red().bold(), file.display());
			for issue in &err.issues {
				println!("  - {issue}");
			}
			anyhow::bail!("{} validation issue(s)", err.issues.len())
		}
	}
}
