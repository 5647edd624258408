//! `spc show` - human-readable session file summary.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use sessionport_protocol::{Cookie, RecordingState};

pub fn run(file: &Path) -> Result<()> {
	let state = super::load_session(file)?;

	println!("Session state from: {}", file.display());
	println!("  Version: {}", state.version);
	println!("  Origin:  {}", state.origin);
	println!("  Captured at: {} (epoch ms)", state.timestamp);
	println!();

	print_cookies(&state.storage.cookies);
	println!();

	print_origin_storage("LOCAL STORAGE", &state.storage.local_storage);
	print_origin_storage("SESSION STORAGE", &state.storage.session_storage);

	if let Some(history) = &state.history {
		println!("HISTORY ({} entries):", history.entries.len());
		println!("  Current URL: {}", history.current_url);
		println!();
	}

	if let Some(recording) = &state.recording {
		print_recording(recording);
	}

	Ok(())
}

fn print_cookies(cookies: &[Cookie]) {
	println!("COOKIES ({}):", cookies.len());
	if cookies.is_empty() {
		println!("  (none)");
		return;
	}

	println!("  {:<20} {:<30} {:<20}", "NAME", "DOMAIN", "EXPIRES");
	println!("  {}", "-".repeat(70));
	for cookie in cookies {
		println!(
			"  {:<20} {:<30} {:<20}",
			cookie.name,
			cookie.domain,
			format_expiry(cookie.expires)
		);
	}
}

fn print_origin_storage(label: &str, storage: &BTreeMap<String, BTreeMap<String, String>>) {
	println!("{label} ({} origins):", storage.len());
	if storage.is_empty() {
		println!("  (none)");
	} else {
		for (origin, entries) in storage {
			println!("  {}:", origin);
			for (key, value) in entries {
				let value = if value.len() > 50 {
					format!("{}...", &value[..50])
				} else {
					value.clone()
				};
				println!("    {key}: {value}");
			}
		}
	}
	println!();
}

fn print_recording(recording: &RecordingState) {
	let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
	for event in &recording.events {
		*by_kind.entry(event.kind().to_string()).or_default() += 1;
	}

	println!(
		"RECORDING ({} events over {}ms):",
		recording.events.len(),
		recording.duration
	);
	for (kind, count) in by_kind {
		println!("  {kind}: {count}");
	}
}

fn format_expiry(expires: Option<f64>) -> String {
	let ts = match expires {
		None => return "session".into(),
		Some(ts) if ts < 0.0 => return "session".into(),
		Some(ts) => ts as i64,
	};

	let now = std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or(0);

	if ts < now {
		return "expired".into();
	}

	let diff = ts - now;
	match diff {
		d if d < 3600 => format!("{}m", d / 60),
		d if d < 86400 => format!("{}h", d / 3600),
		d => format!("{}d", d / 86400),
	}
}
