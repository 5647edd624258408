//! Cookie wire type shared by capture, restore, and storage layers.

use serde::{Deserialize, Serialize};

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
	Strict,
	#[default]
	Lax,
	None,
}

/// A single browser cookie.
///
/// `expires` is epoch seconds; `None` marks a session cookie that dies with
/// the browser instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
	pub name: String,
	pub value: String,
	pub domain: String,
	pub path: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires: Option<f64>,
	#[serde(default)]
	pub http_only: bool,
	#[serde(default)]
	pub secure: bool,
	#[serde(default)]
	pub same_site: SameSite,
	#[serde(default)]
	pub partitioned: bool,
}

impl Cookie {
	/// Identity tuple for deduplication: two cookies with the same
	/// (name, domain, path) are the same cookie.
	pub fn identity(&self) -> (&str, &str, &str) {
		(&self.name, &self.domain, &self.path)
	}

	/// Returns `true` for cookies that expire with the browser session.
	pub fn is_session_cookie(&self) -> bool {
		match self.expires {
			None => true,
			Some(ts) => ts < 0.0,
		}
	}
}
