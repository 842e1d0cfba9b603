use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Public MiST API root.
pub const DEFAULT_BASE_URL: &str = "https://api.mistdb.caltech.edu/v1";

/// Connection settings for the MiST REST backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
	pub base_url: String,
	/// Per-request timeout. `0` leaves the HTTP library default in place.
	pub timeout_ms: u64,
	pub user_agent: String,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_BASE_URL.to_string(),
			timeout_ms: 30_000,
			user_agent: concat!("mist-api/", env!("CARGO_PKG_VERSION")).to_string(),
		}
	}
}

impl ApiConfig {
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| ApiError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	pub fn timeout(&self) -> Option<Duration> {
		(self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
	}
}
