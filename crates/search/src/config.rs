use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use mist_api::ApiConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::query::{DEFAULT_PER_PAGE, QueryDescriptor};

/// Quiet period a search trigger must survive before it turns into a fetch.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings shared by all streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
	pub debounce_ms: u64,
	/// Page size for queries built through [`Self::query`] and [`Self::id_query`].
	pub per_page: NonZeroU32,
	/// Capacity of each stream's change-event broadcast.
	pub event_buffer: usize,
	pub api: ApiConfig,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			debounce_ms: u64::try_from(DEFAULT_DEBOUNCE.as_millis()).unwrap_or(u64::MAX),
			per_page: DEFAULT_PER_PAGE,
			event_buffer: 64,
			api: ApiConfig::default(),
		}
	}
}

impl SearchConfig {
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| SearchError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Free-text query using the configured page size.
	pub fn query(&self, text: impl Into<String>) -> QueryDescriptor {
		QueryDescriptor::search(text).with_per_page(self.per_page)
	}

	/// Id-list query using the configured page size.
	pub fn id_query<I, S>(&self, ids: I) -> QueryDescriptor
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		QueryDescriptor::by_ids(ids).with_per_page(self.per_page)
	}
}
