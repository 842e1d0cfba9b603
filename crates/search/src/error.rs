//! Error types for the search core.

use std::path::PathBuf;

use mist_api::ApiError;
use thiserror::Error;

use crate::action::StreamKind;

/// Errors surfaced to callers of the search core.
///
/// Fetch failures are not in here: they land in the stream's state as an error message.
#[derive(Debug, Error)]
pub enum SearchError {
	/// A page size of zero was requested.
	#[error("per_page must be greater than zero, got {0}")]
	InvalidPerPage(u32),

	/// Streams were started outside a tokio runtime.
	#[error("search streams must be spawned from within a tokio runtime")]
	NoRuntime,

	/// The stream's coordinator has shut down.
	#[error("{} stream is closed", .0.as_str())]
	StreamClosed(StreamKind),

	/// Configuration text failed to parse.
	#[error("config parse error: {0}")]
	Config(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Building an API collaborator failed.
	#[error(transparent)]
	Api(#[from] ApiError),
}

/// Result type for search core operations.
pub type Result<T> = std::result::Result<T, SearchError>;
