//! Error types for MiST API collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building requests against, or reading responses from, the MiST API.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The request never produced a response (connect failure, timeout, TLS).
	#[error("network error: {0}")]
	Network(String),

	/// The server answered with a non-success status.
	#[error("request failed with status {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, possibly empty.
		body: String,
	},

	/// The `x-total-count` header was absent or not a number.
	#[error("invalid x-total-count header: {0}")]
	TotalCount(String),

	/// The response body was not a JSON array of records.
	#[error("invalid response body: {0}")]
	Decode(String),

	/// The configured base URL cannot be parsed or cannot carry a path.
	#[error("invalid base url '{url}': {reason}")]
	BaseUrl {
		/// The rejected URL text.
		url: String,
		/// Why it was rejected.
		reason: String,
	},

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
}

/// Result type for API collaborator operations.
pub type Result<T> = std::result::Result<T, ApiError>;
