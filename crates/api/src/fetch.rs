//! HTTP fetch collaborator.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

/// Response header carrying the unpaginated match count.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// One page of records plus the total count across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResponse {
	/// Records in server order.
	pub records: Vec<Value>,
	pub total_count: u64,
}

/// Issues `GET <url>` and decodes a paginated list response.
#[async_trait]
pub trait HttpFetch: Send + Sync + 'static {
	async fn get(&self, url: &str) -> Result<FetchResponse>;
}

/// Parses the `x-total-count` header value.
pub fn parse_total_count(raw: Option<&str>) -> Result<u64> {
	let Some(raw) = raw else {
		return Err(ApiError::TotalCount("header missing".into()));
	};
	raw.trim()
		.parse::<u64>()
		.map_err(|err| ApiError::TotalCount(format!("'{raw}': {err}")))
}

/// Decodes a list response body.
pub fn decode_records(body: &[u8]) -> Result<Vec<Value>> {
	match serde_json::from_slice::<Value>(body).map_err(|err| ApiError::Decode(err.to_string()))? {
		Value::Array(records) => Ok(records),
		other => Err(ApiError::Decode(format!("expected a JSON array, got {}", json_kind(&other)))),
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// [`HttpFetch`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
	client: Client,
	user_agent: String,
}

impl ReqwestFetcher {
	pub fn new(config: &ApiConfig) -> Result<Self> {
		let mut builder = Client::builder();
		if let Some(timeout) = config.timeout() {
			builder = builder.timeout(timeout);
		}
		let client = builder.build().map_err(|e| ApiError::Network(e.to_string()))?;
		Ok(Self {
			client,
			user_agent: config.user_agent.clone(),
		})
	}
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
	async fn get(&self, url: &str) -> Result<FetchResponse> {
		tracing::trace!(url, "mist_api.get");
		let response = self
			.client
			.get(url)
			.header(ACCEPT, "application/json")
			.header(USER_AGENT, &self.user_agent)
			.send()
			.await
			.map_err(|e| ApiError::Network(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(ApiError::Status {
				status: status.as_u16(),
				body,
			});
		}

		let total_count = parse_total_count(response.headers().get(TOTAL_COUNT_HEADER).and_then(|value| value.to_str().ok()))?;
		let body = response.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
		let records = decode_records(&body)?;
		Ok(FetchResponse { records, total_count })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn total_count_parses_numbers() {
		assert_eq!(parse_total_count(Some("42")).ok(), Some(42));
		assert_eq!(parse_total_count(Some(" 7 ")).ok(), Some(7));
	}

	#[test]
	fn total_count_rejects_missing_and_garbage() {
		assert!(matches!(parse_total_count(None), Err(ApiError::TotalCount(_))));
		let err = parse_total_count(Some("lots")).unwrap_err();
		assert!(err.to_string().contains("'lots'"), "{err}");
	}

	#[test]
	fn records_keep_server_order() {
		let records = decode_records(br#"[{"id":3},{"id":1},{"id":2}]"#).expect("array body");
		let ids: Vec<_> = records.iter().filter_map(|r| r["id"].as_u64()).collect();
		assert_eq!(ids, vec![3, 1, 2]);
	}

	#[test]
	fn non_array_body_is_a_decode_error() {
		let err = decode_records(br#"{"error":"nope"}"#).unwrap_err();
		assert_eq!(err.to_string(), "invalid response body: expected a JSON array, got an object");
		assert!(matches!(decode_records(b"<html>"), Err(ApiError::Decode(_))));
	}
}
