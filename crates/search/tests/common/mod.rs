//! Shared helpers for search stream integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mist_api::{ApiError, FetchResponse, HttpFetch, MistApi};
use mist_search::{SearchConfig, SearchStream, StreamKind};
use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, timeout};

pub const BASE_URL: &str = "http://mist.test/v1";

/// One request the stream made, waiting for the test to answer it.
pub struct PendingCall {
	pub url: String,
	reply: oneshot::Sender<mist_api::Result<FetchResponse>>,
}

impl PendingCall {
	/// Answers the request. Returns `false` if the stream already abandoned it.
	pub fn respond(self, outcome: mist_api::Result<FetchResponse>) -> bool {
		self.reply.send(outcome).is_ok()
	}

	pub fn ok(self, ids: &[u64], total_count: u64) -> bool {
		self.respond(Ok(page(ids, total_count)))
	}

	pub fn fail(self, error: ApiError) -> bool {
		self.respond(Err(error))
	}
}

/// Fetcher that hands every request to the test instead of the network.
pub struct ScriptedFetcher {
	calls: mpsc::UnboundedSender<PendingCall>,
}

impl ScriptedFetcher {
	pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingCall>) {
		let (calls, rx) = mpsc::unbounded_channel();
		(Arc::new(Self { calls }), rx)
	}
}

#[async_trait]
impl HttpFetch for ScriptedFetcher {
	async fn get(&self, url: &str) -> mist_api::Result<FetchResponse> {
		let (reply, answer) = oneshot::channel();
		self.calls
			.send(PendingCall { url: url.to_string(), reply })
			.map_err(|_| ApiError::Network("test harness gone".into()))?;
		answer.await.map_err(|_| ApiError::Network("request dropped by test".into()))?
	}
}

pub fn page(ids: &[u64], total_count: u64) -> FetchResponse {
	FetchResponse {
		records: ids.iter().map(|id| json!({ "id": id })).collect(),
		total_count,
	}
}

pub fn api() -> Arc<MistApi> {
	Arc::new(MistApi::new(BASE_URL).expect("valid base url"))
}

/// Spawns one stream wired to a scripted fetcher.
pub fn spawn_stream(kind: StreamKind) -> (SearchStream, mpsc::UnboundedReceiver<PendingCall>) {
	let _ = tracing_subscriber::fmt::try_init();
	let (fetcher, calls) = ScriptedFetcher::new();
	let stream = SearchStream::spawn(kind, &SearchConfig::default(), fetcher, api()).expect("stream must spawn");
	(stream, calls)
}

/// Ids of the records currently shown by `stream`.
pub fn shown_ids(stream: &SearchStream) -> Vec<u64> {
	stream.snapshot().matches().iter().filter_map(|record| record["id"].as_u64()).collect()
}

/// Next request the stream makes, failing the test after `limit`.
pub async fn next_call(calls: &mut mpsc::UnboundedReceiver<PendingCall>, limit: Duration) -> PendingCall {
	timeout(limit, calls.recv())
		.await
		.expect("timed out waiting for a fetch")
		.expect("fetcher dropped")
}

/// Asserts that no request is made within `window`.
pub async fn assert_no_call(calls: &mut mpsc::UnboundedReceiver<PendingCall>, window: Duration) {
	if let Ok(Some(call)) = timeout(window, calls.recv()).await {
		panic!("unexpected fetch of {}", call.url);
	}
}

pub async fn wait_until<F>(name: &str, mut condition: F)
where
	F: FnMut() -> bool,
{
	timeout(Duration::from_secs(2), async move {
		loop {
			if condition() {
				return;
			}
			sleep(Duration::from_millis(10)).await;
		}
	})
	.await
	.unwrap_or_else(|_| panic!("timed out waiting for {name}"));
}
