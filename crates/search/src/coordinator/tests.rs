use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use mist_api::{ApiError, FetchResponse, HttpFetch, MistApi};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::runtime::Handle;

use super::FetchPhase;
use super::actor::{Completion, StreamCmd, StreamCoordinator};
use crate::action::{ClearPayload, SearchAction, StreamKind};
use crate::config::SearchConfig;
use crate::links::PageLink;
use crate::query::{Navigation, QueryDescriptor};
use crate::state::SearchState;

/// Fetcher whose requests never complete; tests deliver completions by hand.
struct HangingFetcher;

#[async_trait]
impl HttpFetch for HangingFetcher {
	async fn get(&self, _url: &str) -> mist_api::Result<FetchResponse> {
		std::future::pending().await
	}
}

fn api() -> Arc<MistApi> {
	Arc::new(MistApi::new("http://mist.test/v1").expect("valid base"))
}

fn coordinator(kind: StreamKind) -> StreamCoordinator {
	let _ = tracing_subscriber::fmt::try_init();
	let (coordinator, _completions) = StreamCoordinator::new(kind, &SearchConfig::default(), Arc::new(HangingFetcher), api(), Handle::current());
	coordinator
}

fn query(text: &str) -> QueryDescriptor {
	QueryDescriptor::search(text).with_per_page(NonZeroU32::new(10).expect("non-zero"))
}

fn nav(text: &str) -> Navigation {
	Navigation::resolve(api().as_ref(), mist_api::Entity::Genomes, query(text))
}

fn response(ids: &[u64], total_count: u64) -> std::result::Result<FetchResponse, ApiError> {
	Ok(FetchResponse {
		records: ids.iter().map(|id| json!({ "id": id })).collect(),
		total_count,
	})
}

fn ids(state: &SearchState) -> Vec<u64> {
	state.matches().iter().filter_map(|record| record["id"].as_u64()).collect()
}

fn fetch(coordinator: &mut StreamCoordinator, navigation: Navigation) -> u64 {
	assert!(coordinator.handle(StreamCmd::Dispatch(SearchAction::Fetch(navigation))));
	coordinator.in_flight_seq().expect("fetch must be in flight")
}

#[tokio::test]
async fn superseded_success_is_dropped() {
	let mut coordinator = coordinator(StreamKind::Genomes);
	let seq_a = fetch(&mut coordinator, nav("a"));
	let seq_b = fetch(&mut coordinator, nav("b"));
	assert!(seq_b > seq_a);

	coordinator.complete(Completion {
		seq: seq_a,
		outcome: response(&[1], 1),
	});
	assert!(coordinator.state().is_fetching());
	assert!(coordinator.state().matches().is_empty());

	coordinator.complete(Completion {
		seq: seq_b,
		outcome: response(&[2], 1),
	});
	assert!(!coordinator.state().is_fetching());
	assert_eq!(ids(coordinator.state()), vec![2]);
	assert_eq!(coordinator.phase(), FetchPhase::Idle);
}

#[tokio::test]
async fn superseded_error_is_dropped() {
	let mut coordinator = coordinator(StreamKind::Scope);
	let seq_a = fetch(&mut coordinator, nav("a"));
	let _seq_b = fetch(&mut coordinator, nav("b"));

	coordinator.complete(Completion {
		seq: seq_a,
		outcome: Err(ApiError::Network("connection reset".into())),
	});
	assert_eq!(coordinator.state().error_message(), None);
	assert!(coordinator.state().is_fetching());
}

#[tokio::test]
async fn late_completion_after_clear_is_dropped() {
	let mut coordinator = coordinator(StreamKind::Genomes);
	let seq = fetch(&mut coordinator, nav("abc"));

	coordinator.handle(StreamCmd::Dispatch(SearchAction::Clear(ClearPayload {
		query: Some("xyz".into()),
		scope: Some("s2".into()),
	})));
	coordinator.complete(Completion {
		seq,
		outcome: response(&[1, 2, 3], 3),
	});

	assert_eq!(coordinator.state(), &SearchState::cleared(Some("xyz".into()), Some("s2".into())));
	assert_eq!(coordinator.phase(), FetchPhase::Idle);
}

#[tokio::test]
async fn completion_is_applied_once() {
	let mut coordinator = coordinator(StreamKind::Genomes);
	let seq = fetch(&mut coordinator, nav("abc"));
	coordinator.complete(Completion {
		seq,
		outcome: response(&[1], 1),
	});
	coordinator.complete(Completion {
		seq,
		outcome: Err(ApiError::Network("duplicate".into())),
	});
	assert_eq!(ids(coordinator.state()), vec![1]);
	assert_eq!(coordinator.state().error_message(), None);
}

#[tokio::test]
async fn search_arms_debounce_and_retires_in_flight() {
	let mut coordinator = coordinator(StreamKind::Genomes);
	let seq = fetch(&mut coordinator, nav("old"));

	coordinator.handle(StreamCmd::Dispatch(SearchAction::Search(query("new"))));
	assert_eq!(coordinator.phase(), FetchPhase::Debouncing);
	assert_eq!(coordinator.state().query(), Some("new"));
	assert!(!coordinator.state().is_fetching());

	coordinator.complete(Completion {
		seq,
		outcome: response(&[9], 1),
	});
	assert!(coordinator.state().matches().is_empty());

	coordinator.flush_pending();
	assert_eq!(coordinator.phase(), FetchPhase::InFlight);
	assert!(coordinator.state().is_fetching());
}

#[tokio::test]
async fn unresolvable_trigger_does_not_fetch() {
	let mut coordinator = coordinator(StreamKind::GenomesShopCart);
	coordinator.handle(StreamCmd::Dispatch(SearchAction::Search(QueryDescriptor::by_ids(Vec::<String>::new()))));
	coordinator.flush_pending();

	assert_eq!(coordinator.phase(), FetchPhase::Idle);
	assert!(!coordinator.state().is_fetching());
	assert_eq!(coordinator.in_flight_seq(), None);
}

#[tokio::test]
async fn navigation_follows_links_within_range() {
	let mut coordinator = coordinator(StreamKind::Genomes);
	let seq = fetch(&mut coordinator, nav("abc"));
	coordinator.complete(Completion {
		seq,
		outcome: response(&[1], 25),
	});
	assert_eq!(coordinator.state().total_pages(), Some(3));

	coordinator.handle(StreamCmd::Navigate(PageLink::Prev));
	assert_eq!(coordinator.phase(), FetchPhase::Idle);
	assert_eq!(ids(coordinator.state()), vec![1]);

	coordinator.handle(StreamCmd::Navigate(PageLink::Last));
	assert_eq!(coordinator.phase(), FetchPhase::InFlight);
	assert!(coordinator.state().matches().is_empty());
	let seq = coordinator.in_flight_seq().expect("last page in flight");
	coordinator.complete(Completion {
		seq,
		outcome: response(&[21, 22, 23, 24, 25], 25),
	});
	assert_eq!(coordinator.state().current_page(), Some(3));
	assert!(!coordinator.state().can_navigate(PageLink::Next));
}

#[tokio::test]
async fn shutdown_command_stops_the_actor() {
	let mut coordinator = coordinator(StreamKind::Genes);
	assert!(!coordinator.handle(StreamCmd::Shutdown));
}

#[tokio::test]
async fn dispatched_error_ends_the_in_flight_fetch() {
	let mut coordinator = coordinator(StreamKind::Genomes);
	let seq = fetch(&mut coordinator, nav("abc"));

	coordinator.handle(StreamCmd::Dispatch(SearchAction::FetchError("injected".into())));
	assert_eq!(coordinator.phase(), FetchPhase::Idle);
	assert!(!coordinator.state().is_fetching());

	coordinator.complete(Completion {
		seq,
		outcome: response(&[1, 2], 2),
	});
	assert_eq!(coordinator.state().error_message(), Some("injected"));
	assert!(coordinator.state().matches().is_empty());
}

#[tokio::test]
async fn dispatched_done_ends_the_in_flight_fetch() {
	let mut coordinator = coordinator(StreamKind::Genes);
	let seq = fetch(&mut coordinator, nav("abc"));
	let page = crate::links::PageInfo::for_query(nav("abc").query(), 1);

	coordinator.handle(StreamCmd::Dispatch(SearchAction::FetchDone(crate::action::FetchDone {
		page,
		links: crate::links::PageLinks::default(),
		matches: vec![json!({ "id": 5 })].into(),
	})));
	assert_eq!(coordinator.phase(), FetchPhase::Idle);

	coordinator.complete(Completion {
		seq,
		outcome: Err(ApiError::Network("late".into())),
	});
	assert_eq!(ids(coordinator.state()), vec![5]);
	assert_eq!(coordinator.state().error_message(), None);
}
