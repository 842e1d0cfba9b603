//! Per-stream search state and its pure transition function.

use std::num::NonZeroU32;
use std::sync::Arc;

use crate::action::{ClearPayload, FetchDone, SearchAction};
use crate::links::{PageInfo, PageLink, PageLinks};

/// Opaque record as returned by the API, in server order.
pub type Record = serde_json::Value;

/// Everything the UI reads for one stream.
///
/// Pagination lives in a single `page` field so count, current page, page size and total pages
/// are always replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
	pub query: Option<String>,
	pub scope: Option<String>,
	pub page: Option<PageInfo>,
	pub is_fetching: bool,
	pub error_message: Option<String>,
	pub matches: Arc<[Record]>,
	pub links: PageLinks,
}

impl Default for SearchState {
	fn default() -> Self {
		Self {
			query: None,
			scope: None,
			page: None,
			is_fetching: false,
			error_message: None,
			matches: Arc::from(Vec::<Record>::new()),
			links: PageLinks::default(),
		}
	}
}

impl SearchState {
	/// Initial state seeded with a query and scope.
	pub fn cleared(query: Option<String>, scope: Option<String>) -> Self {
		Self {
			query,
			scope,
			..Self::default()
		}
	}

	pub fn query(&self) -> Option<&str> {
		self.query.as_deref()
	}

	pub fn scope(&self) -> Option<&str> {
		self.scope.as_deref()
	}

	pub fn is_fetching(&self) -> bool {
		self.is_fetching
	}

	pub fn error_message(&self) -> Option<&str> {
		self.error_message.as_deref()
	}

	pub fn matches(&self) -> &[Record] {
		&self.matches
	}

	pub fn page_info(&self) -> Option<PageInfo> {
		self.page
	}

	pub fn count(&self) -> Option<u64> {
		self.page.map(|page| page.count)
	}

	pub fn current_page(&self) -> Option<i64> {
		self.page.map(|page| page.current_page)
	}

	pub fn per_page(&self) -> Option<NonZeroU32> {
		self.page.map(|page| page.per_page)
	}

	pub fn total_pages(&self) -> Option<u64> {
		self.page.map(|page| page.total_pages)
	}

	pub fn links(&self) -> &PageLinks {
		&self.links
	}

	/// Whether following `link` lands on an existing page of the last completed fetch.
	pub fn can_navigate(&self, link: PageLink) -> bool {
		let (Some(page), Some(nav)) = (self.page, self.links.get(link)) else {
			return false;
		};
		u64::try_from(nav.page_index()).is_ok_and(|index| index >= 1 && index <= page.total_pages)
	}
}

/// Applies one action, returning the next state. Never mutates `state`.
pub fn transition(state: &SearchState, action: SearchAction) -> SearchState {
	match action {
		SearchAction::Search(query) => SearchState {
			query: query.label(),
			scope: query.scope().map(str::to_owned),
			page: None,
			is_fetching: false,
			error_message: None,
			matches: Arc::from(Vec::<Record>::new()),
			links: PageLinks::default(),
		},
		SearchAction::Fetch(navigation) => {
			if !navigation.is_fetchable() {
				return state.clone();
			}
			SearchState {
				is_fetching: true,
				error_message: None,
				matches: Arc::from(Vec::<Record>::new()),
				..state.clone()
			}
		}
		SearchAction::FetchDone(FetchDone { page, links, matches }) => SearchState {
			page: Some(page),
			is_fetching: false,
			matches,
			links,
			..state.clone()
		},
		SearchAction::FetchError(message) => SearchState {
			error_message: Some(message),
			is_fetching: false,
			..state.clone()
		},
		SearchAction::Clear(ClearPayload { query, scope }) => SearchState::cleared(query, scope),
	}
}
