//! Prev/next/first/last navigation derived from a completed fetch.

use std::num::NonZeroU32;

use mist_api::{Entity, UrlBuilder};

use crate::query::{Navigation, QueryDescriptor};

/// Pagination facts of one completed fetch. Present as a whole or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
	pub count: u64,
	pub current_page: i64,
	pub per_page: NonZeroU32,
	pub total_pages: u64,
}

impl PageInfo {
	/// Pagination for `query` given the server's total match count.
	pub fn for_query(query: &QueryDescriptor, count: u64) -> Self {
		let per_page = query.per_page();
		Self {
			count,
			current_page: query.page_index(),
			per_page,
			total_pages: count.div_ceil(u64::from(per_page.get())),
		}
	}
}

/// One of the four page-navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageLink {
	First,
	Last,
	Prev,
	Next,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
	pub first: Option<Navigation>,
	pub last: Option<Navigation>,
	pub next: Option<Navigation>,
	pub prev: Option<Navigation>,
}

impl PageLinks {
	pub fn get(&self, link: PageLink) -> Option<&Navigation> {
		match link {
			PageLink::First => self.first.as_ref(),
			PageLink::Last => self.last.as_ref(),
			PageLink::Prev => self.prev.as_ref(),
			PageLink::Next => self.next.as_ref(),
		}
	}

	pub fn url(&self, link: PageLink) -> Option<&str> {
		self.get(link).map(|nav| nav.url.as_str())
	}

	pub fn is_empty(&self) -> bool {
		self.first.is_none() && self.last.is_none() && self.next.is_none() && self.prev.is_none()
	}
}

/// Builds sibling-page links for the page `previous` just fetched.
///
/// `next` may point past the last page and `prev` may point at page 0; range checks belong to
/// whoever follows the link (see [`crate::SearchState::can_navigate`]).
pub fn build_links(urls: &dyn UrlBuilder, entity: Entity, previous: &Navigation, page: &PageInfo) -> PageLinks {
	let link = |page_index: i64| Some(previous.sibling(urls, entity, page_index)).filter(Navigation::is_fetchable);
	let last = i64::try_from(page.total_pages).unwrap_or(i64::MAX);
	PageLinks {
		first: link(1),
		last: link(last),
		next: link(page.current_page.saturating_add(1)),
		prev: link(page.current_page.saturating_sub(1)),
	}
}
