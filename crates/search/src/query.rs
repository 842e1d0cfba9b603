//! Query descriptors and the navigations resolved from them.

use std::num::NonZeroU32;

use mist_api::{Entity, UrlBuilder, UrlRequest};

use crate::error::{Result, SearchError};

/// Page size used when a query does not pick one.
pub const DEFAULT_PER_PAGE: NonZeroU32 = NonZeroU32::new(30).unwrap();

/// Immutable description of one search request.
///
/// Builder methods consume and return a new descriptor; nothing mutates a descriptor once it has
/// been handed to a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
	search: Option<String>,
	scope: Option<String>,
	ids: Option<Vec<String>>,
	filter: String,
	page_index: i64,
	per_page: NonZeroU32,
}

impl QueryDescriptor {
	/// Free-text search starting at page 1.
	pub fn search(text: impl Into<String>) -> Self {
		Self {
			search: Some(text.into()),
			scope: None,
			ids: None,
			filter: String::new(),
			page_index: 1,
			per_page: DEFAULT_PER_PAGE,
		}
	}

	/// Fetch of an explicit id list (shopcart contents) starting at page 1.
	pub fn by_ids<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			search: None,
			scope: None,
			ids: Some(ids.into_iter().map(Into::into).collect()),
			filter: String::new(),
			page_index: 1,
			per_page: DEFAULT_PER_PAGE,
		}
	}

	#[must_use]
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = Some(scope.into());
		self
	}

	#[must_use]
	pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = filter.into();
		self
	}

	#[must_use]
	pub fn with_per_page(mut self, per_page: NonZeroU32) -> Self {
		self.per_page = per_page;
		self
	}

	/// Like [`Self::with_per_page`] for unvalidated input.
	pub fn try_with_per_page(self, per_page: u32) -> Result<Self> {
		let per_page = NonZeroU32::new(per_page).ok_or(SearchError::InvalidPerPage(per_page))?;
		Ok(self.with_per_page(per_page))
	}

	/// Page indices are not clamped: link derivation may legitimately produce 0 or past-the-end pages.
	#[must_use]
	pub fn with_page(mut self, page_index: i64) -> Self {
		self.page_index = page_index;
		self
	}

	/// Copy of this descriptor pointing at another page.
	pub fn at_page(&self, page_index: i64) -> Self {
		self.clone().with_page(page_index)
	}

	pub fn search_text(&self) -> Option<&str> {
		self.search.as_deref()
	}

	pub fn scope(&self) -> Option<&str> {
		self.scope.as_deref()
	}

	pub fn ids(&self) -> Option<&[String]> {
		self.ids.as_deref()
	}

	pub fn filter(&self) -> &str {
		&self.filter
	}

	pub fn page_index(&self) -> i64 {
		self.page_index
	}

	pub fn per_page(&self) -> NonZeroU32 {
		self.per_page
	}

	pub fn is_id_list(&self) -> bool {
		self.ids.is_some()
	}

	/// Text a stream shows as its current query: the search text, or the comma-joined id list.
	pub fn label(&self) -> Option<String> {
		match &self.ids {
			Some(ids) => Some(ids.join(",")),
			None => self.search.clone(),
		}
	}

	fn url_request(&self) -> UrlRequest<'_> {
		UrlRequest {
			search: self.search.as_deref(),
			scope: self.scope.as_deref(),
			ids: self.ids.as_deref().unwrap_or(&[]),
			filter: &self.filter,
			page_index: self.page_index,
			per_page: self.per_page.get(),
		}
	}
}

/// A resolved, fetchable URL plus what is needed to derive sibling pages later.
///
/// An empty `url` means the descriptor could not be turned into a request yet; fetching such a
/// navigation is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
	pub url: String,
	pub filter: String,
	pub is_id_list_fetch: bool,
	query: QueryDescriptor,
}

impl Navigation {
	/// Resolves `query` into a navigation, choosing the id-list URL shape when it carries ids.
	pub fn resolve(urls: &dyn UrlBuilder, entity: Entity, query: QueryDescriptor) -> Self {
		let is_id_list_fetch = query.is_id_list();
		Self::build(urls, entity, query, is_id_list_fetch)
	}

	/// Navigation for another page of the same query, keeping this navigation's URL shape.
	pub fn sibling(&self, urls: &dyn UrlBuilder, entity: Entity, page_index: i64) -> Self {
		Self::build(urls, entity, self.query.at_page(page_index), self.is_id_list_fetch)
	}

	fn build(urls: &dyn UrlBuilder, entity: Entity, query: QueryDescriptor, is_id_list_fetch: bool) -> Self {
		let request = query.url_request();
		let url = if is_id_list_fetch {
			urls.id_list_url(entity, &request)
		} else {
			urls.search_url(entity, &request)
		};
		Self {
			url: url.unwrap_or_default(),
			filter: query.filter.clone(),
			is_id_list_fetch,
			query,
		}
	}

	pub fn is_fetchable(&self) -> bool {
		!self.url.is_empty()
	}

	pub fn query(&self) -> &QueryDescriptor {
		&self.query
	}

	pub fn page_index(&self) -> i64 {
		self.query.page_index
	}
}
