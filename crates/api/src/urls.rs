//! URL builder collaborator.
//!
//! The search core never formats URLs itself: it hands a [`UrlRequest`] to a [`UrlBuilder`] and
//! picks the variant (free-text search or explicit id list) that matches the fetch it is issuing.

use url::Url;

use crate::config::ApiConfig;
use crate::entity::Entity;
use crate::error::{ApiError, Result};

/// Everything a list URL encodes.
#[derive(Debug, Clone, Copy)]
pub struct UrlRequest<'a> {
	pub search: Option<&'a str>,
	pub scope: Option<&'a str>,
	pub ids: &'a [String],
	/// Url-encoded query fragment such as `where.phylum=Proteobacteria`.
	pub filter: &'a str,
	pub page_index: i64,
	pub per_page: u32,
}

/// Builds fetchable list URLs.
///
/// `None` signals that the URL cannot be built yet (for example a scoped resource without a
/// scope); callers treat it as "nothing to fetch" rather than as an error.
pub trait UrlBuilder: Send + Sync {
	fn search_url(&self, entity: Entity, request: &UrlRequest<'_>) -> Option<String>;

	fn id_list_url(&self, entity: Entity, request: &UrlRequest<'_>) -> Option<String>;
}

/// [`UrlBuilder`] for the MiST REST layout.
#[derive(Debug, Clone)]
pub struct MistApi {
	base: Url,
}

impl MistApi {
	pub fn new(base_url: &str) -> Result<Self> {
		let base = Url::parse(base_url).map_err(|err| ApiError::BaseUrl {
			url: base_url.to_string(),
			reason: err.to_string(),
		})?;
		if base.cannot_be_a_base() {
			return Err(ApiError::BaseUrl {
				url: base_url.to_string(),
				reason: "url cannot carry a path".to_string(),
			});
		}
		Ok(Self { base })
	}

	pub fn from_config(config: &ApiConfig) -> Result<Self> {
		Self::new(&config.base_url)
	}

	pub fn base(&self) -> &Url {
		&self.base
	}

	fn endpoint(&self, entity: Entity, scope: Option<&str>) -> Option<Url> {
		let segments = entity.resource_path(scope)?;
		let mut url = self.base.clone();
		url.set_query(None);
		{
			let mut path = url.path_segments_mut().ok()?;
			path.pop_if_empty();
			path.extend(segments.iter());
		}
		Some(url)
	}

	fn finish(mut url: Url, entity: Entity, selector: Option<(&str, &str)>, request: &UrlRequest<'_>) -> String {
		{
			let mut query = url.query_pairs_mut();
			if let Some((key, value)) = selector {
				query.append_pair(key, value);
			}
			query.append_pair("page", &request.page_index.to_string());
			query.append_pair("per_page", &request.per_page.to_string());
			for (key, value) in url::form_urlencoded::parse(request.filter.as_bytes()) {
				query.append_pair(&key, &value);
			}
			for (key, value) in entity.field_params() {
				query.append_pair(key, value);
			}
		}
		url.into()
	}
}

impl UrlBuilder for MistApi {
	fn search_url(&self, entity: Entity, request: &UrlRequest<'_>) -> Option<String> {
		let url = self.endpoint(entity, request.scope)?;
		let search = request.search.filter(|text| !text.is_empty()).map(|text| ("search", text));
		Some(Self::finish(url, entity, search, request))
	}

	fn id_list_url(&self, entity: Entity, request: &UrlRequest<'_>) -> Option<String> {
		if request.ids.is_empty() {
			return None;
		}
		let url = self.endpoint(entity, request.scope)?;
		let ids = request.ids.join(",");
		Some(Self::finish(url, entity, Some(("where.id", &ids)), request))
	}
}
