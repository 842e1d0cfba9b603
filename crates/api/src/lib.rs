//! Collaborators the MiST search core talks to: the entity catalogue, the URL builder and the
//! HTTP fetcher for paginated list endpoints.

pub mod config;
pub mod entity;
pub mod error;
pub mod fetch;
pub mod urls;

pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use entity::Entity;
pub use error::{ApiError, Result};
pub use fetch::{FetchResponse, HttpFetch, ReqwestFetcher, TOTAL_COUNT_HEADER};
pub use urls::{MistApi, UrlBuilder, UrlRequest};
