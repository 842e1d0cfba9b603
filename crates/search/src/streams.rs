//! Registry of the five entity streams.

use std::sync::Arc;

use mist_api::{HttpFetch, MistApi, ReqwestFetcher, UrlBuilder};

use crate::action::StreamKind;
use crate::config::SearchConfig;
use crate::coordinator::SearchStream;
use crate::error::Result;

/// One running [`SearchStream`] per [`StreamKind`].
///
/// Streams share the fetcher and URL builder but nothing else; an action on one never touches
/// another's state.
pub struct MistStreams {
	streams: Vec<SearchStream>,
}

impl MistStreams {
	/// Starts every stream on the current tokio runtime.
	pub fn spawn(config: &SearchConfig, fetcher: Arc<dyn HttpFetch>, urls: Arc<dyn UrlBuilder>) -> Result<Self> {
		let mut streams = Vec::with_capacity(StreamKind::ALL.len());
		for kind in StreamKind::ALL {
			streams.push(SearchStream::spawn(kind, config, Arc::clone(&fetcher), Arc::clone(&urls))?);
		}
		tracing::debug!(streams = streams.len(), base_url = %config.api.base_url, "search.streams.started");
		Ok(Self { streams })
	}

	/// Starts every stream against the HTTP API described by `config.api`.
	pub fn from_config(config: &SearchConfig) -> Result<Self> {
		let fetcher = Arc::new(ReqwestFetcher::new(&config.api)?);
		let urls = Arc::new(MistApi::from_config(&config.api)?);
		Self::spawn(config, fetcher, urls)
	}

	pub fn get(&self, kind: StreamKind) -> &SearchStream {
		&self.streams[kind.index()]
	}

	pub fn genomes(&self) -> &SearchStream {
		self.get(StreamKind::Genomes)
	}

	pub fn genes(&self) -> &SearchStream {
		self.get(StreamKind::Genes)
	}

	pub fn genes_shopcart(&self) -> &SearchStream {
		self.get(StreamKind::GenesShopCart)
	}

	pub fn genomes_shopcart(&self) -> &SearchStream {
		self.get(StreamKind::GenomesShopCart)
	}

	pub fn scope(&self) -> &SearchStream {
		self.get(StreamKind::Scope)
	}

	pub fn iter(&self) -> impl Iterator<Item = &SearchStream> {
		self.streams.iter()
	}

	/// Stops every stream and waits for their coordinators to exit.
	pub async fn shutdown(self) {
		for stream in self.streams {
			stream.shutdown().await;
		}
	}
}
