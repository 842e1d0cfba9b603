//! Typed actions and the streams they are dispatched to.

use std::sync::Arc;

use mist_api::Entity;

use crate::links::{PageInfo, PageLinks};
use crate::query::{Navigation, QueryDescriptor};
use crate::state::Record;

/// One independently-stateful entity stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
	Genomes,
	Genes,
	GenesShopCart,
	GenomesShopCart,
	Scope,
}

impl StreamKind {
	pub const ALL: [Self; 5] = [Self::Genomes, Self::Genes, Self::GenesShopCart, Self::GenomesShopCart, Self::Scope];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Genomes => "genomes",
			Self::Genes => "genes",
			Self::GenesShopCart => "genes_shopcart",
			Self::GenomesShopCart => "genomes_shopcart",
			Self::Scope => "scope",
		}
	}

	pub(crate) const fn index(self) -> usize {
		match self {
			Self::Genomes => 0,
			Self::Genes => 1,
			Self::GenesShopCart => 2,
			Self::GenomesShopCart => 3,
			Self::Scope => 4,
		}
	}

	/// API entity listed by this stream. A gene search narrowed to a genome lists that genome's genes.
	pub fn entity(self, scope: Option<&str>) -> Entity {
		match self {
			Self::Genomes => Entity::Genomes,
			Self::Genes if scope.is_some_and(|scope| !scope.is_empty()) => Entity::GenesInsideGenome,
			Self::Genes => Entity::Genes,
			Self::GenesShopCart => Entity::GenesShopCart,
			Self::GenomesShopCart => Entity::GenomesShopCart,
			Self::Scope => Entity::Scope,
		}
	}

	pub const fn action_kinds(self) -> ActionKinds {
		match self {
			Self::Genomes => ActionKinds {
				search: "[Genomes] Search",
				fetch: "[Genomes] Fetch",
				fetch_done: "[Genomes] Fetch Done",
				fetch_error: "[Genomes] Fetch Error",
				clear: "[Genomes] Clear",
			},
			Self::Genes => ActionKinds {
				search: "[Genes] Search",
				fetch: "[Genes] Fetch",
				fetch_done: "[Genes] Fetch Done",
				fetch_error: "[Genes] Fetch Error",
				clear: "[Genes] Clear",
			},
			Self::GenesShopCart => ActionKinds {
				search: "[Genes ShopCart] Get By Id List",
				fetch: "[Genes ShopCart] Fetch",
				fetch_done: "[Genes ShopCart] Fetch Done",
				fetch_error: "[Genes ShopCart] Fetch Error",
				clear: "[Genes ShopCart] Clear",
			},
			Self::GenomesShopCart => ActionKinds {
				search: "[Genomes ShopCart] Get By Id List",
				fetch: "[Genomes ShopCart] Fetch",
				fetch_done: "[Genomes ShopCart] Fetch Done",
				fetch_error: "[Genomes ShopCart] Fetch Error",
				clear: "[Genomes ShopCart] Clear",
			},
			Self::Scope => ActionKinds {
				search: "[Scope] Search",
				fetch: "[Scope] Fetch",
				fetch_done: "[Scope] Fetch Done",
				fetch_error: "[Scope] Fetch Error",
				clear: "[Scope] Clear",
			},
		}
	}
}

/// Logical role of an action, shared by every stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionRole {
	/// Search, or Get By Id List on shopcart streams.
	Search,
	Fetch,
	FetchDone,
	FetchError,
	Clear,
}

/// Concrete action identifiers one stream uses for each [`ActionRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionKinds {
	pub search: &'static str,
	pub fetch: &'static str,
	pub fetch_done: &'static str,
	pub fetch_error: &'static str,
	pub clear: &'static str,
}

impl ActionKinds {
	pub const fn name(&self, role: ActionRole) -> &'static str {
		match role {
			ActionRole::Search => self.search,
			ActionRole::Fetch => self.fetch,
			ActionRole::FetchDone => self.fetch_done,
			ActionRole::FetchError => self.fetch_error,
			ActionRole::Clear => self.clear,
		}
	}
}

/// Payload of a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchDone {
	pub page: PageInfo,
	pub links: PageLinks,
	pub matches: Arc<[Record]>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearPayload {
	pub query: Option<String>,
	pub scope: Option<String>,
}

/// Every state transition a stream accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
	/// A new query was accepted (Search / Get By Id List).
	Search(QueryDescriptor),
	Fetch(Navigation),
	FetchDone(FetchDone),
	FetchError(String),
	Clear(ClearPayload),
}

impl SearchAction {
	pub const fn role(&self) -> ActionRole {
		match self {
			Self::Search(_) => ActionRole::Search,
			Self::Fetch(_) => ActionRole::Fetch,
			Self::FetchDone(_) => ActionRole::FetchDone,
			Self::FetchError(_) => ActionRole::FetchError,
			Self::Clear(_) => ActionRole::Clear,
		}
	}
}
