//! Search/fetch state machine behind the MiST entity lists.
//!
//! Five independent streams (genomes, genes, both shopcarts and scope) each keep a
//! [`SearchState`] that only changes through [`transition`]. A per-stream coordinator debounces
//! search triggers, issues fetches through [`mist_api::HttpFetch`], and drops any completion that a
//! newer fetch or a clear has superseded.

pub mod action;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod links;
pub mod query;
mod sequence;
pub mod state;
pub mod streams;
mod task;

pub use action::{ActionKinds, ActionRole, ClearPayload, FetchDone, SearchAction, StreamKind};
pub use config::{DEFAULT_DEBOUNCE, SearchConfig};
pub use coordinator::{FetchPhase, SearchStream, StreamEvent};
pub use error::{Result, SearchError};
pub use links::{PageInfo, PageLink, PageLinks, build_links};
pub use query::{DEFAULT_PER_PAGE, Navigation, QueryDescriptor};
pub use state::{Record, SearchState, transition};
pub use streams::MistStreams;
