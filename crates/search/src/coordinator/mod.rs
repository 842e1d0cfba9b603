//! Per-stream fetch coordinator.
//!
//! # Purpose
//!
//! * Owns the search state of one entity stream and applies every action to it in dispatch order.
//! * Debounces search triggers, issues fetches, and turns their outcomes into terminal actions.
//! * Guarantees that only the most recently issued fetch may change the state.
//!
//! # Mental model
//!
//! * [`SearchStream`] is a command handle; the coordinator actor behind it is the only writer of
//!   the stream's [`SearchState`](crate::SearchState).
//! * Phases: `Idle -> Debouncing -> InFlight -> Idle`. A search trigger (re)arms the debounce
//!   deadline; when it elapses the pending query is resolved into a
//!   [`Navigation`](crate::Navigation) and fetched.
//! * Every fetch gets a ticket carrying a monotonically increasing sequence number. Completions are
//!   matched against the ticket of the current in-flight fetch; anything else is stale.
//!
//! # Invariants
//!
//! * Must drop completions whose sequence number is not the current in-flight ticket's.
//! * Must retire the in-flight fetch on a new fetch, a new search trigger, and a clear.
//! * Must never log a superseded completion above `trace`.
//! * Must apply page navigation only when the link lands on an existing page.
//! * Must publish a snapshot and emit `StateChanged` whenever the state changes.
//!
//! # Concurrency & ordering
//!
//! * One actor task per stream; commands are processed sequentially in send order.
//! * Commands win over completions when both are ready, so a completion racing a newer fetch is
//!   always judged against the newer ticket.
//! * Fetch tasks only hold their ticket, the fetcher and a completion sender; they never touch state.
//!
//! # Failure modes & recovery
//!
//! * Fetch error: surfaced as `FetchError`; matches and paging are kept. No automatic retry.
//! * Hung fetch: the stream stays `InFlight` until the fetch resolves or is superseded.
//! * Handle dropped or [`SearchStream::shutdown`]: the actor stops and cancels its in-flight fetch.

mod actor;

pub use actor::{FetchPhase, SearchStream, StreamEvent};

#[cfg(test)]
mod tests;
