use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic fetch sequence for one stream.
///
/// Clones share the counter so in-flight fetch tasks can tell whether they are still the latest.
#[derive(Debug, Default, Clone)]
pub(crate) struct FetchSequence {
	latest: Arc<AtomicU64>,
}

impl FetchSequence {
	/// Issues the next sequence number, starting at 1.
	pub fn advance(&self) -> u64 {
		self.latest.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}

	/// Returns the most recently issued sequence number.
	pub fn latest(&self) -> u64 {
		self.latest.load(Ordering::Acquire)
	}

	/// Returns true when no newer sequence number has been issued.
	pub fn is_latest(&self, seq: u64) -> bool {
		self.latest() == seq
	}
}

/// Sequence-scoped cancellation token for one in-flight fetch.
#[derive(Debug, Clone)]
pub(crate) struct FetchTicket {
	seq: u64,
	cancel: CancellationToken,
}

impl FetchTicket {
	/// Creates a ticket with a fresh cancellation token.
	pub fn new(seq: u64) -> Self {
		Self {
			seq,
			cancel: CancellationToken::new(),
		}
	}

	/// Returns the sequence number.
	pub const fn seq(&self) -> u64 {
		self.seq
	}

	/// Retires the fetch.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Returns true once the fetch has been retired.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Resolves once [`Self::cancel`] has been called on any clone.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
