use std::future::Future;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::action::StreamKind;
use crate::error::{Result, SearchError};

/// What a spawned task does, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TaskClass {
	/// The per-stream actor loop.
	Coordinator,
	/// One network fetch.
	Fetch,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Coordinator => "coordinator",
			Self::Fetch => "fetch",
		}
	}
}

/// Handle of the runtime the caller is running on.
pub(crate) fn runtime_handle() -> Result<Handle> {
	Handle::try_current().map_err(|_| SearchError::NoRuntime)
}

/// Spawns a stream task on `handle` with classification metadata.
pub(crate) fn spawn<F>(handle: &Handle, class: TaskClass, stream: StreamKind, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(task_class = class.as_str(), stream = stream.as_str(), "search.spawn");
	handle.spawn(fut)
}
