use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::Duration;

use mist_api::{ApiError, FetchResponse, HttpFetch, UrlBuilder};
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::action::{ClearPayload, FetchDone, SearchAction, StreamKind};
use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::links::{PageInfo, PageLink, build_links};
use crate::query::{Navigation, QueryDescriptor};
use crate::sequence::{FetchSequence, FetchTicket};
use crate::state::{SearchState, transition};
use crate::task::{self, TaskClass};

/// Command protocol for the stream coordinator actor.
#[derive(Debug)]
pub(crate) enum StreamCmd {
	Dispatch(SearchAction),
	Navigate(PageLink),
	Shutdown,
}

/// Outcome of one fetch, tagged with the sequence number it was issued under.
#[derive(Debug)]
pub(crate) struct Completion {
	pub(crate) seq: u64,
	pub(crate) outcome: std::result::Result<FetchResponse, ApiError>,
}

/// Event protocol emitted by the stream coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
	StateChanged { stream: StreamKind, revision: u64 },
}

/// Where the stream is in its fetch lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPhase {
	#[default]
	Idle,
	Debouncing,
	InFlight,
}

#[derive(Default)]
struct SharedState {
	revision: u64,
	phase: FetchPhase,
	state: SearchState,
}

struct PendingSearch {
	query: QueryDescriptor,
	deadline: Instant,
}

struct InFlight {
	ticket: FetchTicket,
	navigation: Navigation,
}

pub(crate) struct StreamCoordinator {
	kind: StreamKind,
	debounce: Duration,
	urls: Arc<dyn UrlBuilder>,
	fetcher: Arc<dyn HttpFetch>,
	runtime: Handle,
	state: SearchState,
	revision: u64,
	dirty: bool,
	sequence: FetchSequence,
	pending: Option<PendingSearch>,
	in_flight: Option<InFlight>,
	completion_tx: mpsc::UnboundedSender<Completion>,
	shared: Arc<RwLock<SharedState>>,
	changed: Arc<AtomicBool>,
	events: broadcast::Sender<StreamEvent>,
}

impl StreamCoordinator {
	pub(crate) fn new(
		kind: StreamKind,
		config: &SearchConfig,
		fetcher: Arc<dyn HttpFetch>,
		urls: Arc<dyn UrlBuilder>,
		runtime: Handle,
	) -> (Self, mpsc::UnboundedReceiver<Completion>) {
		let (completion_tx, completion_rx) = mpsc::unbounded_channel();
		let (events, _) = broadcast::channel(config.event_buffer.max(1));
		let coordinator = Self {
			kind,
			debounce: config.debounce(),
			urls,
			fetcher,
			runtime,
			state: SearchState::default(),
			revision: 0,
			dirty: false,
			sequence: FetchSequence::default(),
			pending: None,
			in_flight: None,
			completion_tx,
			shared: Arc::new(RwLock::new(SharedState::default())),
			changed: Arc::new(AtomicBool::new(false)),
			events,
		};
		(coordinator, completion_rx)
	}

	#[cfg(test)]
	pub(crate) fn state(&self) -> &SearchState {
		&self.state
	}

	pub(crate) fn phase(&self) -> FetchPhase {
		if self.in_flight.is_some() {
			FetchPhase::InFlight
		} else if self.pending.is_some() {
			FetchPhase::Debouncing
		} else {
			FetchPhase::Idle
		}
	}

	#[cfg(test)]
	pub(crate) fn in_flight_seq(&self) -> Option<u64> {
		self.in_flight.as_ref().map(|in_flight| in_flight.ticket.seq())
	}

	pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<StreamCmd>, mut completions: mpsc::UnboundedReceiver<Completion>) {
		loop {
			let deadline = self.pending.as_ref().map(|pending| pending.deadline);
			let debounce = async move {
				match deadline {
					Some(deadline) => tokio::time::sleep_until(deadline).await,
					None => std::future::pending::<()>().await,
				}
			};

			tokio::select! {
				biased;
				maybe_cmd = commands.recv() => {
					let Some(cmd) = maybe_cmd else {
						break;
					};
					if !self.handle(cmd) {
						break;
					}
				}
				Some(completion) = completions.recv() => self.complete(completion),
				() = debounce => self.flush_pending(),
			}
			self.sync_shared();
		}

		self.pending = None;
		self.retire_in_flight();
		self.sync_shared();
		tracing::debug!(stream = self.kind.as_str(), "search.stream.stopped");
	}

	/// Returns `false` when the actor should stop.
	pub(crate) fn handle(&mut self, cmd: StreamCmd) -> bool {
		match cmd {
			StreamCmd::Dispatch(action) => self.dispatch(action),
			StreamCmd::Navigate(link) => self.navigate(link),
			StreamCmd::Shutdown => return false,
		}
		true
	}

	fn dispatch(&mut self, action: SearchAction) {
		match action {
			SearchAction::Search(query) => {
				self.retire_in_flight();
				tracing::trace!(
					stream = self.kind.as_str(),
					debounce = ?self.debounce,
					"search.debounce.armed"
				);
				self.pending = Some(PendingSearch {
					query: query.clone(),
					deadline: Instant::now() + self.debounce,
				});
				self.apply(SearchAction::Search(query));
			}
			SearchAction::Fetch(navigation) => self.start_fetch(navigation),
			SearchAction::Clear(payload) => {
				self.pending = None;
				self.retire_in_flight();
				self.apply(SearchAction::Clear(payload));
			}
			action @ (SearchAction::FetchDone(_) | SearchAction::FetchError(_)) => {
				self.retire_in_flight();
				self.apply(action);
			}
		}
	}

	fn navigate(&mut self, link: PageLink) {
		let navigation = match self.state.links.get(link) {
			Some(navigation) if self.state.can_navigate(link) => navigation.clone(),
			_ => {
				tracing::debug!(stream = self.kind.as_str(), ?link, "search.navigate.unavailable");
				return;
			}
		};
		self.start_fetch(navigation);
	}

	pub(crate) fn flush_pending(&mut self) {
		let Some(pending) = self.pending.take() else {
			return;
		};
		let entity = self.kind.entity(pending.query.scope());
		let navigation = Navigation::resolve(self.urls.as_ref(), entity, pending.query);
		self.start_fetch(navigation);
	}

	fn start_fetch(&mut self, navigation: Navigation) {
		if !navigation.is_fetchable() {
			tracing::debug!(stream = self.kind.as_str(), "search.fetch.unresolved");
			self.apply(SearchAction::Fetch(navigation));
			return;
		}

		self.retire_in_flight();
		let ticket = FetchTicket::new(self.sequence.advance());
		let seq = ticket.seq();
		tracing::debug!(stream = self.kind.as_str(), seq, url = %navigation.url, "search.fetch.issued");
		self.apply(SearchAction::Fetch(navigation.clone()));

		let task_ticket = ticket.clone();
		let sequence = self.sequence.clone();
		let fetcher = Arc::clone(&self.fetcher);
		let completion_tx = self.completion_tx.clone();
		let url = navigation.url.clone();
		task::spawn(&self.runtime, TaskClass::Fetch, self.kind, async move {
			let outcome = tokio::select! {
				biased;
				() = task_ticket.cancelled() => return,
				outcome = fetcher.get(&url) => outcome,
			};
			if task_ticket.is_cancelled() || !sequence.is_latest(seq) {
				return;
			}
			let _ = completion_tx.send(Completion { seq, outcome });
		});

		self.in_flight = Some(InFlight { ticket, navigation });
	}

	fn retire_in_flight(&mut self) {
		if let Some(in_flight) = self.in_flight.take() {
			tracing::trace!(stream = self.kind.as_str(), seq = in_flight.ticket.seq(), "search.fetch.retired");
			in_flight.ticket.cancel();
		}
	}

	pub(crate) fn complete(&mut self, completion: Completion) {
		let Completion { seq, outcome } = completion;
		let Some(in_flight) = self.in_flight.take_if(|in_flight| in_flight.ticket.seq() == seq) else {
			tracing::trace!(stream = self.kind.as_str(), seq, latest = self.sequence.latest(), "search.fetch.superseded");
			return;
		};

		match outcome {
			Ok(response) => {
				let navigation = in_flight.navigation;
				let page = PageInfo::for_query(navigation.query(), response.total_count);
				let entity = self.kind.entity(navigation.query().scope());
				let links = build_links(self.urls.as_ref(), entity, &navigation, &page);
				tracing::debug!(
					stream = self.kind.as_str(),
					seq,
					count = page.count,
					page = page.current_page,
					total_pages = page.total_pages,
					"search.fetch.done"
				);
				self.apply(SearchAction::FetchDone(FetchDone {
					page,
					links,
					matches: response.records.into(),
				}));
			}
			Err(err) => {
				tracing::debug!(stream = self.kind.as_str(), seq, error = %err, "search.fetch.failed");
				self.apply(SearchAction::FetchError(err.to_string()));
			}
		}
	}

	fn apply(&mut self, action: SearchAction) {
		let name = self.kind.action_kinds().name(action.role());
		let next = transition(&self.state, action);
		tracing::trace!(stream = self.kind.as_str(), action = name, "search.reduce");
		if next != self.state {
			self.state = next;
			self.revision = self.revision.wrapping_add(1);
			self.dirty = true;
		}
	}

	fn sync_shared(&mut self) {
		let phase = self.phase();
		let dirty = std::mem::take(&mut self.dirty);
		{
			let mut shared = self.shared.write();
			shared.phase = phase;
			if dirty {
				shared.revision = self.revision;
				shared.state = self.state.clone();
			}
		}
		if dirty {
			self.changed.store(true, AtomicOrdering::Release);
			let _ = self.events.send(StreamEvent::StateChanged {
				stream: self.kind,
				revision: self.revision,
			});
		}
	}
}

/// Handle to one entity stream.
///
/// Dropping the handle stops the stream's coordinator.
pub struct SearchStream {
	kind: StreamKind,
	urls: Arc<dyn UrlBuilder>,
	commands: mpsc::UnboundedSender<StreamCmd>,
	shared: Arc<RwLock<SharedState>>,
	changed: Arc<AtomicBool>,
	events: broadcast::Sender<StreamEvent>,
	task: JoinHandle<()>,
}

impl SearchStream {
	/// Starts the coordinator for `kind` on the current tokio runtime.
	pub fn spawn(kind: StreamKind, config: &SearchConfig, fetcher: Arc<dyn HttpFetch>, urls: Arc<dyn UrlBuilder>) -> Result<Self> {
		let runtime = task::runtime_handle()?;
		let (coordinator, completions) = StreamCoordinator::new(kind, config, fetcher, Arc::clone(&urls), runtime.clone());
		let shared = Arc::clone(&coordinator.shared);
		let changed = Arc::clone(&coordinator.changed);
		let events = coordinator.events.clone();
		let (commands, command_rx) = mpsc::unbounded_channel();
		let task = task::spawn(&runtime, TaskClass::Coordinator, kind, coordinator.run(command_rx, completions));

		Ok(Self {
			kind,
			urls,
			commands,
			shared,
			changed,
			events,
			task,
		})
	}

	pub fn kind(&self) -> StreamKind {
		self.kind
	}

	pub fn dispatch(&self, action: SearchAction) -> Result<()> {
		self.send(StreamCmd::Dispatch(action))
	}

	/// Dispatches a search (or, for an id-list descriptor, a get-by-id-list) trigger.
	pub fn search(&self, query: QueryDescriptor) -> Result<()> {
		self.dispatch(SearchAction::Search(query))
	}

	/// Fetches `navigation` immediately, bypassing the debounce.
	pub fn fetch(&self, navigation: Navigation) -> Result<()> {
		self.dispatch(SearchAction::Fetch(navigation))
	}

	pub fn clear(&self, query: Option<String>, scope: Option<String>) -> Result<()> {
		self.dispatch(SearchAction::Clear(ClearPayload { query, scope }))
	}

	/// Follows one of the current page links. Ignored when the link does not land on an existing page.
	pub fn navigate(&self, link: PageLink) -> Result<()> {
		self.send(StreamCmd::Navigate(link))
	}

	/// Resolves `query` against this stream's entity.
	pub fn navigation_for(&self, query: QueryDescriptor) -> Navigation {
		let entity = self.kind.entity(query.scope());
		Navigation::resolve(self.urls.as_ref(), entity, query)
	}

	pub fn snapshot(&self) -> SearchState {
		self.shared.read().state.clone()
	}

	pub fn revision(&self) -> u64 {
		self.shared.read().revision
	}

	pub fn phase(&self) -> FetchPhase {
		self.shared.read().phase
	}

	pub fn subscribe(&self) -> broadcast::Receiver<StreamEvent> {
		self.events.subscribe()
	}

	/// Returns whether the state changed since the last call.
	pub fn take_changed(&self) -> bool {
		self.changed.swap(false, AtomicOrdering::AcqRel)
	}

	/// Stops the coordinator and waits for it to exit.
	pub async fn shutdown(self) {
		let _ = self.commands.send(StreamCmd::Shutdown);
		if let Err(err) = self.task.await {
			tracing::warn!(stream = self.kind.as_str(), error = %err, "search stream task failed");
		}
	}

	fn send(&self, cmd: StreamCmd) -> Result<()> {
		self.commands.send(cmd).map_err(|_| SearchError::StreamClosed(self.kind))
	}
}
