//! Debounced search-as-you-type over a [`LocationLookup`].
//!
//! Keystrokes go in through [`SearchController::set_query`]. After a quiet
//! period a background task issues the lookup and sends the outcome back over
//! a channel, tagged with the generation of the query that produced it. The
//! owner applies those messages with [`SearchController::poll`] (or awaits
//! them with [`SearchController::next_update`]); anything tagged with an older
//! generation is dropped, so a slow lookup can never overwrite newer results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use skycast_core::SearchConfig;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::location::Location;
use crate::lookup::{ErrorReporter, LocationLookup, TracingReporter};
use crate::types::LookupError;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

/// Search tuning
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Quiet period before a lookup is issued
    pub debounce: Duration,
    /// Queries with fewer characters never trigger a lookup
    pub min_query_len: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: Duration::from_millis(config.debounce_ms),
            min_query_len: config.min_query_len,
        }
    }
}

/// Published view of the search box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Raw input, recorded verbatim
    pub query: String,
    /// Locations in the order the lookup returned them
    pub results: Vec<Location>,
    /// True only while the lookup for the current query is outstanding
    pub is_loading: bool,
}

/// Where the controller is in its debounce/lookup cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Query too short, or nothing scheduled
    #[default]
    Idle,
    /// Debounce timer running
    Pending,
    /// Lookup in flight
    Loading,
    /// Latest lookup resolved; results (possibly empty) are current
    Ready,
}

impl SearchPhase {
    /// True while a result for the current query is still expected.
    pub fn is_busy(self) -> bool {
        matches!(self, SearchPhase::Pending | SearchPhase::Loading)
    }
}

/// Messages sent from the debounce/lookup task back to the owner.
#[derive(Debug)]
enum SearchMessage {
    /// Debounce elapsed and the lookup is about to be issued
    LookupStarted { generation: u64 },
    /// Lookup resolved
    LookupDone {
        generation: u64,
        query: String,
        result: Result<Vec<Location>, LookupError>,
    },
}

impl SearchMessage {
    fn generation(&self) -> u64 {
        match self {
            SearchMessage::LookupStarted { generation }
            | SearchMessage::LookupDone { generation, .. } => *generation,
        }
    }
}

/// Owns the search query and its results.
///
/// All state mutation happens on the owning thread inside `set_query`,
/// `cancel`, `poll` and `next_update`; background tasks only send messages.
pub struct SearchController<L: LocationLookup> {
    lookup: Arc<L>,
    reporter: Arc<dyn ErrorReporter>,
    options: SearchOptions,
    runtime: Handle,
    state: SearchState,
    phase: SearchPhase,
    /// Staleness tag of the most recent `set_query`/`cancel`
    generation: u64,
    /// Mirror of `generation` readable from the debounce task
    latest: Arc<AtomicU64>,
    timer: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<SearchMessage>,
    rx: mpsc::UnboundedReceiver<SearchMessage>,
    state_tx: watch::Sender<SearchState>,
}

impl<L: LocationLookup> SearchController<L> {
    /// Create a controller that spawns its debounce/lookup tasks on `runtime`.
    ///
    /// Failures are reported through [`TracingReporter`] unless replaced with
    /// [`SearchController::with_reporter`].
    pub fn new(lookup: Arc<L>, options: SearchOptions, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, _) = watch::channel(SearchState::default());

        Self {
            lookup,
            reporter: Arc::new(TracingReporter),
            options,
            runtime,
            state: SearchState::default(),
            phase: SearchPhase::Idle,
            generation: 0,
            latest: Arc::new(AtomicU64::new(0)),
            timer: None,
            tx,
            rx,
            state_tx,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn results(&self) -> &[Location] {
        &self.state.results
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Receiver of state snapshots, updated whenever published state changes.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state_tx.subscribe()
    }

    /// Record new input and reschedule the lookup.
    ///
    /// Short queries clear the results immediately and schedule nothing.
    /// Anything scheduled or in flight for an earlier query becomes stale.
    pub fn set_query(&mut self, text: &str) {
        self.state.query = text.to_string();
        self.invalidate();
        self.state.is_loading = false;

        if text.chars().count() < self.options.min_query_len {
            self.state.results.clear();
            self.phase = SearchPhase::Idle;
            self.publish();
            return;
        }

        self.phase = SearchPhase::Pending;
        self.schedule(text.to_string());
        self.publish();
    }

    /// Stop the pending timer and orphan any in-flight lookup.
    ///
    /// Results already published are kept.
    pub fn cancel(&mut self) {
        self.invalidate();
        if self.phase.is_busy() {
            tracing::debug!(query = %self.state.query, "Search cancelled");
            self.phase = SearchPhase::Idle;
        }
        if self.state.is_loading {
            self.state.is_loading = false;
            self.publish();
        }
    }

    /// Apply every completion that has arrived, without blocking.
    ///
    /// Returns true if published state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            changed |= self.apply(msg);
        }
        changed
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns true if published state changed; stale completions return false.
    pub async fn next_update(&mut self) -> bool {
        match self.rx.recv().await {
            Some(msg) => self.apply(msg),
            None => false,
        }
    }

    /// Apply completions until the current query has settled.
    ///
    /// Returns immediately when nothing is scheduled or in flight.
    pub async fn settle(&mut self) {
        while self.phase.is_busy() {
            let Some(msg) = self.rx.recv().await else {
                break;
            };
            self.apply(msg);
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.latest.store(self.generation, Ordering::Release);
        if let Some(token) = self.timer.take() {
            token.cancel();
        }
    }

    fn schedule(&mut self, query: String) {
        let token = CancellationToken::new();
        self.timer = Some(token.clone());

        let generation = self.generation;
        let latest = Arc::clone(&self.latest);
        let lookup = Arc::clone(&self.lookup);
        let tx = self.tx.clone();
        let delay = self.options.debounce;

        self.runtime.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            // The timer may have elapsed just as a newer query arrived
            if latest.load(Ordering::Acquire) != generation {
                return;
            }
            if tx.send(SearchMessage::LookupStarted { generation }).is_err() {
                return;
            }

            tracing::debug!(query = %query, generation, "Searching locations");
            // Run the lookup in its own task so a panic still ends in LookupDone
            let lookup_query = query.clone();
            let task = tokio::spawn(async move { lookup.search(&lookup_query).await });
            let result = match task.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(query = %query, "Location lookup task failed: {}", e);
                    Err(LookupError::Other(format!("lookup task failed: {}", e)))
                }
            };
            let _ = tx.send(SearchMessage::LookupDone {
                generation,
                query,
                result,
            });
        });
    }

    fn apply(&mut self, msg: SearchMessage) -> bool {
        let generation = msg.generation();
        if generation != self.generation {
            tracing::trace!(
                generation,
                current = self.generation,
                "Discarding stale search message"
            );
            return false;
        }

        match msg {
            SearchMessage::LookupStarted { .. } => {
                self.phase = SearchPhase::Loading;
                self.state.is_loading = true;
            }
            SearchMessage::LookupDone {
                query,
                result: Ok(results),
                ..
            } => {
                tracing::debug!(query = %query, count = results.len(), "Search results ready");
                self.phase = SearchPhase::Ready;
                self.state.results = results;
                self.state.is_loading = false;
            }
            SearchMessage::LookupDone {
                query,
                result: Err(e),
                ..
            } => {
                tracing::debug!(query = %query, "Location search failed");
                self.phase = SearchPhase::Ready;
                self.state.results.clear();
                self.state.is_loading = false;
                self.reporter.report(&e);
            }
        }

        self.publish();
        true
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

impl<L: LocationLookup> Drop for SearchController<L> {
    fn drop(&mut self) {
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyLookup;

    impl LocationLookup for EmptyLookup {
        async fn search(&self, _query: &str) -> Result<Vec<Location>, LookupError> {
            Ok(Vec::new())
        }
    }

    fn controller() -> SearchController<EmptyLookup> {
        SearchController::new(
            Arc::new(EmptyLookup),
            SearchOptions::default(),
            Handle::current(),
        )
    }

    #[test]
    fn test_options_from_config() {
        let config = SearchConfig {
            debounce_ms: 120,
            min_query_len: 3,
        };
        let options = SearchOptions::from(&config);
        assert_eq!(options.debounce, Duration::from_millis(120));
        assert_eq!(options.min_query_len, 3);
    }

    #[test]
    fn test_phase_is_busy() {
        assert!(!SearchPhase::Idle.is_busy());
        assert!(SearchPhase::Pending.is_busy());
        assert!(SearchPhase::Loading.is_busy());
        assert!(!SearchPhase::Ready.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_recorded_verbatim() {
        let mut search = controller();
        search.set_query("  New York ");
        assert_eq!(search.query(), "  New York ");
        assert_eq!(search.phase(), SearchPhase::Pending);
        assert!(!search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_is_idle() {
        let mut search = controller();
        search.set_query("X");
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(search.results().is_empty());
        assert!(!search.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_length_counts_characters_not_bytes() {
        let mut search = controller();
        // One character, two bytes
        search.set_query("é");
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_call_bumps_generation() {
        let mut search = controller();
        search.set_query("Lo");
        let first = search.generation;
        search.set_query("L");
        search.cancel();
        assert_eq!(search.generation, first + 2);
        assert_eq!(search.latest.load(Ordering::Acquire), search.generation);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_message_is_ignored() {
        let mut search = controller();
        search.set_query("Lo");
        let stale = search.generation;
        search.set_query("Lon");

        let changed = search.apply(SearchMessage::LookupDone {
            generation: stale,
            query: "Lo".into(),
            result: Ok(vec![Location::new("London", "UK", "England", 51.5, -0.1).unwrap()]),
        });

        assert!(!changed);
        assert!(search.results().is_empty());
        assert_eq!(search.phase(), SearchPhase::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_returns_immediately_when_idle() {
        let mut search = controller();
        search.settle().await;
        assert_eq!(search.phase(), SearchPhase::Idle);
    }
}
