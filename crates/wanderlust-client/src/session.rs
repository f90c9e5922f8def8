//! The page-view state of one browsing session.
//!
//! A [`DiscoverySession`] is created when a listing view loads with its first
//! page and is torn down with [`DiscoverySession::close`] on navigation. It
//! owns the paginator, the rendered grid, the active client-side filter, and
//! the user's favorites; nothing here is process-global.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use wanderlust_core::{ClientConfig, ListingId, ListingSummary, SearchCriteria};

use crate::debounce::Debouncer;
use crate::favorites::Favorites;
use crate::filter;
use crate::notify::{Notification, Notifier};
use crate::pagination::{FetchStatus, PageCursor, Paginator};
use crate::sink::{RenderSink, Visibility};
use crate::source::ListingSource;

pub const LOAD_MORE_FAILED: &str = "Error loading more listings";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Criteria the view was opened with; every page fetch uses them.
    pub base_criteria: SearchCriteria,
    pub page_size: u32,
    pub exit_animation: bool,
    /// Quiet window for free-text input.
    pub text_debounce: Duration,
}

impl SessionConfig {
    #[must_use]
    pub fn from_client_config(config: &ClientConfig, base_criteria: SearchCriteria) -> Self {
        Self {
            base_criteria,
            page_size: config.page_size,
            exit_animation: false,
            text_debounce: Duration::from_millis(config.filter_debounce_ms),
        }
    }
}

/// What a near-end signal led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearEndOutcome {
    /// A fetch was already running or the results are exhausted.
    Skipped,
    Appended { page: u32, added: usize },
    /// The server returned an empty page.
    Exhausted,
    Failed { page: u32 },
}

/// Point-in-time view of the session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub cursor: PageCursor,
    pub status: FetchStatus,
    pub loaded: usize,
    pub visible: usize,
    pub results_label: String,
}

struct ViewState {
    paginator: Paginator,
    sink: RenderSink,
    filter: SearchCriteria,
    favorites: Favorites,
}

impl ViewState {
    fn refilter(&mut self) {
        let matching = filter::apply(self.sink.listings(), &self.filter);
        self.sink.reconcile(&matching);
    }
}

/// Locks the view state. The lock is never held across an await, so a
/// poisoned lock only means a panic mid-update; the state is still usable.
fn lock(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Releases the paginator's in-flight claim if a fetch is abandoned, so
/// dropping [`DiscoverySession::on_near_end`] mid-request leaves the page
/// retryable.
struct InFlight<'a> {
    state: &'a Mutex<ViewState>,
    page: u32,
    armed: bool,
}

impl InFlight<'_> {
    fn complete(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!(page = self.page, "page fetch abandoned");
            lock(self.state).paginator.resolve_failure();
        }
    }
}

pub struct DiscoverySession<S, N> {
    source: S,
    notifier: N,
    base_criteria: SearchCriteria,
    page_size: u32,
    text_debounce: Duration,
    state: Mutex<ViewState>,
}

impl<S, N> DiscoverySession<S, N>
where
    S: ListingSource,
    N: Notifier,
{
    /// Starts a session over the server-rendered first page.
    pub fn new(
        source: S,
        notifier: N,
        config: SessionConfig,
        first_page: Vec<ListingSummary>,
        favorites: Favorites,
    ) -> Self {
        let mut state = ViewState {
            paginator: Paginator::new(),
            sink: RenderSink::new(config.exit_animation),
            filter: SearchCriteria::default(),
            favorites,
        };
        state.sink.append(first_page);
        state.refilter();

        Self {
            source,
            notifier,
            base_criteria: config.base_criteria,
            page_size: config.page_size.max(1),
            text_debounce: config.text_debounce,
            state: Mutex::new(state),
        }
    }

    /// Handles the viewport nearing the end of the grid.
    ///
    /// Fetches the next page unless one is already in flight or the results
    /// are exhausted. The state lock is released while the request runs; new
    /// items are appended and filtered under a single acquisition afterwards.
    /// Dropping the returned future before it completes counts as a failed
    /// fetch without a notification.
    pub async fn on_near_end(&self) -> NearEndOutcome {
        let Some(page) = lock(&self.state).paginator.request_next() else {
            return NearEndOutcome::Skipped;
        };
        let in_flight = InFlight {
            state: &self.state,
            page,
            armed: true,
        };

        let result = self
            .source
            .fetch_page(&self.base_criteria, page, self.page_size)
            .await;
        in_flight.complete();

        let mut state = lock(&self.state);
        match result {
            Ok(fetched) => {
                state
                    .paginator
                    .resolve_success(fetched.items.len(), fetched.has_more);
                if fetched.items.is_empty() {
                    return NearEndOutcome::Exhausted;
                }
                let added = state.sink.append(fetched.items);
                state.refilter();
                NearEndOutcome::Appended { page, added }
            }
            Err(e) => {
                state.paginator.resolve_failure();
                drop(state);
                tracing::warn!(error = %e, page, "failed to load more listings");
                self.notifier.notify(Notification::error(LOAD_MORE_FAILED));
                NearEndOutcome::Failed { page }
            }
        }
    }

    /// Applies a settled free-text filter. Returns the new visible count.
    pub fn set_text_filter(&self, text: &str) -> usize {
        self.update_filter(|filter| *filter = std::mem::take(filter).with_free_text(text))
    }

    /// Applies a price selector value (`"min-max"`, `"min+"`, or empty).
    pub fn set_price_filter(&self, raw: &str) -> usize {
        self.update_filter(|filter| *filter = std::mem::take(filter).with_price_range(raw))
    }

    pub fn set_country_filter(&self, country: &str) -> usize {
        self.update_filter(|filter| *filter = std::mem::take(filter).with_country(country))
    }

    fn update_filter(&self, update: impl FnOnce(&mut SearchCriteria)) -> usize {
        let mut state = lock(&self.state);
        update(&mut state.filter);
        state.refilter();
        let visible = state.sink.visible_count();
        tracing::debug!(visible, "client filter applied");
        visible
    }

    pub fn finish_exit(&self, id: ListingId) -> bool {
        lock(&self.state).sink.finish_exit(id)
    }

    pub fn finish_exits(&self) -> usize {
        lock(&self.state).sink.finish_exits()
    }

    #[must_use]
    pub fn visibility(&self, id: ListingId) -> Option<Visibility> {
        lock(&self.state).sink.visibility(id)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        lock(&self.state).sink.visible_count()
    }

    #[must_use]
    pub fn results_label(&self) -> String {
        lock(&self.state).sink.results_label()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        lock(&self.state).paginator.status() == FetchStatus::Fetching
    }

    /// Ids of every rendered listing in display order, hidden ones included.
    #[must_use]
    pub fn loaded_ids(&self) -> Vec<ListingId> {
        lock(&self.state)
            .sink
            .listings()
            .map(|listing| listing.id)
            .collect()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = lock(&self.state);
        SessionSnapshot {
            cursor: state.paginator.cursor(),
            status: state.paginator.status(),
            loaded: state.sink.len(),
            visible: state.sink.visible_count(),
            results_label: state.sink.results_label(),
        }
    }

    /// Flips a favorite and notifies. Returns whether it is now a favorite.
    pub fn toggle_favorite(&self, id: ListingId) -> bool {
        let (on, notification) = lock(&self.state).favorites.toggle(id);
        self.notifier.notify(notification);
        on
    }

    #[must_use]
    pub fn is_favorite(&self, id: ListingId) -> bool {
        lock(&self.state).favorites.contains(id)
    }

    /// Tears the session down, handing back the favorites for persistence.
    pub fn close(self) -> Favorites {
        self.state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .favorites
    }
}

impl<S, N> DiscoverySession<S, N>
where
    S: ListingSource + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    /// Routes raw text input through a debouncer so that only the latest
    /// value in each quiet window reaches [`Self::set_text_filter`].
    ///
    /// The forwarding task ends when the returned debouncer is dropped.
    #[must_use]
    pub fn attach_text_input(self: &Arc<Self>) -> Debouncer<String> {
        let (debouncer, mut settled) = Debouncer::<String>::spawn(self.text_debounce);
        let session = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(text) = settled.recv().await {
                session.set_text_filter(&text);
            }
        });
        debouncer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_config_takes_client_settings() {
        let client = ClientConfig {
            api_base_url: "http://localhost:3000".to_string(),
            page_size: 24,
            filter_debounce_ms: 150,
            request_timeout_secs: 5,
            user_agent: "wanderlust-test".to_string(),
        };
        let config = SessionConfig::from_client_config(&client, SearchCriteria::text("Paris"));
        assert_eq!(config.page_size, 24);
        assert_eq!(config.text_debounce, Duration::from_millis(150));
        assert_eq!(config.base_criteria, SearchCriteria::text("Paris"));
        assert!(!config.exit_animation);
    }
}
