//! The list controller: pagination cursor, accumulated rows, and search.
//!
//! A page load is split in two halves.  [`ListController::load_next_page`]
//! checks the guards, marks the controller as loading, and sends a
//! [`Request::Page`] to the worker.  When the response comes back the main
//! loop calls [`ListController::on_page_loaded`], which applies the result.
//! Both halves run on the UI thread with `&mut self`, so the guard check and
//! the `loading = true` write cannot interleave with anything else.
//!
//! Search replaces the visible rows with a filtered view of a snapshot taken
//! when the search session started.  Pages that land during a session are
//! appended to that snapshot, not to the filtered rows; they show up once
//! the query is cleared.

use std::sync::mpsc;

use crate::api::PageResult;
use crate::entry::{derive_page, PresentableEntry, DEFAULT_SPRITE_BASE};
use crate::repository::Resource;
use crate::worker::Request;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Entries requested per page, at least 1.
    pub page_size: u32,
    pub sprite_base: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sprite_base: DEFAULT_SPRITE_BASE.to_string(),
        }
    }
}

/// Everything the presentation layer may read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    items: Vec<PresentableEntry>,
    cursor: u32,
    loading: bool,
    end_reached: bool,
    searching: bool,
    error_message: String,
}

impl ListState {
    pub fn items(&self) -> &[PresentableEntry] {
        &self.items
    }

    /// Index of the next page to request, in page-size units.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn end_reached(&self) -> bool {
        self.end_reached
    }

    pub fn searching(&self) -> bool {
        self.searching
    }

    /// Empty when the last load succeeded.
    pub fn error_message(&self) -> &str {
        &self.error_message
    }
}

pub struct ListController {
    state: ListState,
    config: ControllerConfig,
    /// Rows as they were when the current search session began.
    cached_items: Vec<PresentableEntry>,
    /// True while the query is empty; the next non-empty query starts a session.
    is_search_starting: bool,
    requests: mpsc::Sender<Request>,
    subscribers: Vec<mpsc::Sender<ListState>>,
}

impl ListController {
    /// Create the controller and immediately request the first page.
    pub fn new(config: ControllerConfig, requests: mpsc::Sender<Request>) -> Self {
        let mut controller = Self {
            state: ListState::default(),
            config: ControllerConfig {
                page_size: config.page_size.max(1),
                ..config
            },
            cached_items: Vec::new(),
            is_search_starting: true,
            requests,
            subscribers: Vec::new(),
        };
        controller.load_next_page();
        controller
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Receive a snapshot of the state after every change.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ListState> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self) {
        let state = &self.state;
        self.subscribers.retain(|tx| tx.send(state.clone()).is_ok());
    }

    /// Request the next page.  Returns whether a fetch was issued.
    ///
    /// Does nothing while a load is in flight, once the end has been reached,
    /// or while a search is active.
    pub fn load_next_page(&mut self) -> bool {
        if self.state.loading || self.state.end_reached || self.state.searching {
            return false;
        }

        let limit = self.config.page_size;
        let offset = self.state.cursor * limit;
        if self.requests.send(Request::Page { limit, offset }).is_err() {
            tracing::warn!(offset, "worker is gone, page request dropped");
            self.state.error_message = crate::repository::UNKNOWN_ERROR.to_string();
            self.notify();
            return false;
        }

        tracing::debug!(limit, offset, "page requested");
        self.state.loading = true;
        self.notify();
        true
    }

    /// Retry after a failed load; same as [`Self::load_next_page`].
    pub fn retry(&mut self) -> bool {
        self.load_next_page()
    }

    /// Apply the outcome of the page requested at `offset`.
    pub fn on_page_loaded(&mut self, offset: u32, result: Resource<PageResult>) {
        let expected = self.state.cursor * self.config.page_size;
        if !self.state.loading || offset != expected {
            tracing::warn!(offset, expected, loading = self.state.loading, "ignoring stale page");
            return;
        }

        let derived = result.and_then(|page| {
            derive_page(&page.results, &self.config.sprite_base).map(|entries| (page.count, entries))
        });

        match derived {
            Ok((count, entries)) => {
                self.state.cursor += 1;
                self.state.end_reached =
                    u64::from(self.state.cursor) * u64::from(self.config.page_size) >= u64::from(count);
                self.state.error_message.clear();
                self.state.loading = false;

                tracing::info!(
                    offset,
                    added = entries.len(),
                    total = count,
                    end_reached = self.state.end_reached,
                    "page loaded"
                );

                if self.state.searching {
                    // Keep the filtered view intact; the rows join the baseline.
                    self.cached_items.extend(entries);
                } else {
                    self.state.items.extend(entries);
                }
            }
            Err(e) => {
                tracing::info!(offset, error = %e, "page failed");
                self.state.error_message = e.message().to_string();
                self.state.loading = false;
            }
        }
        self.notify();
    }

    /// Filter the rows by `query`; an empty query ends the search session.
    pub fn search(&mut self, query: &str) {
        if query.is_empty() {
            if !self.is_search_starting {
                self.state.items = std::mem::take(&mut self.cached_items);
                tracing::info!(restored = self.state.items.len(), "search cleared");
            }
            self.state.searching = false;
            self.is_search_starting = true;
            self.notify();
            return;
        }

        if self.is_search_starting {
            self.cached_items = self.state.items.clone();
            self.is_search_starting = false;
        }

        self.state.items = self
            .cached_items
            .iter()
            .filter(|entry| entry.matches(query))
            .cloned()
            .collect();
        self.state.searching = true;
        tracing::debug!(query, hits = self.state.items.len(), "search");
        self.notify();
    }

    /// True when row `index` is the last one and another page may be fetched.
    pub fn should_prefetch(&self, index: usize) -> bool {
        index + 1 >= self.state.items.len()
            && !self.state.loading
            && !self.state.end_reached
            && !self.state.searching
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
