// src/services/listings.rs

//! Landing-page listing and search.
//!
//! Drives the default (lost + found, newest first) listing and the
//! single-collection search through an explicit state machine:
//!
//! ```text
//! Idle ─mount─▶ LoadingDefault ─▶ ShowingDefault | Error
//! ShowingDefault ─search─▶ LoadingSearch ─▶ ShowingSearchResults | NoResults | Error
//! ```

use std::sync::Arc;

use futures::future::try_join;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::{Item, ItemKind, SearchQuery};
use crate::services::backend::ItemBackend;
use crate::utils::cancellable;

/// Observable state of a [`ListingView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingState {
    Idle,
    LoadingDefault,
    ShowingDefault,
    LoadingSearch,
    ShowingSearchResults,
    NoResults,
    Error(String),
}

/// Concatenate two collections and sort newest first.
///
/// The sort is stable; items without a creation time go last.
pub fn merge_by_recency(lost: Vec<Item>, found: Vec<Item>) -> Vec<Item> {
    let mut merged = lost;
    merged.extend(found);
    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged
}

/// Listing and search view over an [`ItemBackend`].
pub struct ListingView {
    backend: Arc<dyn ItemBackend>,
    recent: Vec<Item>,
    results: Vec<Item>,
    showing_search: bool,
    state: ListingState,
    cancel: CancellationToken,
}

impl ListingView {
    pub fn new(backend: Arc<dyn ItemBackend>) -> Self {
        Self {
            backend,
            recent: Vec::new(),
            results: Vec::new(),
            showing_search: false,
            state: ListingState::Idle,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// The default listing, newest first.
    pub fn recent(&self) -> &[Item] {
        &self.recent
    }

    /// Items currently on screen.
    pub fn displayed(&self) -> &[Item] {
        match self.state {
            ListingState::NoResults => &[],
            _ if self.showing_search => self.results.as_slice(),
            _ => self.recent.as_slice(),
        }
    }

    /// Token cancelled by [`teardown`](Self::teardown); clone it to tear
    /// the view down from another task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Abort in-flight requests; the view accepts no further work.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    /// Fetch both collections concurrently and show them merged.
    ///
    /// Both fetches must succeed; on failure the error is logged and the
    /// view enters [`ListingState::Error`] without a partial listing.
    pub async fn mount(&mut self) -> &ListingState {
        let previous = std::mem::replace(&mut self.state, ListingState::LoadingDefault);

        let fetch = try_join(
            self.backend.list(ItemKind::Lost),
            self.backend.list(ItemKind::Found),
        );

        match cancellable(&self.cancel, fetch).await {
            Ok((lost, found)) => {
                log::info!(
                    "Loaded {} lost and {} found items",
                    lost.len(),
                    found.len()
                );
                self.recent = merge_by_recency(lost, found);
                self.showing_search = false;
                self.state = ListingState::ShowingDefault;
            }
            Err(AppError::Cancelled) => {
                log::debug!("Default listing fetch cancelled");
                self.state = previous;
            }
            Err(e) => {
                log::error!("Error during fetching recent posts: {e}");
                self.state = ListingState::Error(e.to_string());
            }
        }
        &self.state
    }

    /// Search the collection selected by `query.kind`.
    ///
    /// An empty result clears the display and enters
    /// [`ListingState::NoResults`]; a failure leaves both lists untouched.
    pub async fn search(&mut self, query: &SearchQuery) -> &ListingState {
        let previous = std::mem::replace(&mut self.state, ListingState::LoadingSearch);

        match cancellable(&self.cancel, self.backend.search(query)).await {
            Ok(items) => {
                log::info!("Search in {} returned {} items", query.kind, items.len());
                self.showing_search = true;
                self.state = if items.is_empty() {
                    ListingState::NoResults
                } else {
                    ListingState::ShowingSearchResults
                };
                self.results = items;
            }
            Err(AppError::Cancelled) => {
                log::debug!("Search cancelled");
                self.state = previous;
            }
            Err(e) => {
                log::error!("Error during search: {e}");
                self.state = ListingState::Error(e.to_string());
            }
        }
        &self.state
    }

    /// Drop search results and return to the default listing.
    pub fn clear_search(&mut self) {
        self.results.clear();
        self.showing_search = false;
        self.state = if self.recent.is_empty() {
            ListingState::Idle
        } else {
            ListingState::ShowingDefault
        };
    }
}

impl Drop for ListingView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
