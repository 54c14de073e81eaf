// src/pipeline/listings.rs

//! Listing and search pipelines.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, Item, SearchQuery};
use crate::services::{ItemBackend, ListingState, ListingView};
use crate::utils::console;

/// Show the merged default listing, newest first.
///
/// `limit` caps how many items are printed; all are returned.
pub async fn run_recent(
    config: &Config,
    backend: Arc<dyn ItemBackend>,
    limit: Option<usize>,
) -> Result<Vec<Item>> {
    console::header("Recent lost & found reports");

    let mut view = ListingView::new(backend);
    if let ListingState::Error(message) = view.mount().await {
        console::alert(&format!("Could not load recent posts: {message}"));
        return Err(AppError::Listing(message.clone()));
    }

    let items = view.displayed();
    print_items(config, items, limit);
    console::summary(
        "Recent posts",
        &[
            ("total", items.len().to_string()),
            ("lost", count_kind(items, "lost").to_string()),
            ("found", count_kind(items, "found").to_string()),
        ],
    );
    Ok(items.to_vec())
}

/// Search the collection selected by `query.kind`.
pub async fn run_search(
    config: &Config,
    backend: Arc<dyn ItemBackend>,
    query: &SearchQuery,
) -> Result<Vec<Item>> {
    console::header(&format!("Search in {} items", query.kind));

    let mut view = ListingView::new(backend);
    match view.search(query).await {
        ListingState::Error(message) => {
            console::alert(&format!("Search failed: {message}"));
            return Err(AppError::Listing(message.clone()));
        }
        ListingState::NoResults => {
            console::line("No results found.");
            return Ok(Vec::new());
        }
        _ => {}
    }

    let items = view.displayed();
    print_items(config, items, None);
    console::success(&format!("{} matching items", items.len()));
    Ok(items.to_vec())
}

fn print_items(config: &Config, items: &[Item], limit: Option<usize>) {
    let shown = limit.unwrap_or(items.len()).min(items.len());
    for item in &items[..shown] {
        console::line(&item.format(&config.display.item_template));
    }
    if shown < items.len() {
        console::sub_item(&format!("... and {} more", items.len() - shown));
    }
}

fn count_kind(items: &[Item], kind: &str) -> usize {
    items
        .iter()
        .filter(|i| i.kind.is_some_and(|k| k.as_str() == kind))
        .count()
}
