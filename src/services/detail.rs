// src/services/detail.rs

//! Single item detail view.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::models::{Item, ItemKind};
use crate::services::backend::ItemBackend;
use crate::utils::cancellable;

/// Loads and renders one item report.
pub struct DetailView {
    backend: Arc<dyn ItemBackend>,
    item: Option<Item>,
    cancel: CancellationToken,
}

impl DetailView {
    pub fn new(backend: Arc<dyn ItemBackend>) -> Self {
        Self {
            backend,
            item: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    /// Fetch the item `id` from the `kind` collection.
    ///
    /// The previously loaded item is kept if the fetch fails.
    pub async fn load(&mut self, kind: ItemKind, id: &str) -> Result<&Item> {
        let item = cancellable(&self.cancel, self.backend.fetch_item(kind, id)).await?;
        log::debug!("Loaded {kind} item {id}");
        let item: &Item = self.item.insert(item);
        Ok(item)
    }

    /// Label/value rows for the loaded item; empty fields are skipped.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let Some(item) = &self.item else {
            return Vec::new();
        };

        let created = item
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string());

        [
            ("Type", item.kind.map(|k| k.to_string())),
            ("Category", Some(item.category.clone())),
            ("Location", Some(item.possible_location.clone())),
            ("Date", Some(item.display_date().to_string())),
            ("Posted", created),
            ("Description", item.description.clone()),
            ("Contact", item.contact.clone()),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.filter(|v| !v.trim().is_empty()).map(|v| (label, v)))
        .collect()
    }
}

impl Drop for DetailView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
