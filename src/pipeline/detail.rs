// src/pipeline/detail.rs

//! Item detail pipeline.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Item, ItemKind};
use crate::services::{DetailView, ItemBackend};
use crate::utils::console;

/// Fetch and print one item report.
pub async fn run_show(backend: Arc<dyn ItemBackend>, kind: ItemKind, id: &str) -> Result<Item> {
    let mut view = DetailView::new(backend);

    if let Err(e) = view.load(kind, id).await {
        console::alert(&format!("Could not load {kind} item {id}: {e}"));
        return Err(e);
    }

    console::header(&format!("{kind} item {id}"));
    for (label, value) in view.rows() {
        console::sub_item(&format!("{label:<12} {value}"));
    }

    Ok(view.item().cloned().unwrap_or_default())
}
