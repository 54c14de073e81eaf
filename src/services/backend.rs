// src/services/backend.rs

//! REST backend client.
//!
//! Reads item collections and persists user profiles.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{DataEnvelope, Item, ItemKind, SaveInfoResponse, SearchQuery, UserProfile};
use crate::utils::http::{excerpt, read_json};
use crate::utils::url::{join_endpoint, parse_base, push_segment};

/// Read access to item reports.
#[async_trait]
pub trait ItemBackend: Send + Sync {
    /// Fetch a full collection.
    async fn list(&self, kind: ItemKind) -> Result<Vec<Item>>;

    /// Fetch the collection selected by `query.kind`, filtered by the query.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Item>>;

    /// Fetch a single item report.
    async fn fetch_item(&self, kind: ItemKind, id: &str) -> Result<Item>;
}

/// Write access to user profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Persist a freshly registered user's profile.
    async fn save_user_info(&self, profile: &UserProfile) -> Result<SaveInfoResponse>;
}

/// HTTP implementation of [`ItemBackend`] and [`ProfileStore`].
#[derive(Debug, Clone)]
pub struct BackendClient {
    base: Url,
    client: Client,
}

impl BackendClient {
    /// Create a backend client rooted at `base_url`.
    pub fn new(base_url: &str, client: Client) -> Result<Self> {
        Ok(Self {
            base: parse_base(base_url)?,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn get_items(&self, url: Url, kind: ItemKind) -> Result<Vec<Item>> {
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let envelope: DataEnvelope<Vec<Item>> = read_json(response).await?;
        Ok(envelope
            .data
            .into_iter()
            .map(|item| item.tagged(kind))
            .collect())
    }
}

#[async_trait]
impl ItemBackend for BackendClient {
    async fn list(&self, kind: ItemKind) -> Result<Vec<Item>> {
        let url = join_endpoint(&self.base, &kind.collection_path())?;
        self.get_items(url, kind).await
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Item>> {
        let mut url = join_endpoint(&self.base, &query.kind.search_path())?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        self.get_items(url, query.kind).await
    }

    async fn fetch_item(&self, kind: ItemKind, id: &str) -> Result<Item> {
        if id.trim().is_empty() {
            return Err(AppError::validation("item id is empty"));
        }
        let url = push_segment(join_endpoint(&self.base, &kind.collection_path())?, id)?;
        log::debug!("GET {url}");

        let response = self.client.get(url).send().await?;
        let envelope: DataEnvelope<Item> = read_json(response).await?;
        Ok(envelope.data.tagged(kind))
    }
}

#[async_trait]
impl ProfileStore for BackendClient {
    /// The backend reports rejections in the body, so a parseable body is
    /// returned whatever the status code.
    async fn save_user_info(&self, profile: &UserProfile) -> Result<SaveInfoResponse> {
        let url = join_endpoint(&self.base, "user/saveInfo")?;
        log::debug!("POST {url} for uid {}", profile.firebase_uid);

        let response = self.client.post(url).json(profile).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<SaveInfoResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(AppError::backend(status.as_u16(), excerpt(&body))),
            Err(e) => Err(e.into()),
        }
    }
}
