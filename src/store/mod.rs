use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::store::model::StoreErrorBody;

pub mod model;

const REST_PREFIX: &str = "rest/v1/";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to reach store: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store error {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("invalid store response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid store request: {0}")]
    Request(String),
}

/// A read against one collection, shaped after the PostgREST query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub collection: String,
    pub columns: String,
    pub limit: Option<usize>,
    pub order: Option<OrderBy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl SelectQuery {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            columns: "*".into(),
            limit: None,
            order: None,
        }
    }

    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, descending: bool) -> Self {
        self.order = Some(OrderBy {
            field: field.into(),
            descending,
        });
        self
    }

    /// Query-string pairs in PostgREST syntax.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", self.columns.clone())];
        if let Some(order) = &self.order {
            let dir = if order.descending { "desc" } else { "asc" };
            params.push(("order", format!("{}.{}", order.field, dir)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError>;
}

#[derive(Clone)]
pub struct StoreClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StoreClient {
    pub fn new(base_url: Url, api_key: String) -> Result<Self> {
        let http = Client::builder()
            .user_agent("askform/0.1")
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
            api_key,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        let base_url = Url::parse(&cfg.store.url).context("invalid store URL")?;
        Self::new(base_url, cfg.store.api_key.clone())
    }

    pub fn build_request(&self, query: &SelectQuery) -> Result<reqwest::Request, StoreError> {
        let endpoint = self
            .base_url
            .join(REST_PREFIX)
            .and_then(|url| url.join(&query.collection))
            .map_err(|err| StoreError::Request(err.to_string()))?;
        let request = self
            .http
            .get(endpoint)
            .query(&query.params())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl RemoteStore for StoreClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, StoreError> {
        let request = self.build_request(query)?;
        debug!(url = %request.url(), "sending store request");
        let res = self.http.execute(request).await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = StoreErrorBody::describe(&body);
            warn!(%status, %message, "store returned an error");
            return Err(StoreError::Status { status, message });
        }

        let body = res.text().await?;
        let rows: Vec<Value> = serde_json::from_str(&body)?;
        debug!(rows = rows.len(), collection = %query.collection, "store response");
        Ok(rows)
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
