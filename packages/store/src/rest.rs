//! Document store backed by a hosted BaaS REST API.
//!
//! Speaks the Appwrite-compatible databases surface:
//! `{endpoint}/databases/{database}/collections/{collection}/documents[/{id}]`.
//! System attributes (`$id`, `$createdAt`, ...) are stripped on ingress so
//! documents carry only application fields.

use crate::document::{Document, DocumentId, DocumentStore, Fields, Filter};
use crate::error::StoreError;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";

/// Connection settings for [`RestStore`]
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// API root, e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: Url,
    pub project_id: String,
    pub database_id: String,
    /// Server API key; requests are anonymous without one
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl RestConfig {
    pub fn new(endpoint: Url, project_id: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            endpoint,
            project_id: project_id.into(),
            database_id: database_id.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestStore {
    http: Client,
    config: RestConfig,
}

#[derive(Deserialize)]
struct DocumentList {
    documents: Vec<Value>,
}

impl RestStore {
    pub fn new(config: RestConfig) -> Result<Self, StoreError> {
        if config.endpoint.cannot_be_a_base() {
            return Err(StoreError::Configuration {
                reason: format!("endpoint {} cannot be used as a base URL", config.endpoint),
            });
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("campus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Configuration { reason: e.to_string() })?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }

    fn documents_url(&self, collection: &str, id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.config.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| StoreError::Configuration {
                reason: format!("endpoint {} cannot be used as a base URL", self.config.endpoint),
            })?;
            segments.pop_if_empty().extend([
                "databases",
                self.config.database_id.as_str(),
                "collections",
                collection,
                "documents",
            ]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.http.request(method, url).header(PROJECT_HEADER, &self.config.project_id);
        match &self.config.api_key {
            Some(key) => request.header(KEY_HEADER, key),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        collection: &str,
        operation: &'static str,
        id: Option<&str>,
    ) -> Result<Response, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = classify(status, &body, collection, operation, id);
        warn!("{} on {} failed with {}: {}", operation, collection, status, error);
        Err(error)
    }
}

/// Map a non-success HTTP status onto the store error taxonomy.
pub(crate) fn classify(
    status: StatusCode,
    body: &str,
    collection: &str,
    operation: &'static str,
    id: Option<&str>,
) -> StoreError {
    let reason = error_message(body).unwrap_or_else(|| status.to_string());
    match status {
        StatusCode::NOT_FOUND => StoreError::not_found(collection, id.unwrap_or("")),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            StoreError::PermissionDenied { collection: collection.to_string(), reason }
        }
        status if status.is_client_error() => {
            StoreError::Rejected { collection: collection.to_string(), operation, reason }
        }
        _ => StoreError::Unavailable { reason },
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message").and_then(Value::as_str).map(str::to_string)
}

/// Encode a filter as an Appwrite JSON query.
pub(crate) fn query_param(filter: &Filter) -> String {
    match filter {
        Filter::Equal { field, value } => {
            json!({ "method": "equal", "attribute": field, "values": [value] }).to_string()
        }
    }
}

/// Split a wire document into its ID and application fields.
pub(crate) fn from_wire(value: Value) -> Result<Document, StoreError> {
    let Value::Object(mut fields) = value else {
        return Err(StoreError::Protocol { reason: "document is not a JSON object".to_string() });
    };

    let id = match fields.remove("$id") {
        Some(Value::String(id)) => id,
        _ => return Err(StoreError::Protocol { reason: "document has no $id".to_string() }),
    };
    fields.retain(|key, _| !key.starts_with('$'));

    Ok(Document::new(id, fields))
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn create(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let url = self.documents_url(collection, None)?;
        let body = json!({ "documentId": id.to_string(), "data": fields });
        debug!("POST {} ({})", url, id);

        let response =
            self.send(self.request(Method::POST, url).json(&body), collection, "create", None).await?;
        from_wire(response.json().await?)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let url = self.documents_url(collection, Some(id))?;
        debug!("GET {}", url);

        let response = self.send(self.request(Method::GET, url), collection, "get", Some(id)).await?;
        from_wire(response.json().await?)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let url = self.documents_url(collection, Some(id))?;
        let body = json!({ "data": fields });
        debug!("PATCH {}", url);

        let response = self
            .send(self.request(Method::PATCH, url).json(&body), collection, "update", Some(id))
            .await?;
        from_wire(response.json().await?)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let url = self.documents_url(collection, Some(id))?;
        debug!("DELETE {}", url);

        self.send(self.request(Method::DELETE, url), collection, "delete", Some(id)).await?;
        Ok(())
    }

    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError> {
        let url = self.documents_url(collection, None)?;
        let queries: Vec<(&str, String)> =
            filters.iter().map(|filter| ("queries[]", query_param(filter))).collect();
        debug!("GET {} with {} filter(s)", url, queries.len());

        let response = self
            .send(self.request(Method::GET, url).query(&queries), collection, "list", None)
            .await?;
        let list: DocumentList = response.json().await?;
        list.documents.into_iter().map(from_wire).collect()
    }
}
