//! The remote document store capability.
//!
//! A store holds named collections of JSON documents. Every call is a
//! suspension point; implementations must not retry or cache.

use crate::error::StoreError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

pub type Fields = Map<String, Value>;

/// A stored document: store-assigned ID plus its attribute map
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// True when every filter holds for this document.
    pub fn matches(&self, filters: &[Filter]) -> bool {
        filters.iter().all(|filter| filter.matches(self))
    }
}

/// ID to create a document under
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentId {
    /// Let the store pick a fresh unique ID
    Unique,
    Given(String),
}

impl DocumentId {
    pub fn given(id: impl Into<String>) -> Self {
        DocumentId::Given(id.into())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Unique => write!(f, "unique()"),
            DocumentId::Given(id) => write!(f, "{}", id),
        }
    }
}

/// Equality predicate on a named attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Equal { field: String, value: Value },
}

impl Filter {
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equal { field: field.into(), value: value.into() }
    }

    pub fn field(&self) -> &str {
        match self {
            Filter::Equal { field, .. } => field,
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::Equal { field, value } => document.get(field) == Some(value),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<Document, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    /// Merge `fields` into an existing document and return the result.
    async fn update(&self, collection: &str, id: &str, fields: Fields)
    -> Result<Document, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Documents matching all `filters`, in store order.
    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError>;
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn create(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        (**self).create(collection, id, fields).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        (**self).get(collection, id).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        (**self).update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        (**self).delete(collection, id).await
    }

    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError> {
        (**self).list(collection, filters).await
    }
}
