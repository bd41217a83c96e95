use crate::document::{Document, DocumentId, DocumentStore, Fields, Filter};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::trace;
use uuid::Uuid;

/// In-process document store.
///
/// Keeps documents per collection in insertion order. Used for local
/// development and as the backing store in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections.read().await.get(collection).map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        let id = match id {
            DocumentId::Unique => Uuid::new_v4().simple().to_string(),
            DocumentId::Given(id) => {
                if documents.iter().any(|document| document.id == id) {
                    return Err(StoreError::Rejected {
                        collection: collection.to_string(),
                        operation: "create",
                        reason: format!("document {} already exists", id),
                    });
                }
                id
            }
        };

        trace!("memory store: create {}/{}", collection, id);
        let document = Document::new(id, fields);
        documents.push(document.clone());
        Ok(document)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| document.id == id))
            .cloned()
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        trace!("memory store: update {}/{}", collection, id);
        document.fields.extend(fields);
        Ok(document.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let documents =
            collections.get_mut(collection).ok_or_else(|| StoreError::not_found(collection, id))?;
        let position = documents
            .iter()
            .position(|document| document.id == id)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        trace!("memory store: delete {}/{}", collection, id);
        documents.remove(position);
        Ok(())
    }

    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents.iter().filter(|document| document.matches(filters)).cloned().collect()
            })
            .unwrap_or_default())
    }
}
