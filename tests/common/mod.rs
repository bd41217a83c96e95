#![allow(dead_code)]

use async_trait::async_trait;
use campus::store::{
    Document, DocumentId, DocumentStore, Fields, Filter, MemoryStore, StoreError,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

/// Memory store with scriptable failures and a gate on writes.
#[derive(Default)]
pub struct TestStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
    fail_reads_of: Mutex<Option<String>>,
    hold_writes: AtomicBool,
    /// Signalled when a held write is waiting
    pub entered: Notify,
    /// Releases one held write
    pub release: Notify,
}

impl TestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fail `get` and `list` on `collection`.
    pub fn fail_reads_of(&self, collection: Option<&str>) {
        *self.fail_reads_of.lock().unwrap() = collection.map(str::to_string);
    }

    pub fn hold_writes(&self, hold: bool) {
        self.hold_writes.store(hold, Ordering::SeqCst);
    }

    async fn write(&self, collection: &str) -> Result<(), StoreError> {
        if self.hold_writes.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(format!("write to {} dropped", collection)));
        }
        Ok(())
    }

    fn read(&self, collection: &str) -> Result<(), StoreError> {
        match self.fail_reads_of.lock().unwrap().as_deref() {
            Some(failing) if failing == collection => {
                Err(StoreError::unavailable(format!("read of {} timed out", collection)))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for TestStore {
    async fn create(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        self.write(collection).await?;
        self.inner.create(collection, id, fields).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Document, StoreError> {
        self.read(collection)?;
        self.inner.get(collection, id).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<Document, StoreError> {
        self.write(collection).await?;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.write(collection).await?;
        self.inner.delete(collection, id).await
    }

    async fn list(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>, StoreError> {
        self.read(collection)?;
        self.inner.list(collection, filters).await
    }
}
