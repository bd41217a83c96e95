use crate::codec::{Record, decode, decode_all, encode};
use crate::collections::Collections;
use crate::document::{DocumentId, DocumentStore, Filter};
use crate::error::StoreError;
use campus_entity::{CommunityEvent, NewEvent};
use std::sync::Arc;
use tracing::info;

pub struct EventRepository<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    collections: Arc<Collections>,
}

impl<S: DocumentStore + ?Sized> Clone for EventRepository<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), collections: Arc::clone(&self.collections) }
    }
}

impl<S: DocumentStore + ?Sized> EventRepository<S> {
    pub fn new(store: Arc<S>, collections: Arc<Collections>) -> Self {
        Self { store, collections }
    }

    fn name(&self) -> &str {
        self.collections.name(CommunityEvent::COLLECTION)
    }

    pub async fn create(&self, event: NewEvent) -> Result<CommunityEvent, StoreError> {
        let record = event.into_event();
        let document = self.store.create(self.name(), DocumentId::Unique, encode(&record)?).await?;
        let created: CommunityEvent = decode(self.name(), document)?;
        info!("scheduled event {} in community {}", created.id, created.community_id);
        Ok(created)
    }

    /// Events of a community, earliest start first.
    pub async fn list_for_community(
        &self,
        community_id: &str,
    ) -> Result<Vec<CommunityEvent>, StoreError> {
        let documents =
            self.store.list(self.name(), &[Filter::equal("communityId", community_id)]).await?;
        let mut events: Vec<CommunityEvent> = decode_all(self.name(), documents)?;
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
        Ok(events)
    }
}
