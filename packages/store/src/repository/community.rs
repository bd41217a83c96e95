use crate::codec::{Record, decode, decode_all, encode};
use crate::collections::Collections;
use crate::document::{DocumentId, DocumentStore};
use crate::error::StoreError;
use crate::repository::membership::MembershipRepository;
use campus_entity::{Community, NewCommunity};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct CommunityRepository<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    collections: Arc<Collections>,
    memberships: MembershipRepository<S>,
}

impl<S: DocumentStore + ?Sized> Clone for CommunityRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collections: Arc::clone(&self.collections),
            memberships: self.memberships.clone(),
        }
    }
}

impl<S: DocumentStore + ?Sized> CommunityRepository<S> {
    pub fn new(store: Arc<S>, collections: Arc<Collections>) -> Self {
        let memberships = MembershipRepository::new(Arc::clone(&store), Arc::clone(&collections));
        Self { store, collections, memberships }
    }

    fn name(&self) -> &str {
        self.collections.name(Community::COLLECTION)
    }

    /// Create a community administered by `admin_id`, who also joins it.
    ///
    /// If the admin cannot join, the community document is deleted again and
    /// the join error is returned.
    pub async fn create(
        &self,
        community: NewCommunity,
        admin_id: &str,
    ) -> Result<Community, StoreError> {
        let record = community.into_community(admin_id);
        let document = self.store.create(self.name(), DocumentId::Unique, encode(&record)?).await?;
        let mut created: Community = decode(self.name(), document)?;
        info!("created community {} ({})", created.name, created.id);

        if let Err(e) = self.memberships.follow(admin_id, &created.id).await {
            warn!("{} could not join new community {}: {}", admin_id, created.id, e);
            if let Err(cleanup) = self.store.delete(self.name(), &created.id).await {
                warn!("failed to remove orphaned community {}: {}", created.id, cleanup);
            }
            return Err(e);
        }
        created.add_member(admin_id);
        Ok(created)
    }

    /// The community record without its member list.
    pub async fn get(&self, community_id: &str) -> Result<Community, StoreError> {
        let document = self.store.get(self.name(), community_id).await?;
        decode(self.name(), document)
    }

    pub async fn get_with_members(&self, community_id: &str) -> Result<Community, StoreError> {
        let mut community = self.get(community_id).await?;
        community.members = self.memberships.member_ids(community_id).await?;
        Ok(community)
    }

    pub async fn list(&self) -> Result<Vec<Community>, StoreError> {
        let documents = self.store.list(self.name(), &[]).await?;
        decode_all(self.name(), documents)
    }

    /// All communities with their member lists, from two collection reads.
    pub async fn list_with_members(&self) -> Result<Vec<Community>, StoreError> {
        let mut communities = self.list().await?;

        let mut members: HashMap<String, Vec<String>> = HashMap::new();
        for association in self.memberships.all_associations().await? {
            members.entry(association.community).or_default().push(association.user);
        }

        for community in &mut communities {
            community.members = members.remove(&community.id).unwrap_or_default();
        }
        Ok(communities)
    }
}
