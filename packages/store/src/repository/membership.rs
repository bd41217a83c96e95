use crate::codec::{Record, decode, decode_all, encode};
use crate::collections::Collections;
use crate::document::{DocumentId, DocumentStore, Fields, Filter};
use crate::error::StoreError;
use campus_entity::{Community, MembershipAssociation};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a follow request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    Created(MembershipAssociation),
    /// The pair already had an association; it is returned unchanged
    AlreadyMember(MembershipAssociation),
}

impl FollowOutcome {
    pub fn association(&self) -> &MembershipAssociation {
        match self {
            FollowOutcome::Created(association) | FollowOutcome::AlreadyMember(association) => {
                association
            }
        }
    }
}

/// Result of an unfollow request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnfollowOutcome {
    Removed(MembershipAssociation),
    /// Nothing to remove
    NotMember,
}

/// Community membership and administration.
///
/// Enforces the `(user, community)` natural key with a pre-query before every
/// insert. Performs no policy checks: callers must stop the last admin from
/// leaving or being demoted before calling in.
pub struct MembershipRepository<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    collections: Arc<Collections>,
}

impl<S: DocumentStore + ?Sized> Clone for MembershipRepository<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), collections: Arc::clone(&self.collections) }
    }
}

impl<S: DocumentStore + ?Sized> MembershipRepository<S> {
    pub fn new(store: Arc<S>, collections: Arc<Collections>) -> Self {
        Self { store, collections }
    }

    fn members(&self) -> &str {
        self.collections.name(MembershipAssociation::COLLECTION)
    }

    fn communities(&self) -> &str {
        self.collections.name(Community::COLLECTION)
    }

    /// The association for the pair, if one exists.
    pub async fn find(
        &self,
        user_id: &str,
        community_id: &str,
    ) -> Result<Option<MembershipAssociation>, StoreError> {
        let filters = [Filter::equal("user", user_id), Filter::equal("community", community_id)];
        let documents = self.store.list(self.members(), &filters).await?;
        let associations: Vec<MembershipAssociation> = decode_all(self.members(), documents)?;
        Ok(associations
            .into_iter()
            .find(|association| association.matches(user_id, community_id)))
    }

    pub async fn is_member(&self, user_id: &str, community_id: &str) -> Result<bool, StoreError> {
        Ok(self.find(user_id, community_id).await?.is_some())
    }

    pub async fn follow(
        &self,
        user_id: &str,
        community_id: &str,
    ) -> Result<FollowOutcome, StoreError> {
        if let Some(existing) = self.find(user_id, community_id).await? {
            debug!("{} already follows {}; keeping {}", user_id, community_id, existing.id);
            return Ok(FollowOutcome::AlreadyMember(existing));
        }

        let association = MembershipAssociation::new(user_id, community_id);
        let document =
            self.store.create(self.members(), DocumentId::Unique, encode(&association)?).await?;
        let created: MembershipAssociation = decode(self.members(), document)?;

        info!("{} joined community {} ({})", user_id, community_id, created.id);
        Ok(FollowOutcome::Created(created))
    }

    pub async fn unfollow(
        &self,
        user_id: &str,
        community_id: &str,
    ) -> Result<UnfollowOutcome, StoreError> {
        let Some(existing) = self.find(user_id, community_id).await? else {
            debug!("{} does not follow {}; nothing to remove", user_id, community_id);
            return Ok(UnfollowOutcome::NotMember);
        };

        self.store.delete(self.members(), &existing.id).await?;
        info!("{} left community {} ({})", user_id, community_id, existing.id);
        Ok(UnfollowOutcome::Removed(existing))
    }

    /// Every association for the community, in store order.
    pub async fn associations(
        &self,
        community_id: &str,
    ) -> Result<Vec<MembershipAssociation>, StoreError> {
        let documents =
            self.store.list(self.members(), &[Filter::equal("community", community_id)]).await?;
        decode_all(self.members(), documents)
    }

    /// Every association in the collection, in store order.
    pub async fn all_associations(&self) -> Result<Vec<MembershipAssociation>, StoreError> {
        let documents = self.store.list(self.members(), &[]).await?;
        decode_all(self.members(), documents)
    }

    pub async fn member_ids(&self, community_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .associations(community_id)
            .await?
            .into_iter()
            .map(|association| association.user)
            .collect())
    }

    /// Add `user_id` to the admin set and write the full set back.
    ///
    /// Promoting an existing admin writes the unchanged set.
    pub async fn promote_admin(
        &self,
        community_id: &str,
        user_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        let community = self.community(community_id).await?;
        let mut admins = community.admins;
        if !admins.iter().any(|admin| admin == user_id) {
            admins.push(user_id.to_string());
        }

        let admins = self.write_admins(community_id, admins).await?;
        info!("{} is an admin of {}", user_id, community_id);
        Ok(admins)
    }

    /// Remove `user_id` from the admin set and write the full set back.
    pub async fn demote_admin(
        &self,
        community_id: &str,
        user_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        let community = self.community(community_id).await?;
        let admins: Vec<String> =
            community.admins.into_iter().filter(|admin| admin != user_id).collect();

        let admins = self.write_admins(community_id, admins).await?;
        info!("{} is no longer an admin of {}", user_id, community_id);
        Ok(admins)
    }

    async fn community(&self, community_id: &str) -> Result<Community, StoreError> {
        let document = self.store.get(self.communities(), community_id).await?;
        decode(self.communities(), document)
    }

    async fn write_admins(
        &self,
        community_id: &str,
        admins: Vec<String>,
    ) -> Result<Vec<String>, StoreError> {
        let mut fields = Fields::new();
        fields.insert("admins".to_string(), json!(admins));

        let document = self.store.update(self.communities(), community_id, fields).await?;
        match document.get("admins") {
            Some(Value::Array(values)) => {
                Ok(values.iter().filter_map(Value::as_str).map(str::to_string).collect())
            }
            _ => Ok(admins),
        }
    }
}
