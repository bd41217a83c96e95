use crate::cache::{CachedCommunityList, QueryKey};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::policy::MembershipPolicy;
use crate::reconciler::{MutationReport, Reconciler};
use campus_entity::{
    Community, CommunityDraft, CommunityEvent, Department, EventDraft, OnboardingForm,
    OnboardingGate, UserProfile,
};
use campus_store::{
    Collection, Collections, CommunityRepository, DepartmentRepository, DocumentStore,
    EventRepository, FollowOutcome, RestStore, StoreError, UnfollowOutcome, UserRepository,
};
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, info};

/// Entry point for the view layer, scoped to one signed-in user.
///
/// Membership and admin changes go through the [`Reconciler`]. Policy checks
/// read the community from the store, not from the cache.
pub struct CommunityService<S: DocumentStore + ?Sized> {
    user_id: String,
    collections: Arc<Collections>,
    reconciler: Reconciler<S>,
    communities: CommunityRepository<S>,
    events: EventRepository<S>,
    users: UserRepository<S>,
    departments: DepartmentRepository<S>,
}

impl CommunityService<RestStore> {
    /// Connect to the REST backend described by `config`.
    pub fn from_config(config: &ClientConfig, user_id: impl Into<String>) -> Result<Self> {
        let store = RestStore::new(config.rest_config()?)?;
        info!("connected to {}", store.config().endpoint);
        Ok(Self::new(Arc::new(store), config.collections.clone(), user_id))
    }
}

impl<S: DocumentStore + ?Sized> CommunityService<S> {
    pub fn new(store: Arc<S>, collections: Collections, user_id: impl Into<String>) -> Self {
        let collections = Arc::new(collections);
        Self {
            user_id: user_id.into(),
            reconciler: Reconciler::new(Arc::clone(&store), Arc::clone(&collections)),
            communities: CommunityRepository::new(Arc::clone(&store), Arc::clone(&collections)),
            events: EventRepository::new(Arc::clone(&store), Arc::clone(&collections)),
            users: UserRepository::new(Arc::clone(&store), Arc::clone(&collections)),
            departments: DepartmentRepository::new(store, Arc::clone(&collections)),
            collections,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Fetch every community with its members and cache the result.
    pub async fn communities(&self) -> Result<CachedCommunityList> {
        Ok(self.reconciler.refresh(QueryKey::AllCommunities).await?)
    }

    /// Fetch one community with its members and cache the result.
    pub async fn community(&self, community_id: &str) -> Result<Community> {
        let key = QueryKey::Community(community_id.to_string());
        let list = self.reconciler.refresh(key).await?;
        list.into_inner().into_iter().next().ok_or_else(|| {
            let collection = self.collections.name(Collection::Communities);
            StoreError::not_found(collection, community_id).into()
        })
    }

    /// Cached community directory, as last reconciled.
    pub async fn snapshot(&self) -> CachedCommunityList {
        self.reconciler.current_snapshot(&QueryKey::AllCommunities).await
    }

    pub async fn follow(&self, community_id: &str) -> Result<MutationReport<FollowOutcome>> {
        Ok(self.reconciler.follow(&self.user_id, community_id).await?)
    }

    /// Leave a community. The sole admin may not leave.
    pub async fn unfollow(&self, community_id: &str) -> Result<MutationReport<UnfollowOutcome>> {
        let community = self.communities.get(community_id).await?;
        MembershipPolicy::check_leave(&community, &self.user_id)?;
        Ok(self.reconciler.unfollow(&self.user_id, community_id).await?)
    }

    pub async fn promote_admin(
        &self,
        community_id: &str,
        target: &str,
    ) -> Result<MutationReport<Vec<String>>> {
        let community = self.communities.get_with_members(community_id).await?;
        MembershipPolicy::check_promote(&community, &self.user_id, target)?;
        Ok(self.reconciler.promote_admin(community_id, target).await?)
    }

    pub async fn demote_admin(
        &self,
        community_id: &str,
        target: &str,
    ) -> Result<MutationReport<Vec<String>>> {
        let community = self.communities.get(community_id).await?;
        MembershipPolicy::check_demote(&community, &self.user_id, target)?;
        Ok(self.reconciler.demote_admin(community_id, target).await?)
    }

    /// Create a community administered by the signed-in user, who also joins it.
    pub async fn create_community(
        &self,
        draft: CommunityDraft,
    ) -> Result<MutationReport<Community>> {
        let community = draft.validate()?;
        Ok(self.reconciler.create_community(community, &self.user_id).await?)
    }

    /// Schedule an event. `now` bounds the allowed start and end.
    pub async fn create_event(
        &self,
        draft: EventDraft,
        now: NaiveDateTime,
    ) -> Result<CommunityEvent> {
        let event = draft.validate(now)?;
        let community = self.communities.get(event.community_id()).await?;
        MembershipPolicy::check_admin(&community, &self.user_id)?;
        Ok(self.events.create(event).await?)
    }

    /// Events for a community in start order.
    pub async fn events(&self, community_id: &str) -> Result<Vec<CommunityEvent>> {
        Ok(self.events.list_for_community(community_id).await?)
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        Ok(self.users.get(&self.user_id).await?)
    }

    /// Finish onboarding for the signed-in user unless the form names another.
    pub async fn complete_onboarding(&self, form: OnboardingForm) -> Result<UserProfile> {
        let form = OnboardingForm {
            user_id: form.user_id.or_else(|| Some(self.user_id.clone())),
            ..form
        };
        let onboarding = form.validate()?;
        Ok(self.users.complete_onboarding(&onboarding).await?)
    }

    pub async fn onboarding_gate(&self, on_onboarding_step: bool) -> Result<OnboardingGate> {
        let profile = self.profile().await?;
        let gate = OnboardingGate::evaluate(profile.onboarded, on_onboarding_step);
        debug!("onboarding gate for {}: {:?}", self.user_id, gate);
        Ok(gate)
    }

    /// Departments for the onboarding picker. Empty if the read fails.
    pub async fn departments(&self) -> Vec<Department> {
        self.departments.list_sorted().await
    }
}
