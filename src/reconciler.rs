//! Optimistic cache reconciliation.
//!
//! Every mutation runs the same machine:
//!
//! ```text
//! Idle -> Pending -> Committed   (remote success: refetch every cached query)
//!                 -> RolledBack  (remote failure: restore the snapshot)
//! ```
//!
//! Entering `Pending` copies the whole cache and applies the speculative
//! change under one write lock, before the remote call is awaited. Mutations
//! are not serialised against each other; whichever settles last decides the
//! cache contents.

use crate::cache::{CachedCommunityList, QueryKey};
use campus_entity::{Community, NewCommunity};
use campus_store::{
    Collections, CommunityRepository, DocumentStore, FollowOutcome, MembershipRepository,
    StoreError, UnfollowOutcome,
};
use futures::future::join_all;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

type CacheMap = HashMap<QueryKey, CachedCommunityList>;

/// Lifecycle of one mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    Idle,
    Pending,
    Committed,
    RolledBack,
}

impl fmt::Display for MutationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationState::Idle => "idle",
            MutationState::Pending => "pending",
            MutationState::Committed => "committed",
            MutationState::RolledBack => "rolled back",
        };
        f.write_str(name)
    }
}

/// A change requested by the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Follow { user: String, community: String },
    Unfollow { user: String, community: String },
    PromoteAdmin { community: String, user: String },
    DemoteAdmin { community: String, user: String },
    CreateCommunity { name: String, admin: String },
}

impl Mutation {
    /// Apply the expected outcome to a cached list. Only membership changes
    /// are speculative; the rest wait for the refetch.
    fn speculate(&self, list: &mut CachedCommunityList) {
        match self {
            Mutation::Follow { user, community } => {
                list.add_member(community, user);
            }
            Mutation::Unfollow { user, community } => {
                list.remove_member(community, user);
            }
            Mutation::PromoteAdmin { .. }
            | Mutation::DemoteAdmin { .. }
            | Mutation::CreateCommunity { .. } => {}
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Follow { user, community } => write!(f, "follow({}, {})", user, community),
            Mutation::Unfollow { user, community } => {
                write!(f, "unfollow({}, {})", user, community)
            }
            Mutation::PromoteAdmin { community, user } => {
                write!(f, "promote_admin({}, {})", community, user)
            }
            Mutation::DemoteAdmin { community, user } => {
                write!(f, "demote_admin({}, {})", community, user)
            }
            Mutation::CreateCommunity { name, admin } => {
                write!(f, "create_community({:?}, {})", name, admin)
            }
        }
    }
}

/// A mutation that settled successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport<T> {
    pub state: MutationState,
    /// What the remote call returned
    pub outcome: T,
    /// Whether every cached query was refetched afterwards
    pub refreshed: bool,
}

struct Transition {
    mutation: Mutation,
    state: MutationState,
    snapshot: CacheMap,
}

impl Transition {
    fn advance(&mut self, next: MutationState) {
        debug!("{}: {} -> {}", self.mutation, self.state, next);
        self.state = next;
    }
}

/// Owner of the community cache.
///
/// Nothing else writes to the cached lists; readers get clones through
/// [`current_snapshot`](Self::current_snapshot).
pub struct Reconciler<S: DocumentStore + ?Sized> {
    communities: CommunityRepository<S>,
    memberships: MembershipRepository<S>,
    cache: RwLock<CacheMap>,
    in_flight: AtomicUsize,
}

impl<S: DocumentStore + ?Sized> Reconciler<S> {
    pub fn new(store: Arc<S>, collections: Arc<Collections>) -> Self {
        Self {
            communities: CommunityRepository::new(Arc::clone(&store), Arc::clone(&collections)),
            memberships: MembershipRepository::new(store, collections),
            cache: RwLock::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Mutations currently `Pending`.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// A copy of the cached list for `key`; empty if it was never fetched.
    pub async fn current_snapshot(&self, key: &QueryKey) -> CachedCommunityList {
        self.cache.read().await.get(key).cloned().unwrap_or_default()
    }

    pub async fn is_cached(&self, key: &QueryKey) -> bool {
        self.cache.read().await.contains_key(key)
    }

    /// Fetch authoritative state for `key` and replace its cache entry.
    pub async fn refresh(&self, key: QueryKey) -> Result<CachedCommunityList, StoreError> {
        let list = self.fetch(&key).await?;
        debug!("refreshed {} ({} communities)", key, list.len());
        self.cache.write().await.insert(key, list.clone());
        Ok(list)
    }

    async fn fetch(&self, key: &QueryKey) -> Result<CachedCommunityList, StoreError> {
        match key {
            QueryKey::AllCommunities => {
                Ok(CachedCommunityList::new(self.communities.list_with_members().await?))
            }
            QueryKey::Community(id) => match self.communities.get_with_members(id).await {
                Ok(community) => Ok(CachedCommunityList::new(vec![community])),
                Err(e) if e.is_not_found() => Ok(CachedCommunityList::default()),
                Err(e) => Err(e),
            },
        }
    }

    pub async fn follow(
        &self,
        user_id: &str,
        community_id: &str,
    ) -> Result<MutationReport<FollowOutcome>, StoreError> {
        let mutation =
            Mutation::Follow { user: user_id.to_string(), community: community_id.to_string() };
        self.run(mutation, self.memberships.follow(user_id, community_id)).await
    }

    pub async fn unfollow(
        &self,
        user_id: &str,
        community_id: &str,
    ) -> Result<MutationReport<UnfollowOutcome>, StoreError> {
        let mutation =
            Mutation::Unfollow { user: user_id.to_string(), community: community_id.to_string() };
        self.run(mutation, self.memberships.unfollow(user_id, community_id)).await
    }

    pub async fn promote_admin(
        &self,
        community_id: &str,
        user_id: &str,
    ) -> Result<MutationReport<Vec<String>>, StoreError> {
        let mutation = Mutation::PromoteAdmin {
            community: community_id.to_string(),
            user: user_id.to_string(),
        };
        self.run(mutation, self.memberships.promote_admin(community_id, user_id)).await
    }

    pub async fn demote_admin(
        &self,
        community_id: &str,
        user_id: &str,
    ) -> Result<MutationReport<Vec<String>>, StoreError> {
        let mutation =
            Mutation::DemoteAdmin { community: community_id.to_string(), user: user_id.to_string() };
        self.run(mutation, self.memberships.demote_admin(community_id, user_id)).await
    }

    pub async fn create_community(
        &self,
        community: NewCommunity,
        admin_id: &str,
    ) -> Result<MutationReport<Community>, StoreError> {
        let mutation = Mutation::CreateCommunity {
            name: community.name().to_string(),
            admin: admin_id.to_string(),
        };
        self.run(mutation, self.communities.create(community, admin_id)).await
    }

    /// Drive one mutation through the state machine. `call` is not polled
    /// until the snapshot is taken and the speculative change applied.
    async fn run<T, F>(&self, mutation: Mutation, call: F) -> Result<MutationReport<T>, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let mut transition = self.begin(mutation).await;

        match call.await {
            Ok(outcome) => {
                let refreshed = self.commit(&mut transition).await;
                Ok(MutationReport { state: transition.state, outcome, refreshed })
            }
            Err(e) => {
                self.roll_back(&mut transition, &e).await;
                Err(e)
            }
        }
    }

    async fn begin(&self, mutation: Mutation) -> Transition {
        let mut cache = self.cache.write().await;
        let snapshot = cache.clone();
        for list in cache.values_mut() {
            mutation.speculate(list);
        }
        drop(cache);

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let mut transition = Transition { mutation, state: MutationState::Idle, snapshot };
        transition.advance(MutationState::Pending);
        transition
    }

    async fn commit(&self, transition: &mut Transition) -> bool {
        transition.snapshot.clear();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        transition.advance(MutationState::Committed);
        info!("{} committed", transition.mutation);
        self.invalidate().await
    }

    async fn roll_back(&self, transition: &mut Transition, error: &StoreError) {
        let snapshot = std::mem::take(&mut transition.snapshot);
        *self.cache.write().await = snapshot;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        transition.advance(MutationState::RolledBack);
        warn!("{} rolled back: {}", transition.mutation, error);
    }

    /// Refetch every cached query. A query that fails to refetch keeps its
    /// current entry and the result is `false`.
    async fn invalidate(&self) -> bool {
        let keys: Vec<QueryKey> = self.cache.read().await.keys().cloned().collect();
        let fetched = join_all(keys.iter().map(|key| self.fetch(key))).await;

        let mut refreshed = true;
        let mut cache = self.cache.write().await;
        for (key, result) in keys.into_iter().zip(fetched) {
            match result {
                Ok(list) => {
                    cache.insert(key, list);
                }
                Err(e) => {
                    warn!("refetch of {} failed; keeping cached entry: {}", key, e);
                    refreshed = false;
                }
            }
        }
        refreshed
    }
}
