use campus_entity::Community;
use std::fmt;

/// Identity of a cached community query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Every community, as shown on the directory page
    AllCommunities,
    /// A single community page
    Community(String),
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::AllCommunities => write!(f, "communities"),
            QueryKey::Community(id) => write!(f, "community:{}", id),
        }
    }
}

/// Ordered snapshot of communities with their member lists.
///
/// Only the [`Reconciler`](crate::Reconciler) mutates these; readers get clones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedCommunityList {
    communities: Vec<Community>,
}

impl CachedCommunityList {
    pub fn new(communities: Vec<Community>) -> Self {
        Self { communities }
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    pub fn find(&self, community_id: &str) -> Option<&Community> {
        self.communities.iter().find(|community| community.id == community_id)
    }

    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    pub fn into_inner(self) -> Vec<Community> {
        self.communities
    }

    pub(crate) fn add_member(&mut self, community_id: &str, user_id: &str) -> bool {
        self.find_mut(community_id).is_some_and(|community| community.add_member(user_id))
    }

    pub(crate) fn remove_member(&mut self, community_id: &str, user_id: &str) -> bool {
        self.find_mut(community_id).is_some_and(|community| community.remove_member(user_id))
    }

    fn find_mut(&mut self, community_id: &str) -> Option<&mut Community> {
        self.communities.iter_mut().find(|community| community.id == community_id)
    }
}

impl From<Vec<Community>> for CachedCommunityList {
    fn from(communities: Vec<Community>) -> Self {
        Self::new(communities)
    }
}
