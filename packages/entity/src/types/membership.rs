use serde::{Deserialize, Serialize};

/// Association between one user and one community.
///
/// `(user, community)` is the natural key; the document ID is store-assigned.
/// `user_id` and `communities_id` mirror the key under the relationship
/// attribute names the backend schema also requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipAssociation {
    #[serde(skip)]
    pub id: String,

    /// Member user ID
    pub user: String,

    /// Community document ID
    pub community: String,

    #[serde(default, rename = "userId")]
    pub user_id: String,

    #[serde(default, rename = "communitiesId")]
    pub communities_id: String,
}

impl MembershipAssociation {
    pub fn new(user: impl Into<String>, community: impl Into<String>) -> Self {
        let user = user.into();
        let community = community.into();
        Self {
            id: String::new(),
            user_id: user.clone(),
            communities_id: community.clone(),
            user,
            community,
        }
    }

    /// True when this association links `user` to `community`.
    pub fn matches(&self, user: &str, community: &str) -> bool {
        self.user == user && self.community == community
    }
}
