use serde::{Deserialize, Serialize};

/// Logical collections the client reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Communities,
    CommunityMembers,
    Events,
    Departments,
}

/// Concrete collection IDs in the backing store.
///
/// Hosted backends assign opaque IDs per project, so these are configured
/// rather than fixed. Defaults are the plain collection names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collections {
    pub users: String,
    pub communities: String,
    pub community_members: String,
    pub events: String,
    pub departments: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            users: "users".to_string(),
            communities: "communities".to_string(),
            community_members: "community_members".to_string(),
            events: "events".to_string(),
            departments: "departments".to_string(),
        }
    }
}

impl Collections {
    pub fn name(&self, collection: Collection) -> &str {
        match collection {
            Collection::Users => &self.users,
            Collection::Communities => &self.communities,
            Collection::CommunityMembers => &self.community_members,
            Collection::Events => &self.events,
            Collection::Departments => &self.departments,
        }
    }
}
