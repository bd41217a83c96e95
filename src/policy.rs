//! Application rules checked before a membership or admin write is issued.
//!
//! The store enforces none of these. Every check runs against the
//! authoritative community record, never the speculative cache.

use campus_entity::Community;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    /// The change would leave the community with no admin
    #[error("{user} is the last admin of {community} and cannot leave or be demoted")]
    LastAdmin { community: String, user: String },

    #[error("{user} is not an admin of {community}")]
    NotAdmin { community: String, user: String },

    #[error("{user} is not a member of {community}")]
    NotMember { community: String, user: String },
}

impl PolicyViolation {
    fn last_admin(community: &Community, user: &str) -> Self {
        Self::LastAdmin { community: community.id.clone(), user: user.to_string() }
    }

    fn not_admin(community: &Community, user: &str) -> Self {
        Self::NotAdmin { community: community.id.clone(), user: user.to_string() }
    }

    fn not_member(community: &Community, user: &str) -> Self {
        Self::NotMember { community: community.id.clone(), user: user.to_string() }
    }
}

pub struct MembershipPolicy;

impl MembershipPolicy {
    fn is_sole_admin(community: &Community, user: &str) -> bool {
        community.admin_count() == 1 && community.is_admin(user)
    }

    /// `user` may leave unless they are the only admin.
    pub fn check_leave(community: &Community, user: &str) -> Result<(), PolicyViolation> {
        if Self::is_sole_admin(community, user) {
            return Err(PolicyViolation::last_admin(community, user));
        }
        Ok(())
    }

    /// `actor` must be an admin. `target` may be anyone who is not the sole admin.
    pub fn check_demote(
        community: &Community,
        actor: &str,
        target: &str,
    ) -> Result<(), PolicyViolation> {
        Self::check_admin(community, actor)?;
        if Self::is_sole_admin(community, target) {
            return Err(PolicyViolation::last_admin(community, target));
        }
        Ok(())
    }

    /// `actor` must be an admin and `target` a member.
    ///
    /// Needs a community read with its member list.
    pub fn check_promote(
        community: &Community,
        actor: &str,
        target: &str,
    ) -> Result<(), PolicyViolation> {
        Self::check_admin(community, actor)?;
        if !community.is_member(target) {
            return Err(PolicyViolation::not_member(community, target));
        }
        Ok(())
    }

    pub fn check_admin(community: &Community, actor: &str) -> Result<(), PolicyViolation> {
        if !community.is_admin(actor) {
            return Err(PolicyViolation::not_admin(community, actor));
        }
        Ok(())
    }
}
