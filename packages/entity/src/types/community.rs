use crate::error::{FieldErrors, ValidationError};
use crate::utils::blank;
use serde::{Deserialize, Serialize};

/// A campus community as held by the document store.
///
/// `members` is derived from the membership collection and is never written
/// back; it is only populated by reads that join the two collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Community {
    /// Document ID, carried by the store envelope rather than the fields
    #[serde(skip)]
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default, with = "blank")]
    pub description: Option<String>,

    /// Reference to the uploaded cover image
    #[serde(default, with = "blank")]
    pub cover_image: Option<String>,

    /// User IDs allowed to administer the community
    #[serde(default)]
    pub admins: Vec<String>,

    /// User IDs with a membership association, in association order
    #[serde(skip)]
    pub members: Vec<String>,
}

impl Community {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admins.iter().any(|admin| admin == user_id)
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|member| member == user_id)
    }

    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }

    /// Add `user_id` to the derived member list. Returns `false` if already present.
    pub fn add_member(&mut self, user_id: &str) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.members.push(user_id.to_string());
        true
    }

    /// Remove `user_id` from the derived member list. Returns `false` if absent.
    pub fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != user_id);
        self.members.len() != before
    }
}

/// Form input for a new community
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityDraft {
    pub name: String,
    pub description: String,
    pub cover_image: Option<String>,
}

impl CommunityDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cover_image(mut self, cover_image: impl Into<String>) -> Self {
        self.cover_image = Some(cover_image.into());
        self
    }

    pub fn validate(self) -> Result<NewCommunity, ValidationError> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.insert("name", "Community name is required.");
        }
        errors.into_result()?;

        let description = Some(self.description.trim().to_string()).filter(|d| !d.is_empty());
        let cover_image = self.cover_image.filter(|c| !c.trim().is_empty());
        Ok(NewCommunity { name, description, cover_image })
    }
}

/// A validated community ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommunity {
    name: String,
    description: Option<String>,
    cover_image: Option<String>,
}

impl NewCommunity {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    /// The stored record with `admin` as sole administrator and no members yet.
    pub fn into_community(self, admin: &str) -> Community {
        Community {
            id: String::new(),
            name: self.name,
            description: self.description,
            cover_image: self.cover_image,
            admins: vec![admin.to_string()],
            members: Vec::new(),
        }
    }
}
