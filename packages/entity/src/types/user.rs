use crate::error::{FieldErrors, ValidationError};
use crate::utils::blank;
use serde::{Deserialize, Serialize};

/// Profile document kept alongside the authentication account.
///
/// The document ID equals the account ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(skip)]
    pub id: String,

    pub name: String,

    pub email: String,

    /// Reference to the uploaded avatar
    #[serde(default, with = "blank")]
    pub avatar: Option<String>,

    /// Department document ID
    #[serde(default, with = "blank")]
    pub department: Option<String>,

    #[serde(default, with = "blank")]
    pub bio: Option<String>,

    /// Set once onboarding has been completed
    #[serde(default, rename = "onBoarding")]
    pub onboarded: bool,
}

/// Onboarding form input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingForm {
    pub user_id: Option<String>,
    pub avatar: Option<String>,
    pub department: String,
    pub bio: String,
}

impl OnboardingForm {
    pub fn validate(self) -> Result<Onboarding, ValidationError> {
        let user_id = self
            .user_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ValidationError::Missing { field: "user_id" })?;

        let mut errors = FieldErrors::new();
        let department = self.department.trim().to_string();
        if department.is_empty() {
            errors.insert("department", "Department is required.");
        }
        errors.into_result()?;

        Ok(Onboarding {
            user_id,
            avatar: self.avatar.filter(|a| !a.trim().is_empty()),
            department,
            bio: self.bio.trim().to_string(),
        })
    }
}

/// Validated onboarding update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Onboarding {
    user_id: String,
    avatar: Option<String>,
    department: String,
    bio: String,
}

impl Onboarding {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn bio(&self) -> &str {
        &self.bio
    }
}
