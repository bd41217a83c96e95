pub mod community;
pub mod department;
pub mod event;
pub mod membership;
pub mod onboarding;
pub mod user;

pub use community::{Community, CommunityDraft, NewCommunity};
pub use department::Department;
pub use event::{CommunityEvent, EventDraft, Frequency, NewEvent};
pub use membership::MembershipAssociation;
pub use onboarding::OnboardingGate;
pub use user::{Onboarding, OnboardingForm, UserProfile};
