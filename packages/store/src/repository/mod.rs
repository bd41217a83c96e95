pub mod community;
pub mod department;
pub mod event;
pub mod membership;
pub mod user;

pub use community::CommunityRepository;
pub use department::DepartmentRepository;
pub use event::EventRepository;
pub use membership::{FollowOutcome, MembershipRepository, UnfollowOutcome};
pub use user::UserRepository;
