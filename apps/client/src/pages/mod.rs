pub mod activities;
pub mod friends;
pub mod messages;
pub mod posts;
pub mod profile;

pub use activities::ActivitiesPage;
pub use friends::FriendsPage;
pub use messages::{ChatState, MessagesPage, SendOutcome};
pub use posts::{PostDraft, PostsPage};
pub use profile::ProfilePage;
