//! Database layer (MongoDB document store).

pub mod store;

pub use store::{OnboardingProfile, Store};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const FRIEND_REQUESTS: &str = "friend_requests";
}
