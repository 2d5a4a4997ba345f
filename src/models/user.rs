//! User model for storage and API.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// User profile document (collection `users`).
///
/// `password_hash` never leaves the store layer in API responses; handlers
/// convert to [`UserResponse`] / [`UserSummary`] before serializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID (also the session JWT subject)
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Email address (unique login identity)
    pub email: String,
    /// Argon2 password hash
    pub password_hash: String,
    /// Full display name
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    /// Profile picture URL (random avatar assigned at signup)
    #[serde(default)]
    pub profile_pic: String,
    #[serde(default)]
    pub native_language: String,
    #[serde(default)]
    pub learning_language: String,
    #[serde(default)]
    pub location: String,
    /// Whether the one-time onboarding flow has been completed
    #[serde(default)]
    pub is_onboarded: bool,
    /// Friends, grown only by friend-request acceptance (no duplicates)
    #[serde(default)]
    pub friends: Vec<ObjectId>,
    /// When the account was created (RFC 3339)
    pub created_at: String,
}

impl User {
    /// Create a fresh, not-yet-onboarded user.
    pub fn new(email: String, password_hash: String, full_name: String, profile_pic: String) -> Self {
        Self {
            id: ObjectId::new(),
            email,
            password_hash,
            full_name,
            bio: String::new(),
            profile_pic,
            native_language: String::new(),
            learning_language: String::new(),
            location: String::new(),
            is_onboarded: false,
            friends: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Full user payload returned by auth and directory routes.
///
/// Field names are camelCase on the wire for the SPA.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub profile_pic: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub is_onboarded: bool,
    pub friends: Vec<String>,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            bio: user.bio.clone(),
            profile_pic: user.profile_pic.clone(),
            native_language: user.native_language.clone(),
            learning_language: user.learning_language.clone(),
            location: user.location.clone(),
            is_onboarded: user.is_onboarded,
            friends: user.friends.iter().map(|id| id.to_hex()).collect(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Compact user card embedded in friend lists and request listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub profile_pic: String,
    pub native_language: String,
    pub learning_language: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_hex(),
            full_name: user.full_name.clone(),
            profile_pic: user.profile_pic.clone(),
            native_language: user.native_language.clone(),
            learning_language: user.learning_language.clone(),
        }
    }
}
