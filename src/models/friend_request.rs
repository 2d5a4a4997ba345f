// SPDX-License-Identifier: MIT

//! Friend request model and its two-state lifecycle.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Friend request status. The only transition is `pending` -> `accepted`;
/// accepted requests are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
}

/// Directional friend request document (collection `friend_requests`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub sender: ObjectId,
    pub recipient: ObjectId,
    pub status: RequestStatus,
    /// When the request was created (RFC 3339)
    pub created_at: String,
}

impl FriendRequest {
    /// Create a new pending request from `sender` to `recipient`.
    pub fn new(sender: ObjectId, recipient: ObjectId) -> Self {
        Self {
            id: ObjectId::new(),
            sender,
            recipient,
            status: RequestStatus::Pending,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&RequestStatus::Accepted).unwrap(),
            "\"accepted\""
        );
    }

    #[test]
    fn test_new_request_is_pending() {
        let req = FriendRequest::new(ObjectId::new(), ObjectId::new());
        assert_eq!(req.status, RequestStatus::Pending);
    }
}
