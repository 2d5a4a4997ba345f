// SPDX-License-Identifier: MIT

//! Document store with typed operations for users and friend requests.
//!
//! Three backends behind one handle:
//! - `Mongo`: the real driver, used in production.
//! - `Memory`: dashmap-backed, used by integration tests.
//! - `Offline`: errors on every access, used to prove a code path performs
//!   no lookup at all.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{FriendRequest, RequestStatus, User};
use dashmap::DashMap;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use std::sync::Arc;

/// Profile fields written by the onboarding flow.
#[derive(Debug, Clone)]
pub struct OnboardingProfile {
    pub full_name: String,
    pub bio: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
}

#[derive(Default)]
struct MemoryStore {
    users: DashMap<ObjectId, User>,
    requests: DashMap<ObjectId, FriendRequest>,
}

#[derive(Clone)]
enum Backend {
    Mongo {
        users: Collection<User>,
        requests: Collection<FriendRequest>,
    },
    Memory(Arc<MemoryStore>),
    Offline,
}

/// Document store handle.
#[derive(Clone)]
pub struct Store {
    backend: Backend,
}

impl Store {
    /// Connect to MongoDB. The database name comes from the URI path,
    /// falling back to `lingualink`.
    pub async fn connect(uri: &str) -> Result<Self, AppError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        let db = client
            .default_database()
            .unwrap_or_else(|| client.database("lingualink"));

        tracing::info!(database = %db.name(), "Connected to MongoDB");

        Ok(Self {
            backend: Backend::Mongo {
                users: db.collection(collections::USERS),
                requests: db.collection(collections::FRIEND_REQUESTS),
            },
        })
    }

    /// In-memory store for integration tests.
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
        }
    }

    /// Store that fails every operation (offline mode).
    pub fn offline() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    fn offline_err() -> AppError {
        AppError::Database("Store not connected (offline mode)".to_string())
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Look up a user by document ID.
    pub async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Mongo { users, .. } => users
                .find_one(doc! { "_id": *id })
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(mem.users.get(id).map(|u| u.value().clone())),
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Look up a user by email (login identity).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Mongo { users, .. } => users
                .find_one(doc! { "email": email })
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(mem
                .users
                .iter()
                .find(|u| u.email == email)
                .map(|u| u.value().clone())),
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Insert a freshly registered user.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        match &self.backend {
            Backend::Mongo { users, .. } => {
                users
                    .insert_one(user)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(mem) => {
                mem.users.insert(user.id, user.clone());
                Ok(())
            }
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Apply the onboarding profile to a user, marking them onboarded.
    /// Returns the updated document, or `None` if the user is gone.
    pub async fn complete_onboarding(
        &self,
        id: &ObjectId,
        profile: &OnboardingProfile,
    ) -> Result<Option<User>, AppError> {
        match &self.backend {
            Backend::Mongo { users, .. } => users
                .find_one_and_update(
                    doc! { "_id": *id },
                    doc! { "$set": {
                        "full_name": profile.full_name.as_str(),
                        "bio": profile.bio.as_str(),
                        "native_language": profile.native_language.as_str(),
                        "learning_language": profile.learning_language.as_str(),
                        "location": profile.location.as_str(),
                        "is_onboarded": true,
                    }},
                )
                .return_document(ReturnDocument::After)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(mem.users.get_mut(id).map(|mut user| {
                user.full_name = profile.full_name.clone();
                user.bio = profile.bio.clone();
                user.native_language = profile.native_language.clone();
                user.learning_language = profile.learning_language.clone();
                user.location = profile.location.clone();
                user.is_onboarded = true;
                user.value().clone()
            })),
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Onboarded users, excluding the requester and their existing friends.
    pub async fn recommended_users(&self, me: &User) -> Result<Vec<User>, AppError> {
        match &self.backend {
            Backend::Mongo { users, .. } => {
                let filter = doc! {
                    "_id": { "$ne": me.id, "$nin": me.friends.clone() },
                    "is_onboarded": true,
                };
                users
                    .find(filter)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?
                    .try_collect()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(mem) => Ok(mem
                .users
                .iter()
                .filter(|u| u.is_onboarded && u.id != me.id && !me.friends.contains(&u.id))
                .map(|u| u.value().clone())
                .collect()),
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Fetch a batch of users by ID (friend lists, request population).
    pub async fn users_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        match &self.backend {
            Backend::Mongo { users, .. } => users
                .find(doc! { "_id": { "$in": ids.to_vec() } })
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .try_collect()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(ids
                .iter()
                .filter_map(|id| mem.users.get(id).map(|u| u.value().clone()))
                .collect()),
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Add each user to the other's friend list with set semantics:
    /// repeating the operation never produces duplicates.
    pub async fn add_friend_pair(&self, a: &ObjectId, b: &ObjectId) -> Result<(), AppError> {
        match &self.backend {
            Backend::Mongo { users, .. } => {
                users
                    .update_one(doc! { "_id": *a }, doc! { "$addToSet": { "friends": *b } })
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                users
                    .update_one(doc! { "_id": *b }, doc! { "$addToSet": { "friends": *a } })
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(mem) => {
                if let Some(mut user) = mem.users.get_mut(a) {
                    if !user.friends.contains(b) {
                        user.friends.push(*b);
                    }
                }
                if let Some(mut user) = mem.users.get_mut(b) {
                    if !user.friends.contains(a) {
                        user.friends.push(*a);
                    }
                }
                Ok(())
            }
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    // ─── Friend Request Operations ───────────────────────────────

    /// Look up a friend request by ID.
    pub async fn find_request(&self, id: &ObjectId) -> Result<Option<FriendRequest>, AppError> {
        match &self.backend {
            Backend::Mongo { requests, .. } => requests
                .find_one(doc! { "_id": *id })
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(mem.requests.get(id).map(|r| r.value().clone())),
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Insert a new pending request.
    pub async fn insert_request(&self, request: &FriendRequest) -> Result<(), AppError> {
        match &self.backend {
            Backend::Mongo { requests, .. } => {
                requests
                    .insert_one(request)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(mem) => {
                mem.requests.insert(request.id, request.clone());
                Ok(())
            }
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Whether any request (either direction, any status) exists between
    /// the pair. Guards against duplicate pending requests.
    pub async fn request_exists_between(
        &self,
        a: &ObjectId,
        b: &ObjectId,
    ) -> Result<bool, AppError> {
        match &self.backend {
            Backend::Mongo { requests, .. } => requests
                .find_one(doc! { "$or": [
                    { "sender": *a, "recipient": *b },
                    { "sender": *b, "recipient": *a },
                ]})
                .await
                .map(|r| r.is_some())
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(mem.requests.iter().any(|r| {
                (r.sender == *a && r.recipient == *b) || (r.sender == *b && r.recipient == *a)
            })),
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Transition a request from `pending` to `accepted`.
    ///
    /// The update is a compare-and-set on the status field, so concurrent
    /// accept attempts on the same request have exactly one winner. Returns
    /// `true` only for that winner.
    pub async fn accept_request(&self, id: &ObjectId) -> Result<bool, AppError> {
        match &self.backend {
            Backend::Mongo { requests, .. } => {
                let result = requests
                    .update_one(
                        doc! { "_id": *id, "status": "pending" },
                        doc! { "$set": { "status": "accepted" } },
                    )
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(result.modified_count == 1)
            }
            Backend::Memory(mem) => match mem.requests.get_mut(id) {
                // get_mut holds the shard lock, so check-and-set is atomic
                Some(mut request) if request.status == RequestStatus::Pending => {
                    request.status = RequestStatus::Accepted;
                    Ok(true)
                }
                _ => Ok(false),
            },
            Backend::Offline => Err(Self::offline_err()),
        }
    }

    /// Pending requests addressed to `user` (incoming).
    pub async fn incoming_pending(&self, user: &ObjectId) -> Result<Vec<FriendRequest>, AppError> {
        self.find_requests(doc! { "recipient": *user, "status": "pending" }, |r| {
            r.recipient == *user && r.status == RequestStatus::Pending
        })
        .await
    }

    /// Requests sent by `user` that were accepted (connection notifications).
    pub async fn accepted_sent_by(&self, user: &ObjectId) -> Result<Vec<FriendRequest>, AppError> {
        self.find_requests(doc! { "sender": *user, "status": "accepted" }, |r| {
            r.sender == *user && r.status == RequestStatus::Accepted
        })
        .await
    }

    /// Pending requests sent by `user` (outgoing).
    pub async fn outgoing_pending(&self, user: &ObjectId) -> Result<Vec<FriendRequest>, AppError> {
        self.find_requests(doc! { "sender": *user, "status": "pending" }, |r| {
            r.sender == *user && r.status == RequestStatus::Pending
        })
        .await
    }

    async fn find_requests<F>(
        &self,
        filter: mongodb::bson::Document,
        predicate: F,
    ) -> Result<Vec<FriendRequest>, AppError>
    where
        F: Fn(&FriendRequest) -> bool,
    {
        match &self.backend {
            Backend::Mongo { requests, .. } => requests
                .find(filter)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?
                .try_collect()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => Ok(mem
                .requests
                .iter()
                .filter(|r| predicate(r.value()))
                .map(|r| r.value().clone())
                .collect()),
            Backend::Offline => Err(Self::offline_err()),
        }
    }
}
