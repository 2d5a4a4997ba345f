// SPDX-License-Identifier: MIT

//! User directory and friend-request routes (all session-protected).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::{FriendRequest, RequestStatus, User, UserResponse, UserSummary};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(get_recommended_users))
        .route("/api/users/friends", get(get_friends))
        .route("/api/users/friend-request/{id}", post(send_friend_request))
        .route(
            "/api/users/friend-request/{id}/accept",
            put(accept_friend_request),
        )
        .route("/api/users/friend-requests", get(get_friend_requests))
        .route(
            "/api/users/outgoing-friend-requests",
            get(get_outgoing_requests),
        )
}

// ─── Responses ───────────────────────────────────────────────

/// Friend request with the counterpart's user card populated.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedRequest {
    pub id: String,
    pub sender: Option<UserSummary>,
    pub recipient: Option<UserSummary>,
    pub status: RequestStatus,
    pub created_at: String,
}

/// Incoming pending requests plus acceptance notifications.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestsResponse {
    pub incoming_reqs: Vec<PopulatedRequest>,
    pub accepted_reqs: Vec<PopulatedRequest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRequestResponse {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub status: RequestStatus,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct AcceptResponse {
    pub success: bool,
    pub message: String,
}

// ─── Handlers ────────────────────────────────────────────────

/// Recommended partners: onboarded users that are neither the requester
/// nor already friends.
async fn get_recommended_users(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<UserResponse>>> {
    let users = state.store.recommended_users(&current.user).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// The requester's friends as populated user cards.
async fn get_friends(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<UserSummary>>> {
    let friends = state.store.users_by_ids(&current.user.friends).await?;
    Ok(Json(friends.iter().map(UserSummary::from).collect()))
}

/// Create transition: open a pending friend request to `{id}`.
async fn send_friend_request(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<CreatedRequestResponse>)> {
    let my_id = current.user.id;
    let recipient_id = parse_user_id(&id)?;

    if recipient_id == my_id {
        return Err(AppError::BadRequest(
            "You can't send a friend request to yourself".to_string(),
        ));
    }

    let recipient = state
        .store
        .find_user_by_id(&recipient_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipient not found".to_string()))?;

    if recipient.friends.contains(&my_id) {
        return Err(AppError::BadRequest(
            "You are already friends with this user".to_string(),
        ));
    }

    // One active request per pair, regardless of direction
    if state
        .store
        .request_exists_between(&my_id, &recipient_id)
        .await?
    {
        return Err(AppError::BadRequest(
            "A friend request already exists between you and this user".to_string(),
        ));
    }

    let request = FriendRequest::new(my_id, recipient_id);
    state.store.insert_request(&request).await?;

    tracing::info!(
        sender = %my_id,
        recipient = %recipient_id,
        request_id = %request.id,
        "Friend request created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreatedRequestResponse {
            id: request.id.to_hex(),
            sender: request.sender.to_hex(),
            recipient: request.recipient.to_hex(),
            status: request.status,
            created_at: request.created_at,
        }),
    ))
}

/// Accept transition: pending -> accepted, then link both friend lists.
///
/// The status flip is a compare-and-set in the store, so a concurrent
/// accept on the same request has exactly one winner; the loser gets the
/// same conflict response as a plain double-accept.
async fn accept_friend_request(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<AcceptResponse>> {
    let request_id = parse_user_id(&id)?;

    let request = state
        .store
        .find_request(&request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

    if request.recipient != current.user.id {
        return Err(AppError::Forbidden(
            "You are not authorized to accept this request".to_string(),
        ));
    }

    if !state.store.accept_request(&request_id).await? {
        return Err(AppError::InvalidState(
            "Friend request already accepted".to_string(),
        ));
    }

    state
        .store
        .add_friend_pair(&request.sender, &request.recipient)
        .await?;

    tracing::info!(
        request_id = %request_id,
        sender = %request.sender,
        recipient = %request.recipient,
        "Friend request accepted"
    );

    Ok(Json(AcceptResponse {
        success: true,
        message: "Friend request accepted".to_string(),
    }))
}

/// Incoming pending requests (populated sender) and accepted requests the
/// requester sent (populated recipient, shown as notifications).
async fn get_friend_requests(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<FriendRequestsResponse>> {
    let my_id = current.user.id;

    let incoming = state.store.incoming_pending(&my_id).await?;
    let accepted = state.store.accepted_sent_by(&my_id).await?;

    let incoming_reqs = populate(&state, incoming, Populate::Sender).await?;
    let accepted_reqs = populate(&state, accepted, Populate::Recipient).await?;

    Ok(Json(FriendRequestsResponse {
        incoming_reqs,
        accepted_reqs,
    }))
}

/// Pending requests the requester has sent, with recipients populated.
async fn get_outgoing_requests(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<PopulatedRequest>>> {
    let outgoing = state.store.outgoing_pending(&current.user.id).await?;
    let populated = populate(&state, outgoing, Populate::Recipient).await?;
    Ok(Json(populated))
}

// ─── Helpers ─────────────────────────────────────────────────

fn parse_user_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid id".to_string()))
}

#[derive(Clone, Copy)]
enum Populate {
    Sender,
    Recipient,
}

/// Batch-populate the counterpart user card on each request. Requests
/// whose counterpart has vanished are kept with a `None` card rather than
/// dropped.
async fn populate(
    state: &AppState,
    requests: Vec<FriendRequest>,
    side: Populate,
) -> Result<Vec<PopulatedRequest>> {
    let ids: Vec<ObjectId> = requests
        .iter()
        .map(|r| match side {
            Populate::Sender => r.sender,
            Populate::Recipient => r.recipient,
        })
        .collect();

    let users: HashMap<ObjectId, User> = state
        .store
        .users_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(requests
        .into_iter()
        .map(|r| {
            let summary_of = |id: &ObjectId| users.get(id).map(UserSummary::from);
            let (sender, recipient) = match side {
                Populate::Sender => (summary_of(&r.sender), None),
                Populate::Recipient => (None, summary_of(&r.recipient)),
            };
            PopulatedRequest {
                id: r.id.to_hex(),
                sender,
                recipient,
                status: r.status,
                created_at: r.created_at,
            }
        })
        .collect())
}
