use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::{AdminSession, GraduateSession};
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::notification::NotificationRow;
use crate::notifications::fanout::{fan_out, Audience, Broadcast};
use crate::notifications::mailbox::{list_for, mark_all_read, mark_read};
use crate::state::AppState;
use crate::validation::required;

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub title: String,
    pub message: String,
    pub audience: Audience,
    pub offer_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub recipients: u64,
}

#[derive(Debug, Serialize)]
pub struct MailboxResponse {
    pub unread: usize,
    pub read: usize,
    pub notifications: Vec<NotificationRow>,
}

#[derive(Debug, Serialize)]
pub struct MarkAllResponse {
    pub updated: u64,
}

/// POST /api/v1/admin/notifications
pub async fn handle_broadcast(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppJson(req): AppJson<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, AppError> {
    let broadcast = Broadcast {
        title: required("title", &req.title)?,
        message: required("message", &req.message)?,
        offer_id: req.offer_id,
    };
    if let Audience::Career { career } = &req.audience {
        required("career", career)?;
    }

    let recipients = fan_out(&state.db, &broadcast, &req.audience).await?;
    Ok(Json(BroadcastResponse { recipients }))
}

/// GET /api/v1/me/notifications
pub async fn handle_mailbox(
    State(state): State<AppState>,
    graduate: GraduateSession,
) -> Result<Json<MailboxResponse>, AppError> {
    let notifications = list_for(&state.db, graduate.enrollment_id()).await?;
    let unread = notifications.iter().filter(|n| !n.is_read).count();
    Ok(Json(MailboxResponse {
        unread,
        read: notifications.len() - unread,
        notifications,
    }))
}

/// POST /api/v1/me/notifications/:id/read
pub async fn handle_mark_read(
    State(state): State<AppState>,
    graduate: GraduateSession,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    if !mark_read(&state.db, graduate.enrollment_id(), id).await? {
        return Err(AppError::NotFound(format!("Notification {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/me/notifications/read-all
pub async fn handle_mark_all_read(
    State(state): State<AppState>,
    graduate: GraduateSession,
) -> Result<Json<MarkAllResponse>, AppError> {
    let updated = mark_all_read(&state.db, graduate.enrollment_id()).await?;
    Ok(Json(MarkAllResponse { updated }))
}
