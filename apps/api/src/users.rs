//! Admin account management.

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::extractor::AdminSession;
use crate::auth::session::revoke_all_for;
use crate::errors::AppError;
use crate::extract::AppPath;
use crate::models::user::UserListing;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ToggleActiveResponse {
    pub enrollment_id: String,
    pub active: bool,
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<UserListing>, sqlx::Error> {
    sqlx::query_as::<_, UserListing>(
        r#"
        SELECT enrollment_id, first_name, last_name, email, role, active, registered_at
        FROM users
        ORDER BY registered_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Flips the account's `active` flag and returns the new value, or `None` for
/// an unknown enrollment id. Deactivation also ends every live session.
pub async fn toggle_active(
    pool: &SqlitePool,
    enrollment_id: &str,
) -> Result<Option<bool>, sqlx::Error> {
    let active: Option<bool> = sqlx::query_scalar(
        "UPDATE users SET active = NOT active WHERE enrollment_id = ? RETURNING active",
    )
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await?;

    if active == Some(false) {
        let revoked = revoke_all_for(pool, enrollment_id).await?;
        info!("Deactivated {enrollment_id}; revoked {revoked} sessions");
    } else if active == Some(true) {
        info!("Reactivated {enrollment_id}");
    }
    Ok(active)
}

/// GET /api/v1/admin/users
pub async fn handle_list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<UserListing>>, AppError> {
    Ok(Json(list_users(&state.db).await?))
}

/// POST /api/v1/admin/users/:enrollment_id/toggle-active
pub async fn handle_toggle_active(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    AppPath(enrollment_id): AppPath<String>,
) -> Result<Json<ToggleActiveResponse>, AppError> {
    if admin.enrollment_id == enrollment_id {
        return Err(AppError::validation("You cannot deactivate your own account"));
    }
    let active = toggle_active(&state.db, &enrollment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {enrollment_id} not found")))?;
    Ok(Json(ToggleActiveResponse {
        enrollment_id,
        active,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::{create_session, find_session};
    use crate::db::test_pool;

    async fn insert_user(pool: &SqlitePool, enrollment_id: &str, registered_at: &str) {
        sqlx::query(
            "INSERT INTO users (enrollment_id, password_hash, role, first_name, last_name, registered_at) VALUES (?, 'x', 'graduate', 'Ana', 'López', ?)",
        )
        .bind(enrollment_id)
        .bind(registered_at)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let pool = test_pool().await;
        insert_user(&pool, "OLD", "2024-01-01 08:00:00").await;
        insert_user(&pool, "NEW", "2025-01-01 08:00:00").await;

        let users = list_users(&pool).await.unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.enrollment_id.as_str()).collect();
        assert_eq!(ids, vec!["NEW", "OLD"]);
        assert!(users.iter().all(|u| u.active));
    }

    #[tokio::test]
    async fn test_toggle_flips_and_revokes_sessions() {
        let pool = test_pool().await;
        insert_user(&pool, "A1", "2024-01-01 08:00:00").await;
        let session = create_session(&pool, "A1", 1).await.unwrap();

        assert_eq!(toggle_active(&pool, "A1").await.unwrap(), Some(false));
        assert!(find_session(&pool, &session.token).await.unwrap().is_none());

        assert_eq!(toggle_active(&pool, "A1").await.unwrap(), Some(true));
    }

    #[tokio::test]
    async fn test_toggle_unknown_user() {
        let pool = test_pool().await;
        assert_eq!(toggle_active(&pool, "NOPE").await.unwrap(), None);
    }
}
