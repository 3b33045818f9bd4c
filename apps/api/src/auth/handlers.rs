use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::extractor::AuthSession;
use crate::auth::password::validate_new_password;
use crate::auth::session::{create_session, revoke_session};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::{Role, UserIdentity, UserRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub enrollment_id: String,
    pub password: String,
    /// When set, the account must have this role (the per-role login forms).
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: NaiveDateTime,
    pub user: UserIdentity,
    pub must_change_password: bool,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserIdentity,
    pub must_change_password: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let enrollment_id = req.enrollment_id.trim();
    if enrollment_id.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Please fill in all fields"));
    }

    let user: Option<UserRow> = sqlx::query_as(
        r#"
        SELECT enrollment_id, password_hash, role, first_name, last_name, password_change_required
        FROM users
        WHERE enrollment_id = ? AND active = 1
        "#,
    )
    .bind(enrollment_id)
    .fetch_optional(&state.db)
    .await?;

    let Some(user) = user else {
        warn!("Rejected login for unknown or inactive account {enrollment_id}");
        return Err(AppError::InvalidCredentials);
    };

    if !state.hasher.verify(&req.password, &user.password_hash).await? {
        warn!("Rejected login for {enrollment_id}: bad password");
        return Err(AppError::InvalidCredentials);
    }

    if let Some(expected) = req.role {
        if expected != user.role {
            warn!("Rejected login for {enrollment_id}: role {} is not {expected}", user.role);
            return Err(AppError::InvalidCredentials);
        }
    }

    let session =
        create_session(&state.db, &user.enrollment_id, state.config.session_ttl_hours).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: UserIdentity::from(&user),
        must_change_password: user.password_change_required,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<StatusCode, AppError> {
    revoke_session(&state.db, &session.token).await?;
    info!("Closed session for {}", session.enrollment_id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(AuthSession(session): AuthSession) -> Json<MeResponse> {
    Json(MeResponse {
        must_change_password: session.password_change_required,
        user: UserIdentity {
            enrollment_id: session.enrollment_id,
            role: session.role,
            first_name: session.first_name,
            last_name: session.last_name,
        },
    })
}

/// POST /api/v1/auth/password
///
/// While the account holds its temporary password the current password is not
/// asked for again; the login that opened this session already proved it.
pub async fn handle_change_password(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    validate_new_password(&session.enrollment_id, &req.new_password, &req.confirm_password)?;

    if !session.password_change_required {
        let current = req
            .current_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::validation("Current password is required"))?;

        let stored: String =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE enrollment_id = ?")
                .bind(&session.enrollment_id)
                .fetch_one(&state.db)
                .await?;

        if !state.hasher.verify(current, &stored).await? {
            return Err(AppError::validation("Current password is incorrect"));
        }
    }

    let new_hash = state.hasher.hash(&req.new_password).await?;
    sqlx::query(
        "UPDATE users SET password_hash = ?, password_change_required = 0 WHERE enrollment_id = ?",
    )
    .bind(new_hash)
    .bind(&session.enrollment_id)
    .execute(&state.db)
    .await?;

    info!("Password changed for {}", session.enrollment_id);
    Ok(StatusCode::NO_CONTENT)
}
