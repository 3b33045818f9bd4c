//! Request extractors that resolve `Authorization: Bearer <token>` to a session
//! and apply the role guards.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::session::{find_session, SessionRecord};
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

/// Any authenticated caller, including a graduate who still holds a temporary password.
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionRecord);

/// An authenticated administrator.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionRecord);

/// An authenticated graduate who has already replaced the temporary password.
#[derive(Debug, Clone)]
pub struct GraduateSession(pub SessionRecord);

impl GraduateSession {
    pub fn enrollment_id(&self) -> &str {
        &self.0.enrollment_id
    }
}

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let session = find_session(&state.db, token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthSession(session))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthSession(session) = AuthSession::from_request_parts(parts, state).await?;
        if session.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        Ok(AdminSession(session))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for GraduateSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthSession(session) = AuthSession::from_request_parts(parts, state).await?;
        if session.role != Role::Graduate {
            return Err(AppError::Forbidden);
        }
        if session.password_change_required {
            return Err(AppError::PasswordChangeRequired);
        }
        Ok(GraduateSession(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(bearer_token(&parts_with(None)), None);
    }

    #[test]
    fn test_basic_scheme_rejected() {
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcjpwYXNz"))), None);
    }

    #[test]
    fn test_empty_bearer_rejected() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer   "))), None);
    }
}
