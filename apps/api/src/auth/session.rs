//! Opaque bearer-token sessions stored in the `sessions` table.

use chrono::{Duration, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::models::user::Role;

#[derive(Debug, Clone, Serialize)]
pub struct NewSession {
    pub token: String,
    pub expires_at: NaiveDateTime,
}

/// A live session joined with the current state of its account.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRecord {
    pub token: String,
    pub enrollment_id: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub password_change_required: bool,
}

/// Opens a session for `enrollment_id`, first dropping every expired session.
pub async fn create_session(
    pool: &SqlitePool,
    enrollment_id: &str,
    ttl_hours: i64,
) -> Result<NewSession, sqlx::Error> {
    let now = Utc::now().naive_utc();
    purge_expired(pool, now).await?;

    let token = Uuid::new_v4().simple().to_string();
    let expires_at = now + Duration::hours(ttl_hours);

    sqlx::query(
        "INSERT INTO sessions (token, enrollment_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(enrollment_id)
    .bind(now)
    .bind(expires_at)
    .execute(pool)
    .await?;

    info!("Opened session for {enrollment_id}");
    Ok(NewSession { token, expires_at })
}

/// Resolves a token to its session. Expired sessions and deactivated accounts resolve to `None`.
pub async fn find_session(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<SessionRecord>, sqlx::Error> {
    sqlx::query_as::<_, SessionRecord>(
        r#"
        SELECT s.token, s.enrollment_id, u.role, u.first_name, u.last_name,
               u.password_change_required
        FROM sessions s
        JOIN users u ON u.enrollment_id = s.enrollment_id
        WHERE s.token = ? AND s.expires_at > ? AND u.active = 1
        "#,
    )
    .bind(token)
    .bind(Utc::now().naive_utc())
    .fetch_optional(pool)
    .await
}

pub async fn revoke_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Drops every session of one account. Returns the number removed.
pub async fn revoke_all_for(pool: &SqlitePool, enrollment_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE enrollment_id = ?")
        .bind(enrollment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

async fn purge_expired(pool: &SqlitePool, now: NaiveDateTime) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn insert_user(pool: &SqlitePool, enrollment_id: &str, active: bool) {
        sqlx::query(
            "INSERT INTO users (enrollment_id, password_hash, role, first_name, last_name, active) VALUES (?, 'x', 'graduate', 'Ana', 'López', ?)",
        )
        .bind(enrollment_id)
        .bind(active)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        insert_user(&pool, "0121010030", true).await;

        let session = create_session(&pool, "0121010030", 1).await.unwrap();
        let found = find_session(&pool, &session.token).await.unwrap().unwrap();
        assert_eq!(found.enrollment_id, "0121010030");
        assert_eq!(found.role, Role::Graduate);
        assert_eq!(found.first_name, "Ana");
    }

    #[tokio::test]
    async fn test_unknown_token_is_none() {
        let pool = test_pool().await;
        assert!(find_session(&pool, "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_none_and_purged() {
        let pool = test_pool().await;
        insert_user(&pool, "0121010030", true).await;
        let past = Utc::now().naive_utc() - Duration::hours(2);
        sqlx::query(
            "INSERT INTO sessions (token, enrollment_id, created_at, expires_at) VALUES ('old', '0121010030', ?, ?)",
        )
        .bind(past)
        .bind(past + Duration::hours(1))
        .execute(&pool)
        .await
        .unwrap();

        assert!(find_session(&pool, "old").await.unwrap().is_none());

        create_session(&pool, "0121010030", 1).await.unwrap();
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE token = 'old'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_inactive_user_session_is_none() {
        let pool = test_pool().await;
        insert_user(&pool, "0121010031", false).await;
        let session = create_session(&pool, "0121010031", 1).await.unwrap();
        assert!(find_session(&pool, &session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_all_for() {
        let pool = test_pool().await;
        insert_user(&pool, "0121010030", true).await;
        create_session(&pool, "0121010030", 1).await.unwrap();
        create_session(&pool, "0121010030", 1).await.unwrap();
        assert_eq!(revoke_all_for(&pool, "0121010030").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_role_comes_from_account() {
        let pool = test_pool().await;
        insert_user(&pool, "0121010030", true).await;
        let session = create_session(&pool, "0121010030", 1).await.unwrap();

        sqlx::query("UPDATE users SET role = 'admin' WHERE enrollment_id = '0121010030'")
            .execute(&pool)
            .await
            .unwrap();
        let found = find_session(&pool, &session.token).await.unwrap().unwrap();
        assert_eq!(found.role, Role::Admin);
    }
}
