//! Broadcast one message to every graduate matching an audience filter.
//!
//! Recipients are resolved and one unread row per recipient is inserted inside
//! a single transaction, so a broadcast is delivered to everyone or to no one.

use serde::Deserialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Audience {
    /// Every graduate account.
    All,
    /// Graduates whose record belongs to the career with this exact name.
    Career { career: String },
    /// Graduates who finished in this calendar year.
    GraduationYear { year: i32 },
}

/// Message validated and ready to fan out.
#[derive(Debug, Clone)]
pub struct Broadcast<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub offer_id: Option<i64>,
}

async fn resolve_recipients(
    tx: &mut Transaction<'_, Sqlite>,
    audience: &Audience,
) -> Result<Vec<String>, sqlx::Error> {
    match audience {
        Audience::All => {
            sqlx::query_scalar(
                "SELECT enrollment_id FROM users WHERE role = 'graduate' ORDER BY enrollment_id",
            )
            .fetch_all(&mut **tx)
            .await
        }
        Audience::Career { career } => {
            sqlx::query_scalar(
                r#"
                SELECT u.enrollment_id
                FROM users u
                JOIN graduates g ON g.enrollment_id = u.enrollment_id
                JOIN careers c ON c.id = g.career_id
                WHERE u.role = 'graduate' AND c.name = ?
                ORDER BY u.enrollment_id
                "#,
            )
            .bind(career)
            .fetch_all(&mut **tx)
            .await
        }
        Audience::GraduationYear { year } => {
            sqlx::query_scalar(
                r#"
                SELECT u.enrollment_id
                FROM users u
                JOIN graduates g ON g.enrollment_id = u.enrollment_id
                WHERE u.role = 'graduate' AND strftime('%Y', g.graduated_on) = ?
                ORDER BY u.enrollment_id
                "#,
            )
            .bind(format!("{year:04}"))
            .fetch_all(&mut **tx)
            .await
        }
    }
}

/// Inserts one notification per matching graduate and returns how many were sent.
pub async fn fan_out(
    pool: &SqlitePool,
    broadcast: &Broadcast<'_>,
    audience: &Audience,
) -> Result<u64, AppError> {
    let mut tx = pool.begin().await?;

    if let Some(offer_id) = broadcast.offer_id {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM job_offers WHERE id = ?")
            .bind(offer_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::UnprocessableEntity(format!(
                "Job offer {offer_id} does not exist"
            )));
        }
    }

    let recipients = resolve_recipients(&mut tx, audience).await?;
    for enrollment_id in &recipients {
        sqlx::query(
            "INSERT INTO notifications (enrollment_id, offer_id, title, message) VALUES (?, ?, ?, ?)",
        )
        .bind(enrollment_id)
        .bind(broadcast.offer_id)
        .bind(broadcast.title)
        .bind(broadcast.message)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(
        "Broadcast '{}' delivered to {} graduates ({audience:?})",
        broadcast.title,
        recipients.len()
    );
    Ok(recipients.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed(pool: &SqlitePool) {
        sqlx::query(
            r#"
            INSERT INTO careers (id, name, faculty) VALUES (1, 'Informática', 'Ingeniería'), (2, 'Biología', 'Ciencias');
            INSERT INTO users (enrollment_id, password_hash, role, first_name, last_name, active) VALUES
                ('ADMIN001', 'x', 'admin', 'Servicios', 'Escolares', 1),
                ('A1', 'x', 'graduate', 'Ana', 'López', 1),
                ('B2', 'x', 'graduate', 'Beto', 'Ruiz', 1),
                ('C3', 'x', 'graduate', 'Carla', 'Soto', 0),
                ('D4', 'x', 'graduate', 'Diego', 'Vela', 1);
            INSERT INTO graduates (enrollment_id, first_name, last_name, career_id, graduated_on) VALUES
                ('A1', 'Ana', 'López', 1, '2023-06-30'),
                ('B2', 'Beto', 'Ruiz', 2, '2022-12-15'),
                ('C3', 'Carla', 'Soto', 1, '2022-07-01');
            "#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    fn hello() -> Broadcast<'static> {
        Broadcast {
            title: "Feria de empleo",
            message: "Los esperamos el viernes",
            offer_id: None,
        }
    }

    async fn mailbox_size(pool: &SqlitePool, enrollment_id: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE enrollment_id = ?")
            .bind(enrollment_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn test_audience_deserializes() {
        let all: Audience = serde_json::from_str(r#"{"kind":"all"}"#).unwrap();
        assert_eq!(all, Audience::All);
        let career: Audience =
            serde_json::from_str(r#"{"kind":"career","career":"Biología"}"#).unwrap();
        assert_eq!(career, Audience::Career { career: "Biología".into() });
        let year: Audience =
            serde_json::from_str(r#"{"kind":"graduation_year","year":2023}"#).unwrap();
        assert_eq!(year, Audience::GraduationYear { year: 2023 });
        assert!(serde_json::from_str::<Audience>(r#"{"kind":"everyone"}"#).is_err());
    }

    #[tokio::test]
    async fn test_all_reaches_every_graduate_account_but_not_admins() {
        let pool = test_pool().await;
        seed(&pool).await;

        // D4 has an account but no graduate record; inactive C3 still receives mail
        assert_eq!(fan_out(&pool, &hello(), &Audience::All).await.unwrap(), 4);
        assert_eq!(mailbox_size(&pool, "ADMIN001").await, 0);
        assert_eq!(mailbox_size(&pool, "D4").await, 1);
    }

    #[tokio::test]
    async fn test_by_career() {
        let pool = test_pool().await;
        seed(&pool).await;

        let audience = Audience::Career { career: "Informática".into() };
        assert_eq!(fan_out(&pool, &hello(), &audience).await.unwrap(), 2);
        assert_eq!(mailbox_size(&pool, "A1").await, 1);
        assert_eq!(mailbox_size(&pool, "B2").await, 0);
    }

    #[tokio::test]
    async fn test_by_graduation_year() {
        let pool = test_pool().await;
        seed(&pool).await;

        let audience = Audience::GraduationYear { year: 2022 };
        assert_eq!(fan_out(&pool, &hello(), &audience).await.unwrap(), 2);
        assert_eq!(mailbox_size(&pool, "A1").await, 0);
    }

    #[tokio::test]
    async fn test_empty_audience_sends_nothing() {
        let pool = test_pool().await;
        seed(&pool).await;

        let audience = Audience::GraduationYear { year: 1999 };
        assert_eq!(fan_out(&pool, &hello(), &audience).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_offer_rejected_without_delivery() {
        let pool = test_pool().await;
        seed(&pool).await;

        let broadcast = Broadcast {
            offer_id: Some(42),
            ..hello()
        };
        let err = fan_out(&pool, &broadcast, &Audience::All).await.unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert_eq!(mailbox_size(&pool, "A1").await, 0);
    }

    #[tokio::test]
    async fn test_notifications_start_unread_and_link_offer() {
        let pool = test_pool().await;
        seed(&pool).await;
        sqlx::query("INSERT INTO companies (id, name) VALUES (1, 'Acme')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO job_offers (id, company_id, title, modality) VALUES (7, 1, 'Backend', 'remote')")
            .execute(&pool)
            .await
            .unwrap();

        let broadcast = Broadcast {
            offer_id: Some(7),
            ..hello()
        };
        fan_out(&pool, &broadcast, &Audience::Career { career: "Biología".into() })
            .await
            .unwrap();

        let (offer_id, is_read): (Option<i64>, bool) = sqlx::query_as(
            "SELECT offer_id, is_read FROM notifications WHERE enrollment_id = 'B2'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(offer_id, Some(7));
        assert!(!is_read);
    }
}
