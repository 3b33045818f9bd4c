use sqlx::SqlitePool;

use crate::models::notification::NotificationRow;

/// The recipient's notifications, newest first, with linked offer details.
pub async fn list_for(
    pool: &SqlitePool,
    enrollment_id: &str,
) -> Result<Vec<NotificationRow>, sqlx::Error> {
    sqlx::query_as::<_, NotificationRow>(
        r#"
        SELECT n.id, n.enrollment_id, n.offer_id, n.title, n.message, n.is_read, n.sent_at,
               o.title AS offer_title, c.name AS company_name
        FROM notifications n
        LEFT JOIN job_offers o ON o.id = n.offer_id
        LEFT JOIN companies c ON c.id = o.company_id
        WHERE n.enrollment_id = ?
        ORDER BY n.sent_at DESC, n.id DESC
        "#,
    )
    .bind(enrollment_id)
    .fetch_all(pool)
    .await
}

pub async fn unread_count(pool: &SqlitePool, enrollment_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE enrollment_id = ? AND is_read = 0")
        .bind(enrollment_id)
        .fetch_one(pool)
        .await
}

/// Marks one notification read. Returns `false` when it does not belong to `enrollment_id`.
pub async fn mark_read(
    pool: &SqlitePool,
    enrollment_id: &str,
    notification_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND enrollment_id = ?")
        .bind(notification_id)
        .bind(enrollment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn mark_all_read(pool: &SqlitePool, enrollment_id: &str) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE enrollment_id = ? AND is_read = 0")
            .bind(enrollment_id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed(pool: &SqlitePool) {
        sqlx::query(
            r#"
            INSERT INTO users (enrollment_id, password_hash, role, first_name, last_name) VALUES
                ('A1', 'x', 'graduate', 'Ana', 'López'),
                ('B2', 'x', 'graduate', 'Beto', 'Ruiz');
            INSERT INTO companies (id, name) VALUES (1, 'Acme');
            INSERT INTO job_offers (id, company_id, title, modality) VALUES (7, 1, 'Backend', 'remote');
            INSERT INTO notifications (id, enrollment_id, offer_id, title, message, sent_at) VALUES
                (1, 'A1', NULL, 'Bienvenida', 'Hola', '2026-01-01 09:00:00'),
                (2, 'A1', 7, 'Nueva oferta', 'Mira esto', '2026-02-01 09:00:00'),
                (3, 'B2', NULL, 'Bienvenida', 'Hola', '2026-01-01 09:00:00');
            "#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_newest_first_with_offer_details() {
        let pool = test_pool().await;
        seed(&pool).await;

        let list = list_for(&pool, "A1").await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, 2);
        assert_eq!(list[0].offer_title.as_deref(), Some("Backend"));
        assert_eq!(list[0].company_name.as_deref(), Some("Acme"));
        assert_eq!(list[1].offer_title, None);
    }

    #[tokio::test]
    async fn test_mark_read_only_own() {
        let pool = test_pool().await;
        seed(&pool).await;

        assert!(!mark_read(&pool, "A1", 3).await.unwrap());
        assert!(mark_read(&pool, "A1", 1).await.unwrap());
        assert_eq!(unread_count(&pool, "A1").await.unwrap(), 1);
        assert_eq!(unread_count(&pool, "B2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_all_read() {
        let pool = test_pool().await;
        seed(&pool).await;

        assert_eq!(mark_all_read(&pool, "A1").await.unwrap(), 2);
        assert_eq!(mark_all_read(&pool, "A1").await.unwrap(), 0);
        assert_eq!(unread_count(&pool, "A1").await.unwrap(), 0);
        assert_eq!(unread_count(&pool, "B2").await.unwrap(), 1);
    }
}
