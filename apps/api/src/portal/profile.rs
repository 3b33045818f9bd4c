//! A graduate's own record. Contact details live on both the login account and
//! the graduate record; the account copy wins on read and both are written on update.

use sqlx::SqlitePool;
use tracing::info;

use crate::models::graduate::GraduateProfile;

/// Self-service changes; `None` leaves the field untouched.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub professional_license: Option<String>,
    pub degree_awarded: Option<bool>,
}

pub async fn find_own_profile(
    pool: &SqlitePool,
    enrollment_id: &str,
) -> Result<Option<GraduateProfile>, sqlx::Error> {
    sqlx::query_as::<_, GraduateProfile>(
        r#"
        SELECT g.id, g.enrollment_id, g.first_name, g.last_name,
               COALESCE(u.email, g.email) AS email,
               COALESCE(u.phone, g.phone) AS phone,
               g.career_id, g.enrolled_on, g.graduated_on, g.grade_average,
               g.professional_license, g.degree_awarded, g.registered_at,
               c.name AS career_name, c.faculty
        FROM graduates g
        JOIN users u ON u.enrollment_id = g.enrollment_id
        LEFT JOIN careers c ON c.id = g.career_id
        WHERE g.enrollment_id = ?
        "#,
    )
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await
}

/// Writes `changes` to the account and the graduate record in one transaction.
/// Returns `false` when the caller has no graduate record.
pub async fn update_own_profile(
    pool: &SqlitePool,
    enrollment_id: &str,
    changes: &ProfileChanges,
) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE graduates SET
            email                = COALESCE(?, email),
            phone                = COALESCE(?, phone),
            professional_license = COALESCE(?, professional_license),
            degree_awarded       = COALESCE(?, degree_awarded)
        WHERE enrollment_id = ?
        "#,
    )
    .bind(&changes.email)
    .bind(&changes.phone)
    .bind(&changes.professional_license)
    .bind(changes.degree_awarded)
    .bind(enrollment_id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Ok(false);
    }

    sqlx::query(
        "UPDATE users SET email = COALESCE(?, email), phone = COALESCE(?, phone) WHERE enrollment_id = ?",
    )
    .bind(&changes.email)
    .bind(&changes.phone)
    .bind(enrollment_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Graduate {enrollment_id} updated their profile");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    async fn seed(pool: &SqlitePool) {
        sqlx::query(
            r#"
            INSERT INTO careers (id, name, faculty) VALUES (1, 'Informática', 'Ingeniería');
            INSERT INTO users (enrollment_id, password_hash, role, first_name, last_name, email, phone) VALUES
                ('A1', 'x', 'graduate', 'Ana', 'López', 'ana@cuenta.mx', NULL);
            INSERT INTO graduates (enrollment_id, first_name, last_name, email, phone, career_id, graduated_on) VALUES
                ('A1', 'Ana', 'López', 'ana@registro.mx', '555-0101', 1, '2023-06-30');
            "#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_account_contact_preferred_with_record_fallback() {
        let pool = test_pool().await;
        seed(&pool).await;

        let profile = find_own_profile(&pool, "A1").await.unwrap().unwrap();
        assert_eq!(profile.graduate.email.as_deref(), Some("ana@cuenta.mx"));
        assert_eq!(profile.graduate.phone.as_deref(), Some("555-0101"));
        assert_eq!(profile.career_name.as_deref(), Some("Informática"));
        assert_eq!(profile.faculty.as_deref(), Some("Ingeniería"));
    }

    #[tokio::test]
    async fn test_update_writes_both_tables() {
        let pool = test_pool().await;
        seed(&pool).await;

        let changes = ProfileChanges {
            email: Some("ana@nuevo.mx".into()),
            degree_awarded: Some(true),
            ..Default::default()
        };
        assert!(update_own_profile(&pool, "A1", &changes).await.unwrap());

        let (account_email, account_phone): (Option<String>, Option<String>) =
            sqlx::query_as("SELECT email, phone FROM users WHERE enrollment_id = 'A1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(account_email.as_deref(), Some("ana@nuevo.mx"));
        assert_eq!(account_phone, None);

        let profile = find_own_profile(&pool, "A1").await.unwrap().unwrap();
        assert_eq!(profile.graduate.email.as_deref(), Some("ana@nuevo.mx"));
        assert_eq!(profile.graduate.phone.as_deref(), Some("555-0101"));
        assert!(profile.graduate.degree_awarded);
    }

    #[tokio::test]
    async fn test_update_without_record() {
        let pool = test_pool().await;
        assert!(!update_own_profile(&pool, "NOPE", &ProfileChanges::default())
            .await
            .unwrap());
    }
}
