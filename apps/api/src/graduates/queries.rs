use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::graduate::{GraduateListing, GraduateProfile, GraduateRow};

/// Validated input for registering a graduate.
pub struct NewGraduate<'a> {
    pub enrollment_id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub career_id: i64,
    pub enrolled_on: Option<NaiveDate>,
    pub graduated_on: NaiveDate,
    pub grade_average: Option<f64>,
    pub professional_license: Option<&'a str>,
    pub degree_awarded: bool,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Default)]
pub struct GraduateChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub grade_average: Option<f64>,
    pub professional_license: Option<String>,
    pub degree_awarded: Option<bool>,
}

const LISTING_SELECT: &str = r#"
    SELECT g.enrollment_id, g.first_name, g.last_name, g.email,
           c.name AS career_name, g.graduated_on, g.grade_average
    FROM graduates g
    LEFT JOIN careers c ON c.id = g.career_id
"#;

pub async fn list_graduates(pool: &SqlitePool) -> Result<Vec<GraduateListing>, sqlx::Error> {
    sqlx::query_as::<_, GraduateListing>(&format!(
        "{LISTING_SELECT} ORDER BY g.graduated_on DESC, g.id DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match on first or last name.
///
/// SQLite's `lower()` and `LIKE` only fold ASCII, so names such as "Óscar"
/// are matched in Rust with Unicode lowercasing. The term is taken literally.
pub async fn search_by_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Vec<GraduateListing>, sqlx::Error> {
    let needle = name.to_lowercase();
    let rows = sqlx::query_as::<_, GraduateListing>(&format!(
        "{LISTING_SELECT} ORDER BY g.last_name, g.first_name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter(|g| {
            g.first_name.to_lowercase().contains(&needle)
                || g.last_name.to_lowercase().contains(&needle)
        })
        .collect())
}

pub async fn search_by_career(
    pool: &SqlitePool,
    career: &str,
) -> Result<Vec<GraduateListing>, sqlx::Error> {
    sqlx::query_as::<_, GraduateListing>(&format!(
        "{LISTING_SELECT} WHERE c.name = ? ORDER BY g.graduated_on DESC, g.id DESC"
    ))
    .bind(career)
    .fetch_all(pool)
    .await
}

pub async fn find_profile(
    pool: &SqlitePool,
    enrollment_id: &str,
) -> Result<Option<GraduateProfile>, sqlx::Error> {
    sqlx::query_as::<_, GraduateProfile>(
        r#"
        SELECT g.*, c.name AS career_name, c.faculty
        FROM graduates g
        LEFT JOIN careers c ON c.id = g.career_id
        WHERE g.enrollment_id = ?
        "#,
    )
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await
}

/// Creates the login account and the graduate record in one transaction.
/// The account's temporary password hash is supplied by the caller and the
/// account is flagged so the first login forces a password change.
pub async fn create_graduate(
    pool: &SqlitePool,
    graduate: &NewGraduate<'_>,
    temporary_password_hash: &str,
) -> Result<GraduateRow, AppError> {
    let mut tx = pool.begin().await?;

    let career_active: Option<bool> = sqlx::query_scalar("SELECT active FROM careers WHERE id = ?")
        .bind(graduate.career_id)
        .fetch_optional(&mut *tx)
        .await?;
    match career_active {
        Some(true) => {}
        Some(false) => {
            return Err(AppError::UnprocessableEntity(format!(
                "Career {} is not active",
                graduate.career_id
            )))
        }
        None => {
            return Err(AppError::UnprocessableEntity(format!(
                "Career {} does not exist",
                graduate.career_id
            )))
        }
    }

    let taken: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE enrollment_id = ?")
        .bind(graduate.enrollment_id)
        .fetch_optional(&mut *tx)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!(
            "Enrollment id {} is already registered",
            graduate.enrollment_id
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO users
            (enrollment_id, password_hash, role, first_name, last_name, email, phone,
             password_change_required)
        VALUES (?, ?, 'graduate', ?, ?, ?, ?, 1)
        "#,
    )
    .bind(graduate.enrollment_id)
    .bind(temporary_password_hash)
    .bind(graduate.first_name)
    .bind(graduate.last_name)
    .bind(graduate.email)
    .bind(graduate.phone)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query_as::<_, GraduateRow>(
        r#"
        INSERT INTO graduates
            (enrollment_id, first_name, last_name, email, phone, career_id, enrolled_on,
             graduated_on, grade_average, professional_license, degree_awarded)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(graduate.enrollment_id)
    .bind(graduate.first_name)
    .bind(graduate.last_name)
    .bind(graduate.email)
    .bind(graduate.phone)
    .bind(graduate.career_id)
    .bind(graduate.enrolled_on)
    .bind(graduate.graduated_on)
    .bind(graduate.grade_average)
    .bind(graduate.professional_license)
    .bind(graduate.degree_awarded)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Registered graduate {}", graduate.enrollment_id);
    Ok(row)
}

/// Applies `changes` and returns the updated row, or `None` for an unknown enrollment id.
pub async fn update_graduate(
    pool: &SqlitePool,
    enrollment_id: &str,
    changes: &GraduateChanges,
) -> Result<Option<GraduateRow>, sqlx::Error> {
    sqlx::query_as::<_, GraduateRow>(
        r#"
        UPDATE graduates SET
            first_name           = COALESCE(?, first_name),
            last_name            = COALESCE(?, last_name),
            email                = COALESCE(?, email),
            phone                = COALESCE(?, phone),
            grade_average        = COALESCE(?, grade_average),
            professional_license = COALESCE(?, professional_license),
            degree_awarded       = COALESCE(?, degree_awarded)
        WHERE enrollment_id = ?
        RETURNING *
        "#,
    )
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .bind(&changes.email)
    .bind(&changes.phone)
    .bind(changes.grade_average)
    .bind(&changes.professional_license)
    .bind(changes.degree_awarded)
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await
}

/// Removes a graduate and everything that references the account.
/// Returns `false` if there was no such graduate.
pub async fn delete_graduate(pool: &SqlitePool, enrollment_id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM graduates WHERE enrollment_id = ?")
        .bind(enrollment_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Ok(false);
    }

    // children first; every table below references users(enrollment_id)
    for table in [
        "notifications",
        "employment_status",
        "academic_status",
        "sessions",
        "graduates",
        "users",
    ] {
        sqlx::query(&format!("DELETE FROM {table} WHERE enrollment_id = ?"))
            .bind(enrollment_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    info!("Deleted graduate {enrollment_id}");
    Ok(true)
}
