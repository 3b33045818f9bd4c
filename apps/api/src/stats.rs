//! Head-counts for the admin dashboard.

use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::auth::extractor::AdminSession;
use crate::errors::AppError;
use crate::models::career::CareerGraduateCount;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_graduates: i64,
    pub active_graduate_users: i64,
    pub active_companies: i64,
    pub active_offers: i64,
    pub graduates_per_career: Vec<CareerGraduateCount>,
}

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(sql).fetch_one(pool).await
}

pub async fn collect_stats(pool: &SqlitePool) -> Result<DashboardStats, sqlx::Error> {
    let total_graduates = count(pool, "SELECT COUNT(*) FROM graduates").await?;
    let active_graduate_users = count(
        pool,
        "SELECT COUNT(*) FROM users WHERE role = 'graduate' AND active = 1",
    )
    .await?;
    let active_companies = count(pool, "SELECT COUNT(*) FROM companies WHERE active = 1").await?;
    let active_offers = count(pool, "SELECT COUNT(*) FROM job_offers WHERE active = 1").await?;

    // every career appears, including those with no graduates yet
    let graduates_per_career = sqlx::query_as::<_, CareerGraduateCount>(
        r#"
        SELECT c.name AS career, COUNT(g.id) AS graduates
        FROM careers c
        LEFT JOIN graduates g ON g.career_id = c.id
        GROUP BY c.id, c.name
        ORDER BY graduates DESC, c.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(DashboardStats {
        total_graduates,
        active_graduate_users,
        active_companies,
        active_offers,
        graduates_per_career,
    })
}

/// GET /api/v1/admin/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(collect_stats(&state.db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_empty_database() {
        let pool = test_pool().await;
        let stats = collect_stats(&pool).await.unwrap();
        assert_eq!(stats.total_graduates, 0);
        assert!(stats.graduates_per_career.is_empty());
    }

    #[tokio::test]
    async fn test_counts_and_career_ordering() {
        let pool = test_pool().await;
        sqlx::query(
            r#"
            INSERT INTO careers (id, name, faculty) VALUES
                (1, 'Informática', 'Ingeniería'), (2, 'Biología', 'Ciencias'),
                (3, 'Arquitectura', 'Artes'), (4, 'Derecho', 'Sociales');
            INSERT INTO users (enrollment_id, password_hash, role, first_name, last_name, active) VALUES
                ('ADMIN001', 'x', 'admin', 'Servicios', 'Escolares', 1),
                ('A1', 'x', 'graduate', 'Ana', 'López', 1),
                ('B2', 'x', 'graduate', 'Beto', 'Ruiz', 0),
                ('C3', 'x', 'graduate', 'Carla', 'Soto', 1);
            INSERT INTO graduates (enrollment_id, first_name, last_name, career_id, graduated_on) VALUES
                ('A1', 'Ana', 'López', 1, '2023-06-30'),
                ('B2', 'Beto', 'Ruiz', 1, '2022-12-15'),
                ('C3', 'Carla', 'Soto', 2, '2022-07-01');
            INSERT INTO companies (id, name, active) VALUES (1, 'Acme', 1), (2, 'Globex', 0);
            INSERT INTO job_offers (company_id, title, modality, active) VALUES
                (1, 'Backend', 'remote', 1), (1, 'QA', 'hybrid', 0);
            "#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let stats = collect_stats(&pool).await.unwrap();
        assert_eq!(stats.total_graduates, 3);
        assert_eq!(stats.active_graduate_users, 2);
        assert_eq!(stats.active_companies, 1);
        assert_eq!(stats.active_offers, 1);

        let per_career: Vec<(&str, i64)> = stats
            .graduates_per_career
            .iter()
            .map(|c| (c.career.as_str(), c.graduates))
            .collect();
        assert_eq!(
            per_career,
            vec![
                ("Informática", 2),
                ("Biología", 1),
                ("Arquitectura", 0),
                ("Derecho", 0)
            ]
        );
    }
}
