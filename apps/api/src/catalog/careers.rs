use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::extractor::AdminSession;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::career::CareerRow;
use crate::state::AppState;
use crate::validation::required;

const DEFAULT_DURATION_SEMESTERS: i64 = 8;

#[derive(Debug, Deserialize)]
pub struct CreateCareerRequest {
    pub name: String,
    pub faculty: String,
    pub duration_semesters: Option<i64>,
    pub active: Option<bool>,
}

pub async fn list_careers(pool: &SqlitePool) -> Result<Vec<CareerRow>, sqlx::Error> {
    sqlx::query_as::<_, CareerRow>("SELECT * FROM careers ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn insert_career(
    pool: &SqlitePool,
    name: &str,
    faculty: &str,
    duration_semesters: i64,
    active: bool,
) -> Result<CareerRow, sqlx::Error> {
    let row = sqlx::query_as::<_, CareerRow>(
        "INSERT INTO careers (name, faculty, duration_semesters, active) VALUES (?, ?, ?, ?) RETURNING *",
    )
    .bind(name)
    .bind(faculty)
    .bind(duration_semesters)
    .bind(active)
    .fetch_one(pool)
    .await?;
    info!("Added career '{name}'");
    Ok(row)
}

/// GET /api/v1/admin/careers
pub async fn handle_list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<CareerRow>>, AppError> {
    Ok(Json(list_careers(&state.db).await?))
}

/// POST /api/v1/admin/careers
pub async fn handle_create(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppJson(req): AppJson<CreateCareerRequest>,
) -> Result<(StatusCode, Json<CareerRow>), AppError> {
    let name = required("name", &req.name)?;
    let faculty = required("faculty", &req.faculty)?;
    let duration = req.duration_semesters.unwrap_or(DEFAULT_DURATION_SEMESTERS);
    if !(1..=20).contains(&duration) {
        return Err(AppError::validation(
            "duration_semesters must be between 1 and 20",
        ));
    }

    let row = insert_career(&state.db, name, faculty, duration, req.active.unwrap_or(true)).await?;
    Ok((StatusCode::CREATED, Json(row)))
}
