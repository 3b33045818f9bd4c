//! Admin handlers for graduate records.

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AdminSession;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::graduates::queries::{
    create_graduate, delete_graduate, find_profile, list_graduates, search_by_career,
    search_by_name, update_graduate, GraduateChanges, NewGraduate,
};
use crate::graduates::status::{latest_academic, latest_employment};
use crate::models::graduate::{GraduateListing, GraduateProfile, GraduateRow};
use crate::models::status::{AcademicStatusRow, EmploymentStatusRow};
use crate::state::AppState;
use crate::validation::{self, non_blank, required};

#[derive(Debug, Deserialize)]
pub struct CreateGraduateRequest {
    pub enrollment_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub career_id: i64,
    pub enrolled_on: Option<NaiveDate>,
    pub graduated_on: NaiveDate,
    pub grade_average: Option<f64>,
    pub professional_license: Option<String>,
    #[serde(default)]
    pub degree_awarded: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateGraduateResponse {
    pub graduate: GraduateRow,
    /// The enrollment id doubles as the first-login password.
    pub temporary_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGraduateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub grade_average: Option<f64>,
    pub professional_license: Option<String>,
    pub degree_awarded: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
    pub career: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GraduateDetailResponse {
    pub profile: GraduateProfile,
    pub academic_status: Option<AcademicStatusRow>,
    pub employment_status: Option<EmploymentStatusRow>,
}

/// GET /api/v1/admin/graduates
pub async fn handle_list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<GraduateListing>>, AppError> {
    Ok(Json(list_graduates(&state.db).await?))
}

/// POST /api/v1/admin/graduates
pub async fn handle_create(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppJson(req): AppJson<CreateGraduateRequest>,
) -> Result<(StatusCode, Json<CreateGraduateResponse>), AppError> {
    let enrollment_id = required("enrollment_id", &req.enrollment_id)?;
    let first_name = required("first_name", &req.first_name)?;
    let last_name = required("last_name", &req.last_name)?;
    validation::grade_average(req.grade_average)?;

    let email = non_blank(req.email.clone());
    if let Some(email) = email.as_deref() {
        validation::email("email", email)?;
    }
    let phone = non_blank(req.phone.clone());
    let professional_license = non_blank(req.professional_license.clone());

    let new_graduate = NewGraduate {
        enrollment_id,
        first_name,
        last_name,
        email: email.as_deref(),
        phone: phone.as_deref(),
        career_id: req.career_id,
        enrolled_on: req.enrolled_on,
        graduated_on: req.graduated_on,
        grade_average: req.grade_average,
        professional_license: professional_license.as_deref(),
        degree_awarded: req.degree_awarded,
    };

    let temporary_hash = state.hasher.hash(enrollment_id).await?;
    let graduate = create_graduate(&state.db, &new_graduate, &temporary_hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateGraduateResponse {
            temporary_password: graduate.enrollment_id.clone(),
            graduate,
        }),
    ))
}

/// GET /api/v1/admin/graduates/:enrollment_id
pub async fn handle_detail(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppPath(enrollment_id): AppPath<String>,
) -> Result<Json<GraduateDetailResponse>, AppError> {
    let profile = find_profile(&state.db, &enrollment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Graduate {enrollment_id} not found")))?;
    let academic_status = latest_academic(&state.db, &enrollment_id).await?;
    let employment_status = latest_employment(&state.db, &enrollment_id).await?;

    Ok(Json(GraduateDetailResponse {
        profile,
        academic_status,
        employment_status,
    }))
}

/// PATCH /api/v1/admin/graduates/:enrollment_id
pub async fn handle_update(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppPath(enrollment_id): AppPath<String>,
    AppJson(req): AppJson<UpdateGraduateRequest>,
) -> Result<Json<GraduateRow>, AppError> {
    validation::grade_average(req.grade_average)?;
    if let Some(email) = req.email.as_deref().filter(|e| !e.trim().is_empty()) {
        validation::email("email", email)?;
    }

    let changes = GraduateChanges {
        first_name: non_blank(req.first_name),
        last_name: non_blank(req.last_name),
        email: non_blank(req.email),
        phone: non_blank(req.phone),
        grade_average: req.grade_average,
        professional_license: non_blank(req.professional_license),
        degree_awarded: req.degree_awarded,
    };

    let row = update_graduate(&state.db, &enrollment_id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Graduate {enrollment_id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/admin/graduates/:enrollment_id
pub async fn handle_delete(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppPath(enrollment_id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    if !delete_graduate(&state.db, &enrollment_id).await? {
        return Err(AppError::NotFound(format!(
            "Graduate {enrollment_id} not found"
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/graduates/search?name=..|career=..
pub async fn handle_search(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppQuery(params): AppQuery<SearchQuery>,
) -> Result<Json<Vec<GraduateListing>>, AppError> {
    let name = non_blank(params.name);
    let career = non_blank(params.career);
    let results = match (name, career) {
        (Some(name), None) => search_by_name(&state.db, &name).await?,
        (None, Some(career)) => search_by_career(&state.db, &career).await?,
        _ => {
            return Err(AppError::validation(
                "Provide exactly one of 'name' or 'career'",
            ))
        }
    };
    Ok(Json(results))
}
