//! Graduate self-service endpoints under `/api/v1/me`.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::GraduateSession;
use crate::catalog::offers::recent_active_offers;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::graduates::status::{
    academic_history, append_academic, append_employment, employment_history, latest_academic,
    latest_employment, AcademicStatusInput, EmploymentStatusInput,
};
use crate::models::graduate::GraduateProfile;
use crate::models::offer::JobOfferListing;
use crate::models::status::{AcademicStatusRow, EmploymentStatusRow};
use crate::notifications::mailbox::unread_count;
use crate::portal::profile::{find_own_profile, update_own_profile, ProfileChanges};
use crate::state::AppState;
use crate::validation::{self, non_blank};

const DASHBOARD_OFFERS: i64 = 5;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub profile: GraduateProfile,
    pub unread_notifications: i64,
    pub academic_status: Option<AcademicStatusRow>,
    pub employment_status: Option<EmploymentStatusRow>,
    pub recent_offers: Vec<JobOfferListing>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub professional_license: Option<String>,
    pub degree_awarded: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct StatusHistory<T> {
    pub current: Option<T>,
    pub history: Vec<T>,
}

impl<T: Clone> StatusHistory<T> {
    /// `history` is newest first, so its head is the current snapshot.
    fn from_history(history: Vec<T>) -> Self {
        StatusHistory {
            current: history.first().cloned(),
            history,
        }
    }
}

async fn own_profile(state: &AppState, enrollment_id: &str) -> Result<GraduateProfile, AppError> {
    find_own_profile(&state.db, enrollment_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No graduate record for {enrollment_id}")))
}

/// GET /api/v1/me/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    graduate: GraduateSession,
) -> Result<Json<DashboardResponse>, AppError> {
    let enrollment_id = graduate.enrollment_id();
    let profile = own_profile(&state, enrollment_id).await?;

    Ok(Json(DashboardResponse {
        profile,
        unread_notifications: unread_count(&state.db, enrollment_id).await?,
        academic_status: latest_academic(&state.db, enrollment_id).await?,
        employment_status: latest_employment(&state.db, enrollment_id).await?,
        recent_offers: recent_active_offers(&state.db, DASHBOARD_OFFERS).await?,
    }))
}

/// GET /api/v1/me/profile
pub async fn handle_profile(
    State(state): State<AppState>,
    graduate: GraduateSession,
) -> Result<Json<GraduateProfile>, AppError> {
    Ok(Json(own_profile(&state, graduate.enrollment_id()).await?))
}

/// PATCH /api/v1/me/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    graduate: GraduateSession,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<GraduateProfile>, AppError> {
    let changes = ProfileChanges {
        email: non_blank(req.email),
        phone: non_blank(req.phone),
        professional_license: non_blank(req.professional_license),
        degree_awarded: req.degree_awarded,
    };
    if let Some(email) = changes.email.as_deref() {
        validation::email("email", email)?;
    }

    let enrollment_id = graduate.enrollment_id();
    if !update_own_profile(&state.db, enrollment_id, &changes).await? {
        return Err(AppError::NotFound(format!(
            "No graduate record for {enrollment_id}"
        )));
    }
    Ok(Json(own_profile(&state, enrollment_id).await?))
}

/// GET /api/v1/me/academic
pub async fn handle_academic(
    State(state): State<AppState>,
    graduate: GraduateSession,
) -> Result<Json<StatusHistory<AcademicStatusRow>>, AppError> {
    let history = academic_history(&state.db, graduate.enrollment_id()).await?;
    Ok(Json(StatusHistory::from_history(history)))
}

/// POST /api/v1/me/academic
pub async fn handle_record_academic(
    State(state): State<AppState>,
    graduate: GraduateSession,
    AppJson(input): AppJson<AcademicStatusInput>,
) -> Result<(StatusCode, Json<AcademicStatusRow>), AppError> {
    let snapshot = input.into_snapshot()?;
    let row = append_academic(&state.db, graduate.enrollment_id(), &snapshot).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/me/employment
pub async fn handle_employment(
    State(state): State<AppState>,
    graduate: GraduateSession,
) -> Result<Json<StatusHistory<EmploymentStatusRow>>, AppError> {
    let history = employment_history(&state.db, graduate.enrollment_id()).await?;
    Ok(Json(StatusHistory::from_history(history)))
}

/// POST /api/v1/me/employment
pub async fn handle_record_employment(
    State(state): State<AppState>,
    graduate: GraduateSession,
    AppJson(input): AppJson<EmploymentStatusInput>,
) -> Result<(StatusCode, Json<EmploymentStatusRow>), AppError> {
    let snapshot = input.into_snapshot()?;
    let row = append_employment(&state.db, graduate.enrollment_id(), &snapshot).await?;
    Ok((StatusCode::CREATED, Json(row)))
}
