//! Job offers: admin publishing and the graduate job board.

use std::str::FromStr;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::auth::extractor::{AdminSession, GraduateSession};
use crate::errors::AppError;
use crate::extract::{AppJson, AppQuery};
use crate::models::offer::{JobOfferListing, JobOfferRow, Modality};
use crate::state::AppState;
use crate::validation::{non_blank, required};

const LISTING_SELECT: &str = r#"
    SELECT o.*, c.name AS company_name, c.sector AS company_sector, c.contact_email
    FROM job_offers o
    JOIN companies c ON c.id = o.company_id
"#;

/// How far back the job board looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostedWithin {
    Week,
    Month,
    Quarter,
}

impl FromStr for PostedWithin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(PostedWithin::Week),
            "month" => Ok(PostedWithin::Month),
            "quarter" => Ok(PostedWithin::Quarter),
            other => Err(format!(
                "Unknown posted_within '{other}' (expected week, month or quarter)"
            )),
        }
    }
}

impl PostedWithin {
    /// Earliest publication time that still falls inside the window.
    pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            PostedWithin::Week => now - Duration::days(7),
            PostedWithin::Month => now.checked_sub_months(Months::new(1)).unwrap_or(now),
            PostedWithin::Quarter => now.checked_sub_months(Months::new(3)).unwrap_or(now),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct OfferFilter {
    pub modality: Option<Modality>,
    pub sector: Option<String>,
    pub published_since: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct OfferQuery {
    pub modality: Option<String>,
    pub sector: Option<String>,
    pub posted_within: Option<String>,
}

impl OfferQuery {
    pub fn into_filter(self, now: NaiveDateTime) -> Result<OfferFilter, AppError> {
        let modality = non_blank(self.modality)
            .map(|m| m.parse::<Modality>())
            .transpose()
            .map_err(AppError::Validation)?;
        let published_since = non_blank(self.posted_within)
            .map(|p| p.parse::<PostedWithin>())
            .transpose()
            .map_err(AppError::Validation)?
            .map(|window| window.cutoff(now));

        Ok(OfferFilter {
            modality,
            sector: non_blank(self.sector),
            published_since,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub company_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub salary_offered: Option<String>,
    pub modality: String,
    pub location: Option<String>,
    pub expires_on: Option<NaiveDate>,
}

/// Every offer, active or not, newest first.
pub async fn list_all_offers(pool: &SqlitePool) -> Result<Vec<JobOfferListing>, sqlx::Error> {
    sqlx::query_as::<_, JobOfferListing>(&format!(
        "{LISTING_SELECT} ORDER BY o.published_at DESC, o.id DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Active offers matching `filter`, newest first.
pub async fn find_active_offers(
    pool: &SqlitePool,
    filter: &OfferFilter,
) -> Result<Vec<JobOfferListing>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(LISTING_SELECT);
    qb.push(" WHERE o.active = 1");
    if let Some(modality) = filter.modality {
        qb.push(" AND o.modality = ").push_bind(modality);
    }
    if let Some(sector) = &filter.sector {
        qb.push(" AND c.sector = ").push_bind(sector.clone());
    }
    if let Some(since) = filter.published_since {
        qb.push(" AND o.published_at >= ").push_bind(since);
    }
    qb.push(" ORDER BY o.published_at DESC, o.id DESC");

    let rows = qb
        .build_query_as::<JobOfferListing>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn recent_active_offers(
    pool: &SqlitePool,
    limit: i64,
) -> Result<Vec<JobOfferListing>, sqlx::Error> {
    sqlx::query_as::<_, JobOfferListing>(&format!(
        "{LISTING_SELECT} WHERE o.active = 1 ORDER BY o.published_at DESC, o.id DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Distinct sectors of companies that currently have an active offer.
pub async fn active_offer_sectors(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT DISTINCT c.sector
        FROM companies c
        JOIN job_offers o ON o.company_id = c.id
        WHERE o.active = 1 AND c.sector IS NOT NULL
        ORDER BY c.sector
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_offer(
    pool: &SqlitePool,
    req: &CreateOfferRequest,
    modality: Modality,
) -> Result<JobOfferRow, AppError> {
    let company_active: Option<bool> = sqlx::query_scalar("SELECT active FROM companies WHERE id = ?")
        .bind(req.company_id)
        .fetch_optional(pool)
        .await?;
    if company_active != Some(true) {
        return Err(AppError::UnprocessableEntity(format!(
            "Company {} does not exist or is not active",
            req.company_id
        )));
    }

    let row = sqlx::query_as::<_, JobOfferRow>(
        r#"
        INSERT INTO job_offers
            (company_id, title, description, requirements, salary_offered, modality,
             location, expires_on)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(req.company_id)
    .bind(req.title.trim())
    .bind(non_blank(req.description.clone()))
    .bind(non_blank(req.requirements.clone()))
    .bind(non_blank(req.salary_offered.clone()))
    .bind(modality)
    .bind(non_blank(req.location.clone()))
    .bind(req.expires_on)
    .fetch_one(pool)
    .await?;

    info!("Published offer '{}' for company {}", row.title, row.company_id);
    Ok(row)
}

/// GET /api/v1/admin/offers
pub async fn handle_admin_list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<JobOfferListing>>, AppError> {
    Ok(Json(list_all_offers(&state.db).await?))
}

/// POST /api/v1/admin/offers
pub async fn handle_create(
    State(state): State<AppState>,
    _admin: AdminSession,
    AppJson(req): AppJson<CreateOfferRequest>,
) -> Result<(StatusCode, Json<JobOfferRow>), AppError> {
    required("title", &req.title)?;
    let modality = req
        .modality
        .trim()
        .parse::<Modality>()
        .map_err(AppError::Validation)?;

    let row = insert_offer(&state.db, &req, modality).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/me/offers
pub async fn handle_job_board(
    State(state): State<AppState>,
    _graduate: GraduateSession,
    AppQuery(query): AppQuery<OfferQuery>,
) -> Result<Json<Vec<JobOfferListing>>, AppError> {
    let filter = query.into_filter(Utc::now().naive_utc())?;
    Ok(Json(find_active_offers(&state.db, &filter).await?))
}

/// GET /api/v1/me/offers/sectors
pub async fn handle_sectors(
    State(state): State<AppState>,
    _graduate: GraduateSession,
) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(active_offer_sectors(&state.db).await?))
}
