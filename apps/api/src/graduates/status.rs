//! Append-only academic and employment snapshots. The newest snapshot is the
//! graduate's current situation; ties on `updated_at` go to the higher id.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::AppError;
use crate::models::status::{AcademicStatusRow, EmploymentStatusRow, StudyType};
use crate::validation::{non_blank, required_opt};

#[derive(Debug, Deserialize)]
pub struct AcademicStatusInput {
    pub currently_studying: bool,
    pub institution: Option<String>,
    pub study_type: Option<String>,
    pub program_name: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub expected_end_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct EmploymentStatusInput {
    pub currently_employed: bool,
    pub company: Option<String>,
    pub position: Option<String>,
    pub sector: Option<String>,
    pub salary_range: Option<String>,
    pub years_experience: Option<i64>,
    pub started_on: Option<NaiveDate>,
    pub related_to_degree: Option<bool>,
}

/// Snapshot ready to insert. A "not studying" snapshot carries only the flag.
#[derive(Debug, Default, PartialEq)]
pub struct AcademicSnapshot {
    pub currently_studying: bool,
    pub institution: Option<String>,
    pub study_type: Option<StudyType>,
    pub program_name: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub expected_end_on: Option<NaiveDate>,
}

/// Snapshot ready to insert. A "not employed" snapshot carries only the flag.
#[derive(Debug, Default, PartialEq)]
pub struct EmploymentSnapshot {
    pub currently_employed: bool,
    pub company: Option<String>,
    pub position: Option<String>,
    pub sector: Option<String>,
    pub salary_range: Option<String>,
    pub years_experience: Option<i64>,
    pub started_on: Option<NaiveDate>,
    pub related_to_degree: Option<bool>,
}

impl AcademicStatusInput {
    pub fn into_snapshot(self) -> Result<AcademicSnapshot, AppError> {
        if !self.currently_studying {
            return Ok(AcademicSnapshot::default());
        }
        let institution = required_opt("institution", self.institution.as_deref())?.to_string();
        let program_name = required_opt("program_name", self.program_name.as_deref())?.to_string();
        let study_type = required_opt("study_type", self.study_type.as_deref())?
            .parse::<StudyType>()
            .map_err(AppError::Validation)?;

        Ok(AcademicSnapshot {
            currently_studying: true,
            institution: Some(institution),
            study_type: Some(study_type),
            program_name: Some(program_name),
            started_on: self.started_on,
            expected_end_on: self.expected_end_on,
        })
    }
}

impl EmploymentStatusInput {
    pub fn into_snapshot(self) -> Result<EmploymentSnapshot, AppError> {
        if !self.currently_employed {
            return Ok(EmploymentSnapshot::default());
        }
        let company = required_opt("company", self.company.as_deref())?.to_string();
        let position = required_opt("position", self.position.as_deref())?.to_string();
        let sector = required_opt("sector", self.sector.as_deref())?.to_string();
        if matches!(self.years_experience, Some(y) if y < 0) {
            return Err(AppError::validation("years_experience cannot be negative"));
        }

        Ok(EmploymentSnapshot {
            currently_employed: true,
            company: Some(company),
            position: Some(position),
            sector: Some(sector),
            salary_range: non_blank(self.salary_range),
            years_experience: self.years_experience,
            started_on: self.started_on,
            related_to_degree: self.related_to_degree,
        })
    }
}

pub async fn latest_academic(
    pool: &SqlitePool,
    enrollment_id: &str,
) -> Result<Option<AcademicStatusRow>, sqlx::Error> {
    sqlx::query_as::<_, AcademicStatusRow>(
        "SELECT * FROM academic_status WHERE enrollment_id = ? ORDER BY updated_at DESC, id DESC LIMIT 1",
    )
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await
}

pub async fn academic_history(
    pool: &SqlitePool,
    enrollment_id: &str,
) -> Result<Vec<AcademicStatusRow>, sqlx::Error> {
    sqlx::query_as::<_, AcademicStatusRow>(
        "SELECT * FROM academic_status WHERE enrollment_id = ? ORDER BY updated_at DESC, id DESC",
    )
    .bind(enrollment_id)
    .fetch_all(pool)
    .await
}

pub async fn append_academic(
    pool: &SqlitePool,
    enrollment_id: &str,
    snapshot: &AcademicSnapshot,
) -> Result<AcademicStatusRow, sqlx::Error> {
    let row = sqlx::query_as::<_, AcademicStatusRow>(
        r#"
        INSERT INTO academic_status
            (enrollment_id, currently_studying, institution, study_type, program_name,
             started_on, expected_end_on)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(enrollment_id)
    .bind(snapshot.currently_studying)
    .bind(&snapshot.institution)
    .bind(snapshot.study_type)
    .bind(&snapshot.program_name)
    .bind(snapshot.started_on)
    .bind(snapshot.expected_end_on)
    .fetch_one(pool)
    .await?;

    info!("Recorded academic status for {enrollment_id}");
    Ok(row)
}

pub async fn latest_employment(
    pool: &SqlitePool,
    enrollment_id: &str,
) -> Result<Option<EmploymentStatusRow>, sqlx::Error> {
    sqlx::query_as::<_, EmploymentStatusRow>(
        "SELECT * FROM employment_status WHERE enrollment_id = ? ORDER BY updated_at DESC, id DESC LIMIT 1",
    )
    .bind(enrollment_id)
    .fetch_optional(pool)
    .await
}

pub async fn employment_history(
    pool: &SqlitePool,
    enrollment_id: &str,
) -> Result<Vec<EmploymentStatusRow>, sqlx::Error> {
    sqlx::query_as::<_, EmploymentStatusRow>(
        "SELECT * FROM employment_status WHERE enrollment_id = ? ORDER BY updated_at DESC, id DESC",
    )
    .bind(enrollment_id)
    .fetch_all(pool)
    .await
}

pub async fn append_employment(
    pool: &SqlitePool,
    enrollment_id: &str,
    snapshot: &EmploymentSnapshot,
) -> Result<EmploymentStatusRow, sqlx::Error> {
    let row = sqlx::query_as::<_, EmploymentStatusRow>(
        r#"
        INSERT INTO employment_status
            (enrollment_id, currently_employed, company, position, sector, salary_range,
             years_experience, started_on, related_to_degree)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(enrollment_id)
    .bind(snapshot.currently_employed)
    .bind(&snapshot.company)
    .bind(&snapshot.position)
    .bind(&snapshot.sector)
    .bind(&snapshot.salary_range)
    .bind(snapshot.years_experience)
    .bind(snapshot.started_on)
    .bind(snapshot.related_to_degree)
    .fetch_one(pool)
    .await?;

    info!("Recorded employment status for {enrollment_id}");
    Ok(row)
}
