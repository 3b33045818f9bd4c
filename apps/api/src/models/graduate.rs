use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GraduateRow {
    pub id: i64,
    pub enrollment_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub career_id: Option<i64>,
    pub enrolled_on: Option<NaiveDate>,
    pub graduated_on: NaiveDate,
    pub grade_average: Option<f64>,
    pub professional_license: Option<String>,
    pub degree_awarded: bool,
    pub registered_at: NaiveDateTime,
}

/// One line of the graduate listing and search results.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GraduateListing {
    pub enrollment_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub career_name: Option<String>,
    pub graduated_on: NaiveDate,
    pub grade_average: Option<f64>,
}

/// Graduate record joined with its career.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GraduateProfile {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub graduate: GraduateRow,
    pub career_name: Option<String>,
    pub faculty: Option<String>,
}
