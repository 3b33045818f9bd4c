use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerRow {
    pub id: i64,
    pub name: String,
    pub faculty: String,
    pub duration_semesters: Option<i64>,
    pub active: bool,
}

/// Graduate head-count for one career, used by the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerGraduateCount {
    pub career: String,
    pub graduates: i64,
}
