use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sectors a company may declare when registering.
pub const COMPANY_SECTORS: &[&str] = &[
    "technology",
    "health",
    "education",
    "finance",
    "manufacturing",
    "services",
    "government",
    "other",
];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub name: String,
    pub sector: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub registered_at: NaiveDateTime,
    pub active: bool,
}
