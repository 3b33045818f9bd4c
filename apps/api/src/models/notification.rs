use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Mailbox entry with the linked offer's title and company, when there is one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NotificationRow {
    pub id: i64,
    pub enrollment_id: String,
    pub offer_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub sent_at: NaiveDateTime,
    pub offer_title: Option<String>,
    pub company_name: Option<String>,
}
