use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Graduate,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Graduate => "graduate",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account columns needed to authenticate a login, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub enrollment_id: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub password_change_required: bool,
}

/// Account listing shown to administrators.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserListing {
    pub enrollment_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub active: bool,
    pub registered_at: NaiveDateTime,
}

/// Identity carried by a session and echoed back to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserIdentity {
    pub enrollment_id: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

impl From<&UserRow> for UserIdentity {
    fn from(row: &UserRow) -> Self {
        UserIdentity {
            enrollment_id: row.enrollment_id.clone(),
            role: row.role,
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_deserializes() {
        assert_eq!(serde_json::from_str::<Role>("\"admin\"").unwrap(), Role::Admin);
        assert!(serde_json::from_str::<Role>("\"alumno\"").is_err());
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Graduate).unwrap(), "\"graduate\"");
    }
}
