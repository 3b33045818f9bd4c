//! Company intake (public) and the admin company listing.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::extractor::AdminSession;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::company::{CompanyRow, COMPANY_SECTORS};
use crate::state::AppState;
use crate::validation::{self, non_blank, required};

#[derive(Debug, Deserialize)]
pub struct RegisterCompanyRequest {
    pub name: String,
    pub sector: Option<String>,
    pub description: Option<String>,
    pub contact_email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// Validated registration, ready to insert.
#[derive(Debug, PartialEq)]
pub struct CompanyRegistration {
    pub name: String,
    pub sector: Option<String>,
    pub description: Option<String>,
    pub contact_email: String,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl RegisterCompanyRequest {
    pub fn validate(self) -> Result<CompanyRegistration, AppError> {
        let name = required("name", &self.name)?.to_string();
        let contact_email = required("contact_email", &self.contact_email)?.to_string();
        validation::email("contact_email", &contact_email)?;

        let sector = non_blank(self.sector).map(|s| s.to_lowercase());
        if let Some(sector) = sector.as_deref() {
            if !COMPANY_SECTORS.contains(&sector) {
                return Err(AppError::validation(format!(
                    "Unknown sector '{sector}' (expected one of: {})",
                    COMPANY_SECTORS.join(", ")
                )));
            }
        }

        Ok(CompanyRegistration {
            name,
            sector,
            description: non_blank(self.description),
            contact_email,
            phone: non_blank(self.phone),
            website: non_blank(self.website),
        })
    }
}

pub async fn insert_company(
    pool: &SqlitePool,
    company: &CompanyRegistration,
) -> Result<CompanyRow, sqlx::Error> {
    let row = sqlx::query_as::<_, CompanyRow>(
        r#"
        INSERT INTO companies (name, sector, description, contact_email, phone, website)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&company.name)
    .bind(&company.sector)
    .bind(&company.description)
    .bind(&company.contact_email)
    .bind(&company.phone)
    .bind(&company.website)
    .fetch_one(pool)
    .await?;
    info!("Registered company '{}' (id {})", row.name, row.id);
    Ok(row)
}

pub async fn list_companies(pool: &SqlitePool) -> Result<Vec<CompanyRow>, sqlx::Error> {
    sqlx::query_as::<_, CompanyRow>("SELECT * FROM companies ORDER BY registered_at DESC, id DESC")
        .fetch_all(pool)
        .await
}

/// POST /api/v1/companies/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyRow>), AppError> {
    let registration = req.validate()?;
    let row = insert_company(&state.db, &registration).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/admin/companies
pub async fn handle_list(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<CompanyRow>>, AppError> {
    Ok(Json(list_companies(&state.db).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn request(sector: Option<&str>, email: &str) -> RegisterCompanyRequest {
        RegisterCompanyRequest {
            name: "Acme Software".into(),
            sector: sector.map(str::to_string),
            description: Some("  ".into()),
            contact_email: email.into(),
            phone: None,
            website: Some("https://acme.mx".into()),
        }
    }

    #[test]
    fn test_validate_accepts_known_sector_case_insensitively() {
        let reg = request(Some("Technology"), "rh@acme.mx").validate().unwrap();
        assert_eq!(reg.sector.as_deref(), Some("technology"));
        assert_eq!(reg.description, None);
    }

    #[test]
    fn test_validate_rejects_unknown_sector() {
        assert!(request(Some("mining"), "rh@acme.mx").validate().is_err());
    }

    #[test]
    fn test_validate_requires_email() {
        assert!(request(None, "").validate().is_err());
        assert!(request(None, "not-an-email").validate().is_err());
    }

    #[test]
    fn test_validate_requires_name() {
        let mut req = request(None, "rh@acme.mx");
        req.name = " ".into();
        assert!(req.validate().is_err());
    }

    #[tokio::test]
    async fn test_insert_creates_active_company() {
        let pool = test_pool().await;
        let reg = request(None, "rh@acme.mx").validate().unwrap();
        let row = insert_company(&pool, &reg).await.unwrap();
        assert!(row.active);
        assert_eq!(list_companies(&pool).await.unwrap().len(), 1);
    }
}
