use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Modality {
    OnSite,
    Remote,
    Hybrid,
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_site" => Ok(Modality::OnSite),
            "remote" => Ok(Modality::Remote),
            "hybrid" => Ok(Modality::Hybrid),
            other => Err(format!(
                "Unknown modality '{other}' (expected on_site, remote or hybrid)"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOfferRow {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub salary_offered: Option<String>,
    pub modality: Modality,
    pub location: Option<String>,
    pub published_at: NaiveDateTime,
    pub expires_on: Option<NaiveDate>,
    pub active: bool,
}

/// Offer joined with the publishing company's public details.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobOfferListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub offer: JobOfferRow,
    pub company_name: String,
    pub company_sector: Option<String>,
    pub contact_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modality_parses_wire_names() {
        assert_eq!("on_site".parse::<Modality>().unwrap(), Modality::OnSite);
        assert_eq!("remote".parse::<Modality>().unwrap(), Modality::Remote);
        assert_eq!("hybrid".parse::<Modality>().unwrap(), Modality::Hybrid);
    }

    #[test]
    fn test_modality_rejects_spanish_labels() {
        assert!("presencial".parse::<Modality>().is_err());
    }
}
