use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum StudyType {
    Masters,
    Doctorate,
    Specialty,
    Diploma,
    Other,
}

impl FromStr for StudyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "masters" => Ok(StudyType::Masters),
            "doctorate" => Ok(StudyType::Doctorate),
            "specialty" => Ok(StudyType::Specialty),
            "diploma" => Ok(StudyType::Diploma),
            "other" => Ok(StudyType::Other),
            other => Err(format!(
                "Unknown study type '{other}' (expected masters, doctorate, specialty, diploma or other)"
            )),
        }
    }
}

/// Point-in-time snapshot of a graduate's studies. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AcademicStatusRow {
    pub id: i64,
    pub enrollment_id: String,
    pub currently_studying: bool,
    pub institution: Option<String>,
    pub study_type: Option<StudyType>,
    pub program_name: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub expected_end_on: Option<NaiveDate>,
    pub updated_at: NaiveDateTime,
}

/// Point-in-time snapshot of a graduate's employment. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmploymentStatusRow {
    pub id: i64,
    pub enrollment_id: String,
    pub currently_employed: bool,
    pub company: Option<String>,
    pub position: Option<String>,
    pub sector: Option<String>,
    pub salary_range: Option<String>,
    pub years_experience: Option<i64>,
    pub started_on: Option<NaiveDate>,
    pub related_to_degree: Option<bool>,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_type_parse() {
        assert_eq!("masters".parse::<StudyType>().unwrap(), StudyType::Masters);
        assert_eq!("diploma".parse::<StudyType>().unwrap(), StudyType::Diploma);
        assert!("maestria".parse::<StudyType>().is_err());
    }
}
