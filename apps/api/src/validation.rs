//! Field checks shared by the request handlers.

use crate::errors::AppError;

/// Returns the trimmed value, or a validation error naming `field` when blank.
pub fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Like [`required`] for fields that are optional in the payload but mandatory in context.
pub fn required_opt<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    required(field, value.unwrap_or_default())
}

/// Blank strings become `None`; everything else is trimmed.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn email(field: &str, value: &str) -> Result<(), AppError> {
    let (local, domain) = value
        .split_once('@')
        .ok_or_else(|| AppError::validation(format!("{field} must be an email address")))?;
    if local.is_empty() || domain.is_empty() {
        return Err(AppError::validation(format!(
            "{field} must be an email address"
        )));
    }
    Ok(())
}

pub fn grade_average(value: Option<f64>) -> Result<(), AppError> {
    match value {
        Some(v) if !(0.0..=10.0).contains(&v) => Err(AppError::validation(
            "grade_average must be between 0.0 and 10.0",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Ana ").unwrap(), "Ana");
    }

    #[test]
    fn test_required_blank_names_field() {
        let err = required("first_name", "   ").unwrap_err();
        assert!(err.to_string().contains("first_name is required"));
    }

    #[test]
    fn test_required_opt_none() {
        assert!(required_opt("institution", None).is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" x ".into())), Some("x".into()));
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_email() {
        assert!(email("contact_email", "rh@acme.mx").is_ok());
        assert!(email("contact_email", "acme.mx").is_err());
        assert!(email("contact_email", "@acme.mx").is_err());
    }

    #[test]
    fn test_grade_average_bounds() {
        assert!(grade_average(Some(10.0)).is_ok());
        assert!(grade_average(Some(0.0)).is_ok());
        assert!(grade_average(None).is_ok());
        assert!(grade_average(Some(10.1)).is_err());
        assert!(grade_average(Some(-1.0)).is_err());
    }
}
