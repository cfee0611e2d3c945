use crate::utils::error::{CoronaError, Result, ValidationErrors};
use url::Url;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_URL_MESSAGE: &str = "Enter a valid URL.";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn is_http_url(value: &str) -> std::result::Result<(), String> {
    match Url::parse(value) {
        Ok(url) => match url.scheme() {
            "http" | "https" if url.host_str().is_some() => Ok(()),
            "http" | "https" => Err("URL has no host".to_string()),
            scheme => Err(format!("Unsupported URL scheme: {}", scheme)),
        },
        Err(e) => Err(format!("Invalid URL format: {}", e)),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CoronaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    is_http_url(url_str).map_err(|reason| CoronaError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: url_str.to_string(),
        reason,
    })
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CoronaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CoronaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(CoronaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoronaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(CoronaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Allowed values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

// 以下為請求欄位驗證：錯誤累積到 ValidationErrors，而不是提早返回

/// 缺少或空白時記錄 required 錯誤，否則回傳去除前後空白後的值
pub fn check_required<'a>(
    errors: &mut ValidationErrors,
    field_name: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.add(field_name, REQUIRED_MESSAGE);
            None
        }
    }
}

pub fn check_max_length(errors: &mut ValidationErrors, field_name: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(
            field_name,
            format!("Ensure this field has no more than {} characters.", max),
        );
    }
}

pub fn check_choice<'a>(
    errors: &mut ValidationErrors,
    field_name: &str,
    value: &str,
    choices: &[&'a str],
) -> Option<&'a str> {
    match choices.iter().find(|choice| **choice == value) {
        Some(choice) => Some(*choice),
        None => {
            errors.add(field_name, format!("\"{}\" is not a valid choice.", value));
            None
        }
    }
}

/// 空字串視為未填
pub fn check_optional_url(errors: &mut ValidationErrors, field_name: &str, value: &str) {
    if !value.is_empty() && is_http_url(value).is_err() {
        errors.add(field_name, INVALID_URL_MESSAGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("base_url", "https://example.com").is_ok());
        assert!(validate_url("base_url", "http://127.0.0.1:8000").is_ok());
        assert!(validate_url("base_url", "").is_err());
        assert!(validate_url("base_url", "invalid-url").is_err());
        assert!(validate_url("base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("registry.max_name_length", 5, 1).is_ok());
        assert!(validate_positive_number("registry.max_name_length", 0, 1).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("storage.backend", "json", &["memory", "json"]).is_ok());
        assert!(validate_one_of("storage.backend", "sqlite", &["memory", "json"]).is_err());
    }

    #[test]
    fn test_check_required() {
        let mut errors = ValidationErrors::new();
        assert_eq!(check_required(&mut errors, "name", Some(" Amazon ")), Some("Amazon"));
        assert!(errors.is_empty());

        assert_eq!(check_required(&mut errors, "name", Some("   ")), None);
        assert_eq!(check_required(&mut errors, "name", None), None);
        assert_eq!(
            errors.messages("name"),
            [REQUIRED_MESSAGE, REQUIRED_MESSAGE]
        );
    }

    #[test]
    fn test_check_choice() {
        let mut errors = ValidationErrors::new();
        let choices = ["Hiring", "Layoffs"];
        assert_eq!(check_choice(&mut errors, "status", "Layoffs", &choices), Some("Layoffs"));
        assert_eq!(check_choice(&mut errors, "status", "hiring", &choices), None);
        assert_eq!(errors.messages("status"), ["\"hiring\" is not a valid choice."]);
    }

    #[test]
    fn test_check_optional_url_and_length() {
        let mut errors = ValidationErrors::new();
        check_optional_url(&mut errors, "application_link", "");
        check_optional_url(&mut errors, "application_link", "https://jobs.example.com/apply");
        assert!(errors.is_empty());

        check_optional_url(&mut errors, "application_link", "not a link");
        check_max_length(&mut errors, "notes", "abcdef", 5);
        assert_eq!(errors.messages("application_link"), [INVALID_URL_MESSAGE]);
        assert_eq!(
            errors.messages("notes"),
            ["Ensure this field has no more than 5 characters."]
        );
    }
}
