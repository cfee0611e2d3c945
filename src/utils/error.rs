use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// 欄位名稱 -> 錯誤訊息列表，序列化後即為 400 回應本體
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// 沒有任何錯誤時回傳 Ok
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoronaError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum CoronaError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Unsupported media type \"{content_type}\" in request.")]
    UnsupportedMediaType { content_type: String },

    #[error("Not found.")]
    NotFound,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

impl CoronaError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            CoronaError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CoronaError::IoError(_) => "無法讀寫資料檔案，請確認路徑與權限".to_string(),
            CoronaError::ConfigError { .. }
            | CoronaError::MissingConfigError { .. }
            | CoronaError::InvalidConfigValueError { .. }
            | CoronaError::ConfigValidationError { .. } => format!("配置錯誤: {}", self),
            CoronaError::ApiError(_) => "無法連線到 companies API".to_string(),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoronaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_serialize_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "This field is required.");
        errors.add("status", "\"x\" is not a valid choice.");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": ["This field is required."],
                "status": ["\"x\" is not a valid choice."]
            })
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("name", "bad");
        let err = errors.into_result().unwrap_err();
        assert_eq!(err.validation_errors().unwrap().messages("name"), ["bad"]);
    }
}
