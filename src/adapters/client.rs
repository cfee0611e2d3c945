use crate::domain::model::{Company, CompanyInput};
use crate::utils::error::{CoronaError, Result, ValidationErrors};
use crate::utils::validation::validate_url;
use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;

/// companies API 的 HTTP client
#[derive(Debug, Clone)]
pub struct CompaniesClient {
    base_url: String,
    client: Client,
}

impl CompaniesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        validate_url("base_url", base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        })
    }

    fn companies_url(&self) -> String {
        format!("{}/companies/", self.base_url)
    }

    pub async fn list(&self) -> Result<Vec<Company>> {
        tracing::debug!("Making API request to: {}", self.companies_url());
        let response = self
            .client
            .get(self.companies_url())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// 400 回應會轉成 `CoronaError::Validation`，保留各欄位錯誤
    pub async fn create(&self, input: &CompanyInput) -> Result<Company> {
        let response = self
            .client
            .post(self.companies_url())
            .json(input)
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        if response.status() == StatusCode::BAD_REQUEST {
            let body: BTreeMap<String, serde_json::Value> = response.json().await?;
            return Err(CoronaError::Validation(field_errors(body)));
        }

        let response = response.error_for_status()?;
        Ok(response.json().await?)
    }
}

/// `{"name": ["..."]}` 或 `{"detail": "..."}` 皆轉為欄位錯誤
fn field_errors(body: BTreeMap<String, serde_json::Value>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for (field, value) in body {
        match value {
            serde_json::Value::Array(messages) => {
                for message in messages {
                    match message {
                        serde_json::Value::String(s) => errors.add(&field, s),
                        other => errors.add(&field, other.to_string()),
                    }
                }
            }
            serde_json::Value::String(s) => errors.add(&field, s),
            other => errors.add(&field, other.to_string()),
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(CompaniesClient::new("localhost:8000").is_err());
        assert!(CompaniesClient::new("http://localhost:8000/").is_ok());
    }

    #[test]
    fn test_field_errors_from_detail() {
        let mut body = BTreeMap::new();
        body.insert("detail".to_string(), serde_json::json!("Not found."));
        body.insert("name".to_string(), serde_json::json!(["a", "b"]));

        let errors = field_errors(body);
        assert_eq!(errors.messages("detail"), ["Not found."]);
        assert_eq!(errors.messages("name"), ["a", "b"]);
    }
}
