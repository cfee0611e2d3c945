use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanyStatus {
    #[serde(rename = "Layoffs")]
    Layoffs,
    #[serde(rename = "Hiring Freeze")]
    HiringFreeze,
    #[default]
    #[serde(rename = "Hiring")]
    Hiring,
}

impl CompanyStatus {
    pub const ALL: [CompanyStatus; 3] = [
        CompanyStatus::Layoffs,
        CompanyStatus::HiringFreeze,
        CompanyStatus::Hiring,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Layoffs => "Layoffs",
            CompanyStatus::HiringFreeze => "Hiring Freeze",
            CompanyStatus::Hiring => "Hiring",
        }
    }

    pub fn choices() -> [&'static str; 3] {
        Self::ALL.map(|status| status.as_str())
    }

    /// 完全相符才算（區分大小寫）
    pub fn from_choice(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已儲存的公司紀錄，也是 API 回應的 JSON 形狀
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub status: CompanyStatus,
    pub application_link: String,
    pub notes: String,
    pub last_update: DateTime<Utc>,
}

/// 建立公司時的原始輸入；所有欄位皆可能缺少，驗證交給 registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CompanyInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_application_link(mut self, link: impl Into<String>) -> Self {
        self.application_link = Some(link.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
