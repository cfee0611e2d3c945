use crate::adapters::storage::MemoryStore;
use crate::domain::model::{Company, CompanyInput, CompanyStatus};
use crate::domain::ports::{CompanyStore, RegistrySettings};
use crate::utils::error::{CoronaError, Result, ValidationErrors};
use crate::utils::logger::CORONA_LOGS;
use crate::utils::validation::{check_choice, check_max_length, check_optional_url, check_required};
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::Mutex;

pub const DUPLICATE_NAME_MESSAGE: &str = "company with this name already exists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryRules {
    pub case_insensitive_names: bool,
    pub max_name_length: usize,
    pub max_notes_length: usize,
}

impl Default for RegistryRules {
    fn default() -> Self {
        Self {
            case_insensitive_names: false,
            max_name_length: 30,
            max_notes_length: 100,
        }
    }
}

impl RegistryRules {
    pub fn from_settings<S: RegistrySettings + ?Sized>(settings: &S) -> Self {
        Self {
            case_insensitive_names: settings.case_insensitive_names(),
            max_name_length: settings.max_name_length(),
            max_notes_length: settings.max_notes_length(),
        }
    }

    /// 唯一性索引使用的鍵
    fn name_key(&self, name: &str) -> String {
        if self.case_insensitive_names {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug)]
struct RegistryState {
    companies: Vec<Company>,
    names: HashSet<String>,
    next_id: u64,
}

impl RegistryState {
    fn empty() -> Self {
        Self {
            companies: Vec::new(),
            names: HashSet::new(),
            next_id: 1,
        }
    }
}

/// 通過驗證、尚未配發 id 的紀錄
struct ValidCompany {
    name: String,
    name_key: String,
    status: CompanyStatus,
    application_link: String,
    notes: String,
}

/// 公司紀錄集合
///
/// 所有紀錄、名稱索引與 id 計數器由同一把鎖保護；
/// 一次 `create` 的唯一性檢查、寫入與持久化都在鎖內完成。
pub struct CompanyRegistry {
    state: Mutex<RegistryState>,
    store: Box<dyn CompanyStore>,
    rules: RegistryRules,
}

impl CompanyRegistry {
    pub fn new(store: Box<dyn CompanyStore>, rules: RegistryRules) -> Self {
        Self {
            state: Mutex::new(RegistryState::empty()),
            store,
            rules,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), RegistryRules::default())
    }

    /// 建立 registry 並從 store 載入既有紀錄
    pub async fn open(store: Box<dyn CompanyStore>, rules: RegistryRules) -> Result<Self> {
        let companies = store.load().await?;
        let mut state = RegistryState::empty();

        let mut ids = HashSet::new();
        for company in companies {
            if !ids.insert(company.id) {
                return Err(CoronaError::ConfigError {
                    message: format!(
                        "{} contains duplicate company id {}",
                        store.describe(),
                        company.id
                    ),
                });
            }
            let key = rules.name_key(&company.name);
            if !state.names.insert(key) {
                return Err(CoronaError::ConfigError {
                    message: format!(
                        "{} contains duplicate company name '{}'",
                        store.describe(),
                        company.name
                    ),
                });
            }
            let after = company.id.checked_add(1).ok_or_else(|| CoronaError::ConfigError {
                message: format!(
                    "{} contains company id {} with no room for further ids",
                    store.describe(),
                    company.id
                ),
            })?;
            state.next_id = state.next_id.max(after);
            state.companies.push(company);
        }

        tracing::info!(
            "📂 Loaded {} companies from {}",
            state.companies.len(),
            store.describe()
        );

        Ok(Self {
            state: Mutex::new(state),
            store,
            rules,
        })
    }

    pub fn rules(&self) -> RegistryRules {
        self.rules
    }

    pub async fn list(&self) -> Vec<Company> {
        self.state.lock().await.companies.clone()
    }

    pub async fn get(&self, id: u64) -> Option<Company> {
        let state = self.state.lock().await;
        state.companies.iter().find(|c| c.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.companies.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn create(&self, input: CompanyInput) -> Result<Company> {
        let mut state = self.state.lock().await;
        let valid = self.validate(&input, &state.names)?;

        let company = Company {
            id: state.next_id,
            name: valid.name,
            status: valid.status,
            application_link: valid.application_link,
            notes: valid.notes,
            last_update: Utc::now(),
        };

        state.companies.push(company.clone());
        if let Err(e) = self.store.persist(&state.companies).await {
            state.companies.pop();
            tracing::error!(
                "❌ Failed to persist company '{}' to {}: {}",
                company.name,
                self.store.describe(),
                e
            );
            return Err(e);
        }
        state.names.insert(valid.name_key);
        state.next_id += 1;

        tracing::info!(
            target: CORONA_LOGS,
            id = company.id,
            name = %company.name,
            status = %company.status,
            "Company created"
        );

        Ok(company)
    }

    /// 清除所有紀錄並讓 id 從 1 重新開始
    pub async fn reset(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.store.persist(&[]).await?;
        *state = RegistryState::empty();
        tracing::debug!("Registry reset");
        Ok(())
    }

    fn validate(&self, input: &CompanyInput, names: &HashSet<String>) -> Result<ValidCompany> {
        let mut errors = ValidationErrors::new();

        let name = check_required(&mut errors, "name", input.name.as_deref());
        if let Some(name) = name {
            check_max_length(&mut errors, "name", name, self.rules.max_name_length);
            if names.contains(&self.rules.name_key(name)) {
                errors.add("name", DUPLICATE_NAME_MESSAGE);
            }
        }

        let status = match input.status.as_deref() {
            Some(value) => check_choice(&mut errors, "status", value, &CompanyStatus::choices())
                .and_then(CompanyStatus::from_choice),
            None => Some(CompanyStatus::default()),
        };

        let application_link = input.application_link.as_deref().unwrap_or("").trim();
        check_optional_url(&mut errors, "application_link", application_link);

        let notes = input.notes.as_deref().unwrap_or("").trim();
        check_max_length(&mut errors, "notes", notes, self.rules.max_notes_length);

        if !errors.is_empty() {
            tracing::debug!("Rejected company input: {}", errors);
        }

        // name 或 status 缺少時 errors 必定已有對應欄位
        let (Some(name), Some(status)) = (name, status) else {
            return Err(CoronaError::Validation(errors));
        };
        errors.into_result()?;

        Ok(ValidCompany {
            name: name.to_string(),
            name_key: self.rules.name_key(name),
            status,
            application_link: application_link.to_string(),
            notes: notes.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::REQUIRED_MESSAGE;
    use async_trait::async_trait;
    use std::sync::Arc;

    fn field_messages(err: &CoronaError, field: &str) -> Vec<String> {
        err.validation_errors()
            .map(|e| e.messages(field).to_vec())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_empty_registry_lists_nothing() {
        let registry = CompanyRegistry::in_memory();
        assert!(registry.list().await.is_empty());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_with_name_only_applies_defaults() {
        let registry = CompanyRegistry::in_memory();
        let company = registry.create(CompanyInput::named("Amazon")).await.unwrap();

        assert_eq!(company.id, 1);
        assert_eq!(company.name, "Amazon");
        assert_eq!(company.status, CompanyStatus::Hiring);
        assert_eq!(company.application_link, "");
        assert_eq!(company.notes, "");

        let listed = registry.list().await;
        assert_eq!(listed, vec![company]);
    }

    #[tokio::test]
    async fn test_create_with_layoffs_status() {
        let registry = CompanyRegistry::in_memory();
        let company = registry
            .create(CompanyInput::named("A Layoffs Company").with_status("Layoffs"))
            .await
            .unwrap();
        assert_eq!(company.status, CompanyStatus::Layoffs);
    }

    #[tokio::test]
    async fn test_missing_or_blank_name_is_required() {
        let registry = CompanyRegistry::in_memory();

        let err = registry.create(CompanyInput::default()).await.unwrap_err();
        assert_eq!(field_messages(&err, "name"), vec![REQUIRED_MESSAGE]);

        let err = registry.create(CompanyInput::named("  ")).await.unwrap_err();
        assert_eq!(field_messages(&err, "name"), vec![REQUIRED_MESSAGE]);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let registry = CompanyRegistry::in_memory();
        registry.create(CompanyInput::named("Microsoft")).await.unwrap();

        let err = registry.create(CompanyInput::named("Microsoft")).await.unwrap_err();
        assert_eq!(field_messages(&err, "name"), vec![DUPLICATE_NAME_MESSAGE]);
        assert_eq!(registry.len().await, 1);

        // 預設區分大小寫
        registry.create(CompanyInput::named("microsoft")).await.unwrap();
        assert_eq!(registry.len().await, 2);
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_collides_with_trimmed_name() {
        let registry = CompanyRegistry::in_memory();
        registry.create(CompanyInput::named("Microsoft")).await.unwrap();

        let err = registry.create(CompanyInput::named("Microsoft ")).await.unwrap_err();
        assert_eq!(field_messages(&err, "name"), vec![DUPLICATE_NAME_MESSAGE]);

        let err = registry.create(CompanyInput::named("  Microsoft")).await.unwrap_err();
        assert_eq!(field_messages(&err, "name"), vec![DUPLICATE_NAME_MESSAGE]);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_case_insensitive_names() {
        let rules = RegistryRules {
            case_insensitive_names: true,
            ..RegistryRules::default()
        };
        let registry = CompanyRegistry::new(Box::new(MemoryStore::new()), rules);
        registry.create(CompanyInput::named("Amazon")).await.unwrap();

        let err = registry.create(CompanyInput::named("amazon")).await.unwrap_err();
        assert_eq!(field_messages(&err, "name"), vec![DUPLICATE_NAME_MESSAGE]);
    }

    #[tokio::test]
    async fn test_invalid_status_and_link_reported_together() {
        let registry = CompanyRegistry::in_memory();
        let err = registry
            .create(
                CompanyInput::named("Invalid Status Company")
                    .with_status("invalid")
                    .with_application_link("nope"),
            )
            .await
            .unwrap_err();

        assert_eq!(
            field_messages(&err, "status"),
            vec!["\"invalid\" is not a valid choice."]
        );
        assert_eq!(field_messages(&err, "application_link"), vec!["Enter a valid URL."]);
        assert!(field_messages(&err, "name").is_empty());
    }

    #[tokio::test]
    async fn test_length_limits() {
        let registry = CompanyRegistry::in_memory();
        let err = registry
            .create(CompanyInput::named("x".repeat(31)).with_notes("n".repeat(101)))
            .await
            .unwrap_err();

        assert_eq!(
            field_messages(&err, "name"),
            vec!["Ensure this field has no more than 30 characters."]
        );
        assert_eq!(
            field_messages(&err, "notes"),
            vec!["Ensure this field has no more than 100 characters."]
        );
    }

    #[tokio::test]
    async fn test_length_limits_are_inclusive() {
        let registry = CompanyRegistry::in_memory();
        let company = registry
            .create(CompanyInput::named("x".repeat(30)).with_notes("n".repeat(100)))
            .await
            .unwrap();

        assert_eq!(company.name.chars().count(), 30);
        assert_eq!(company.notes.chars().count(), 100);
    }

    #[tokio::test]
    async fn test_empty_status_is_invalid_choice() {
        let registry = CompanyRegistry::in_memory();
        let err = registry
            .create(CompanyInput::named("Blank Status").with_status(""))
            .await
            .unwrap_err();

        assert_eq!(field_messages(&err, "status"), vec!["\"\" is not a valid choice."]);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_null_status_falls_back_to_default() {
        let registry = CompanyRegistry::in_memory();
        let input: CompanyInput =
            serde_json::from_str(r#"{"name": "Null Status", "status": null}"#).unwrap();

        let company = registry.create(input).await.unwrap();
        assert_eq!(company.status, CompanyStatus::Hiring);
    }

    #[tokio::test]
    async fn test_reset_restarts_ids() {
        let registry = CompanyRegistry::in_memory();
        registry.create(CompanyInput::named("Amazon")).await.unwrap();
        registry.create(CompanyInput::named("Google")).await.unwrap();
        assert_eq!(registry.get(2).await.unwrap().name, "Google");

        registry.reset().await.unwrap();
        assert!(registry.is_empty().await);
        assert!(registry.get(2).await.is_none());

        let company = registry.create(CompanyInput::named("Amazon")).await.unwrap();
        assert_eq!(company.id, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_keep_names_unique() {
        let registry = Arc::new(CompanyRegistry::in_memory());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.create(CompanyInput::named("Netflix")).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(registry.len().await, 1);
    }

    struct FailingStore;

    #[async_trait]
    impl CompanyStore for FailingStore {
        async fn load(&self) -> Result<Vec<Company>> {
            Ok(Vec::new())
        }

        async fn persist(&self, _companies: &[Company]) -> Result<()> {
            Err(CoronaError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn describe(&self) -> String {
            "failing store".to_string()
        }
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back() {
        let registry = CompanyRegistry::new(Box::new(FailingStore), RegistryRules::default());

        let err = registry.create(CompanyInput::named("Amazon")).await.unwrap_err();
        assert!(matches!(err, CoronaError::IoError(_)));
        assert!(registry.is_empty().await);
    }
}
