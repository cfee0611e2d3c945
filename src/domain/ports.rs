use crate::domain::model::Company;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 公司紀錄的持久化後端
///
/// registry 在每次成功新增後以完整快照呼叫 `persist`，
/// 啟動時以 `load` 還原。
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Company>>;
    async fn persist(&self, companies: &[Company]) -> Result<()>;

    fn describe(&self) -> String;
}

/// registry 需要的設定值
pub trait RegistrySettings: Send + Sync {
    fn case_insensitive_names(&self) -> bool;
    fn max_name_length(&self) -> usize;
    fn max_notes_length(&self) -> usize;
}
