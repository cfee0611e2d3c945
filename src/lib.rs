pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::ServiceConfig;

pub use crate::adapters::client::CompaniesClient;
pub use crate::adapters::storage::{JsonFileStore, MemoryStore};
pub use crate::core::registry::{CompanyRegistry, RegistryRules};
pub use crate::core::server::{open_registry, CompanyServer};
pub use crate::domain::model::{Company, CompanyInput, CompanyStatus};
pub use crate::utils::error::{CoronaError, Result, ValidationErrors};
