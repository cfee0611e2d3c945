pub mod registry;
pub mod server;

pub use crate::domain::model::{Company, CompanyInput, CompanyStatus};
pub use crate::domain::ports::{CompanyStore, RegistrySettings};
pub use crate::utils::error::Result;
