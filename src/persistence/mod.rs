use crate::error::AssignmentError;
use crate::validation::ValidationError;
use crate::Company;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(#[from] ValidationError),
    #[error("could not rebuild company: {0}")]
    Rebuild(#[from] AssignmentError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Somewhere a whole company can be written to and read back from.
pub trait CompanyStore {
    fn save_company(&self, company: &Company) -> PersistenceResult<()>;
    fn load_company(&self) -> PersistenceResult<Option<Company>>;
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    CompanySnapshot, JsonCompanyStore, export_ledger_to_csv, import_ledger_from_csv,
    load_company_from_json, save_company_to_json,
};
