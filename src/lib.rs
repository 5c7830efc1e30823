pub mod company;
pub mod config;
pub mod cost;
pub mod employee;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod metadata;
pub mod persistence;
pub mod project;
pub mod rules;
pub mod statistics;
pub mod task;
pub mod validation;

pub use company::Company;
pub use config::{AppConfig, ConfigError};
pub use employee::{Employee, EmployeeError, EmployeeKind, Position};
pub use engine::{AutoAssignSummary, MAX_ASSIGNMENT_HOURS, MIN_ASSIGNMENT_HOURS};
pub use error::{AssignmentError, AssignmentResult, ErrorKind};
pub use ledger::{AssignmentKey, AssignmentLedger, AssignmentRecord};
pub use metadata::CompanyProfile;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteCompanyStore;
pub use persistence::{
    CompanyStore, PersistenceError, PersistenceResult, export_ledger_to_csv,
    import_ledger_from_csv, load_company_from_json, save_company_to_json,
};
pub use project::{Project, ProjectError, ProjectPhase, ProjectUpdate};
pub use statistics::CompanyStatistics;
pub use task::{Task, TaskError, TaskPhase, TaskType};
pub use validation::{ValidationError, validate_company};
