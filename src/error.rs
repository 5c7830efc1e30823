use crate::employee::{EmployeeError, Position};
use crate::project::{ProjectError, ProjectPhase};
use crate::task::TaskType;
use thiserror::Error;

/// Coarse classification of [`AssignmentError`] for callers that only need to
/// branch on the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    StateConflict,
    Capacity,
    Budget,
    Mismatch,
    InvalidInput,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignmentError {
    #[error("employee {0} not found")]
    EmployeeNotFound(i32),
    #[error("project {0} not found")]
    ProjectNotFound(i32),
    #[error("task {task_id} not found in project {project_id}")]
    TaskNotFound { project_id: i32, task_id: i32 },
    #[error("an employee with id {0} already exists")]
    DuplicateEmployee(i32),
    #[error("a project with id {0} already exists")]
    DuplicateProject(i32),

    #[error("employee {employee_id} ({name}) is inactive")]
    InactiveEmployee { employee_id: i32, name: String },
    #[error("employee {0} is already active")]
    EmployeeAlreadyActive(i32),
    #[error("project {project_id} ({name}) is completed")]
    ProjectCompleted { project_id: i32, name: String },
    #[error("project {0} has no tasks")]
    NoTasks(i32),
    #[error(
        "task {task_id} is already fully allocated ({allocated}h of {estimated}h estimated)"
    )]
    TaskFullyAllocated {
        task_id: i32,
        estimated: i32,
        allocated: i32,
    },

    #[error("requested hours must be between {min} and {max} (got {requested})")]
    InvalidHours { requested: i32, min: i32, max: i32 },
    #[error("requested {requested}h exceed the {estimated}h estimate of task {task_id}")]
    ExceedsTaskEstimate {
        task_id: i32,
        requested: i32,
        estimated: i32,
    },
    #[error("scale factor must be a positive finite number (got {0})")]
    InvalidScaleFactor(f64),

    #[error("employee {employee_id} is a {position}, project phase {phase} requires {required}")]
    RoleMismatch {
        employee_id: i32,
        position: Position,
        phase: ProjectPhase,
        required: Position,
    },
    #[error("task {task_id} of type {task_type} cannot be done by a {position}")]
    TaskTypeMismatch {
        task_id: i32,
        task_type: TaskType,
        position: Position,
    },

    #[error(
        "employee {employee_id} lacks capacity: capacity {capacity}h, used {used}h, available {available}h, requested {requested}h"
    )]
    CapacityExceeded {
        employee_id: i32,
        capacity: i32,
        used: i32,
        available: i32,
        requested: i32,
    },

    #[error("employee {employee_id} salary {salary:.2} exceeds project budget {budget:.2}")]
    SalaryExceedsBudget {
        employee_id: i32,
        salary: f64,
        budget: f64,
    },
    #[error(
        "employee {employee_id} hourly rate {hourly_rate:.2} exceeds the affordable {ceiling:.2}/h (budget {budget:.2} over {estimated_hours}h)"
    )]
    RateExceedsCeiling {
        employee_id: i32,
        hourly_rate: f64,
        ceiling: f64,
        budget: f64,
        estimated_hours: i32,
    },
    #[error(
        "project {project_id} budget exceeded: budget {budget:.2}, current costs {current_costs:.2}, additional {additional_cost:.2}, remaining {remaining:.2}"
    )]
    BudgetExceeded {
        project_id: i32,
        budget: f64,
        current_costs: f64,
        additional_cost: f64,
        remaining: f64,
    },

    #[error(transparent)]
    Employee(#[from] EmployeeError),
    #[error(transparent)]
    Project(#[from] ProjectError),
}

impl AssignmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssignmentError::EmployeeNotFound(_)
            | AssignmentError::ProjectNotFound(_)
            | AssignmentError::TaskNotFound { .. } => ErrorKind::NotFound,
            AssignmentError::InactiveEmployee { .. }
            | AssignmentError::EmployeeAlreadyActive(_)
            | AssignmentError::ProjectCompleted { .. }
            | AssignmentError::NoTasks(_)
            | AssignmentError::TaskFullyAllocated { .. } => ErrorKind::StateConflict,
            AssignmentError::CapacityExceeded { .. } => ErrorKind::Capacity,
            AssignmentError::SalaryExceedsBudget { .. }
            | AssignmentError::RateExceedsCeiling { .. }
            | AssignmentError::BudgetExceeded { .. } => ErrorKind::Budget,
            AssignmentError::RoleMismatch { .. } | AssignmentError::TaskTypeMismatch { .. } => {
                ErrorKind::Mismatch
            }
            AssignmentError::DuplicateEmployee(_)
            | AssignmentError::DuplicateProject(_)
            | AssignmentError::InvalidHours { .. }
            | AssignmentError::ExceedsTaskEstimate { .. }
            | AssignmentError::InvalidScaleFactor(_) => ErrorKind::InvalidInput,
            AssignmentError::Employee(err) => match err {
                EmployeeError::CapacityExceeded { .. } | EmployeeError::HoursUnderflow { .. } => {
                    ErrorKind::Capacity
                }
                EmployeeError::ActiveHoursRemaining { .. } => ErrorKind::StateConflict,
                _ => ErrorKind::InvalidInput,
            },
            AssignmentError::Project(err) => match err {
                ProjectError::BackwardPhaseTransition { .. } => ErrorKind::StateConflict,
                _ => ErrorKind::InvalidInput,
            },
        }
    }
}

pub type AssignmentResult<T> = Result<T, AssignmentError>;
