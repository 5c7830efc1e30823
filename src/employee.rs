use crate::cost;
use crate::engine::MAX_ASSIGNMENT_HOURS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Weekly hours of a full-time (rate 1.0) employee.
pub const BASE_WEEKLY_CAPACITY: i32 = 40;

const MANAGER_SALARY_MULTIPLIER: f64 = 0.25;
const DEVELOPER_SALARY_MULTIPLIER: f64 = 0.20;
const DEVELOPER_EXPERIENCE_BONUS: f64 = 500.0;
const DESIGNER_SALARY_MULTIPLIER: f64 = 0.15;
const DESIGNER_PROJECT_BONUS: f64 = 800.0;
const QA_SALARY_MULTIPLIER: f64 = 0.10;
const QA_BUG_BONUS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmployeeError {
    #[error("employee name cannot be empty")]
    EmptyName,
    #[error("salary cannot be negative (got {0})")]
    NegativeSalary(f64),
    #[error("employment rate must be in (0, 1] (got {0})")]
    InvalidEmploymentRate(f64),
    #[error("invalid {kind} attribute: {message}")]
    InvalidKind { kind: Position, message: String },
    #[error("base weekly capacity must be between 0 and 168h (got {0})")]
    InvalidBaseCapacity(i32),
    #[error("unknown position '{0}'")]
    UnknownPosition(String),
    #[error("cannot add or remove negative hours ({0})")]
    NegativeHours(i32),
    #[error(
        "employee {employee_id} cannot take {requested}h: capacity {capacity}h, available {available}h"
    )]
    CapacityExceeded {
        employee_id: i32,
        requested: i32,
        available: i32,
        capacity: i32,
    },
    #[error("employee {employee_id} cannot release {requested}h, only {current}h are in use")]
    HoursUnderflow {
        employee_id: i32,
        requested: i32,
        current: i32,
    },
    #[error("employee {employee_id} still has {hours}h/week assigned and cannot be deactivated")]
    ActiveHoursRemaining { employee_id: i32, hours: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Manager,
    Developer,
    Designer,
    #[serde(rename = "QA")]
    Qa,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Manager => "Manager",
            Position::Developer => "Developer",
            Position::Designer => "Designer",
            Position::Qa => "QA",
        }
    }

    pub fn all() -> [Position; 4] {
        [
            Position::Manager,
            Position::Developer,
            Position::Designer,
            Position::Qa,
        ]
    }
}

impl FromStr for Position {
    type Err = EmployeeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "manager" => Ok(Position::Manager),
            "developer" => Ok(Position::Developer),
            "designer" => Ok(Position::Designer),
            "qa" => Ok(Position::Qa),
            _ => Err(EmployeeError::UnknownPosition(value.to_string())),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-specific data. The variant fixes the employee's [`Position`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "position")]
pub enum EmployeeKind {
    Manager {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        managed_project_id: Option<i32>,
    },
    Developer {
        programming_language: String,
        years_of_experience: f64,
    },
    Designer {
        design_tool: String,
        number_of_projects: i32,
    },
    #[serde(rename = "QA")]
    Qa {
        testing_type: String,
        bugs_found: i32,
    },
}

impl EmployeeKind {
    pub fn position(&self) -> Position {
        match self {
            EmployeeKind::Manager { .. } => Position::Manager,
            EmployeeKind::Developer { .. } => Position::Developer,
            EmployeeKind::Designer { .. } => Position::Designer,
            EmployeeKind::Qa { .. } => Position::Qa,
        }
    }

    /// Kind with neutral attributes, used when only the position is known.
    pub fn default_for(position: Position) -> Self {
        match position {
            Position::Manager => EmployeeKind::Manager {
                managed_project_id: None,
            },
            Position::Developer => EmployeeKind::Developer {
                programming_language: String::new(),
                years_of_experience: 0.0,
            },
            Position::Designer => EmployeeKind::Designer {
                design_tool: String::new(),
                number_of_projects: 0,
            },
            Position::Qa => EmployeeKind::Qa {
                testing_type: String::new(),
                bugs_found: 0,
            },
        }
    }

    pub fn bonus(&self, salary: f64) -> f64 {
        match self {
            EmployeeKind::Manager { .. } => salary * MANAGER_SALARY_MULTIPLIER,
            EmployeeKind::Developer {
                years_of_experience,
                ..
            } => {
                salary * DEVELOPER_SALARY_MULTIPLIER
                    + years_of_experience * DEVELOPER_EXPERIENCE_BONUS
            }
            EmployeeKind::Designer {
                number_of_projects,
                ..
            } => {
                salary * DESIGNER_SALARY_MULTIPLIER
                    + f64::from(*number_of_projects) * DESIGNER_PROJECT_BONUS
            }
            EmployeeKind::Qa { bugs_found, .. } => {
                salary * QA_SALARY_MULTIPLIER + f64::from(*bugs_found) * QA_BUG_BONUS
            }
        }
    }

    fn validate(&self) -> Result<(), EmployeeError> {
        let invalid = |message: &str| EmployeeError::InvalidKind {
            kind: self.position(),
            message: message.to_string(),
        };
        match self {
            EmployeeKind::Manager { .. } => Ok(()),
            EmployeeKind::Developer {
                years_of_experience,
                ..
            } => {
                if !years_of_experience.is_finite() || *years_of_experience < 0.0 {
                    return Err(invalid("years of experience cannot be negative"));
                }
                Ok(())
            }
            EmployeeKind::Designer {
                number_of_projects,
                ..
            } => {
                if *number_of_projects < 0 {
                    return Err(invalid("number of projects cannot be negative"));
                }
                Ok(())
            }
            EmployeeKind::Qa { bugs_found, .. } => {
                if *bugs_found < 0 {
                    return Err(invalid("bugs found cannot be negative"));
                }
                Ok(())
            }
        }
    }

    fn details(&self) -> String {
        match self {
            EmployeeKind::Manager { managed_project_id } => match managed_project_id {
                Some(id) => format!("Managed project: {id}"),
                None => "Managed project: none".to_string(),
            },
            EmployeeKind::Developer {
                programming_language,
                years_of_experience,
            } => format!(
                "Language: {programming_language}, Experience: {years_of_experience} years"
            ),
            EmployeeKind::Designer {
                design_tool,
                number_of_projects,
            } => format!("Tool: {design_tool}, Projects: {number_of_projects}"),
            EmployeeKind::Qa {
                testing_type,
                bugs_found,
            } => format!("Testing type: {testing_type}, Bugs found: {bugs_found}"),
        }
    }
}

fn default_base_capacity() -> i32 {
    BASE_WEEKLY_CAPACITY
}

fn default_active() -> bool {
    true
}

fn capacity_for(base: i32, employment_rate: f64) -> i32 {
    (f64::from(base) * employment_rate).floor() as i32
}

/// A capacity-bounded worker.
///
/// `current_weekly_hours` is a cache of the company ledger and never exceeds
/// `weekly_hours_capacity`. Capacity is derived from the employment rate when
/// the record is built or its rate is edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    id: i32,
    name: String,
    salary: f64,
    department: String,
    employment_rate: f64,
    #[serde(default = "default_base_capacity")]
    base_weekly_capacity: i32,
    weekly_hours_capacity: i32,
    #[serde(default)]
    current_weekly_hours: i32,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    assigned_projects: Vec<i32>,
    #[serde(default)]
    project_history: Vec<i32>,
    kind: EmployeeKind,
}

impl Employee {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        salary: f64,
        department: impl Into<String>,
        kind: EmployeeKind,
        employment_rate: f64,
    ) -> Result<Self, EmployeeError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(EmployeeError::EmptyName);
        }
        if !salary.is_finite() || salary < 0.0 {
            return Err(EmployeeError::NegativeSalary(salary));
        }
        validate_rate(employment_rate)?;
        kind.validate()?;

        Ok(Self {
            id,
            name,
            salary,
            department: department.into(),
            employment_rate,
            base_weekly_capacity: BASE_WEEKLY_CAPACITY,
            weekly_hours_capacity: capacity_for(BASE_WEEKLY_CAPACITY, employment_rate),
            current_weekly_hours: 0,
            active: true,
            assigned_projects: Vec::new(),
            project_history: Vec::new(),
            kind,
        })
    }

    /// Overrides the 40h base used to derive capacity.
    pub fn with_base_capacity(mut self, base_weekly_capacity: i32) -> Self {
        self.base_weekly_capacity = base_weekly_capacity.clamp(0, MAX_ASSIGNMENT_HOURS);
        self.weekly_hours_capacity = capacity_for(self.base_weekly_capacity, self.employment_rate);
        self.current_weekly_hours = self.current_weekly_hours.min(self.weekly_hours_capacity);
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.kind.position()
    }

    pub fn employee_type(&self) -> &'static str {
        self.position().as_str()
    }

    pub fn kind(&self) -> &EmployeeKind {
        &self.kind
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub fn hourly_rate(&self) -> f64 {
        cost::hourly_rate(self.salary)
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn employment_rate(&self) -> f64 {
        self.employment_rate
    }

    pub fn base_weekly_capacity(&self) -> i32 {
        self.base_weekly_capacity
    }

    pub fn weekly_hours_capacity(&self) -> i32 {
        self.weekly_hours_capacity
    }

    pub fn current_weekly_hours(&self) -> i32 {
        self.current_weekly_hours
    }

    pub fn available_hours(&self) -> i32 {
        self.weekly_hours_capacity - self.current_weekly_hours
    }

    pub fn is_available(&self, hours: i32) -> bool {
        hours <= self.available_hours()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn assigned_projects(&self) -> &[i32] {
        &self.assigned_projects
    }

    pub fn project_history(&self) -> &[i32] {
        &self.project_history
    }

    pub fn is_assigned_to_project(&self, project_id: i32) -> bool {
        self.assigned_projects.contains(&project_id)
    }

    pub fn bonus(&self) -> f64 {
        self.kind.bonus(self.salary)
    }

    pub fn details(&self) -> String {
        format!(
            "ID: {}, Name: {}, Position: {}, Salary: {:.2}, Department: {}, Rate: {}, {}",
            self.id,
            self.name,
            self.position(),
            self.salary,
            self.department,
            self.employment_rate,
            self.kind.details()
        )
    }

    pub fn set_salary(&mut self, salary: f64) -> Result<(), EmployeeError> {
        if !salary.is_finite() || salary < 0.0 {
            return Err(EmployeeError::NegativeSalary(salary));
        }
        self.salary = salary;
        Ok(())
    }

    pub fn set_department(&mut self, department: impl Into<String>) {
        self.department = department.into();
    }

    /// Recomputes capacity from the new rate. Hours in use above the new
    /// capacity are clipped; the ledger is rescaled separately.
    pub fn set_employment_rate(&mut self, employment_rate: f64) -> Result<(), EmployeeError> {
        validate_rate(employment_rate)?;
        self.employment_rate = employment_rate;
        self.weekly_hours_capacity = capacity_for(self.base_weekly_capacity, employment_rate);
        self.current_weekly_hours = self.current_weekly_hours.min(self.weekly_hours_capacity);
        Ok(())
    }

    pub fn add_weekly_hours(&mut self, hours: i32) -> Result<(), EmployeeError> {
        if hours < 0 {
            return Err(EmployeeError::NegativeHours(hours));
        }
        if !self.is_available(hours) {
            return Err(EmployeeError::CapacityExceeded {
                employee_id: self.id,
                requested: hours,
                available: self.available_hours(),
                capacity: self.weekly_hours_capacity,
            });
        }
        self.current_weekly_hours += hours;
        Ok(())
    }

    pub fn remove_weekly_hours(&mut self, hours: i32) -> Result<(), EmployeeError> {
        if hours < 0 {
            return Err(EmployeeError::NegativeHours(hours));
        }
        if hours > self.current_weekly_hours {
            return Err(EmployeeError::HoursUnderflow {
                employee_id: self.id,
                requested: hours,
                current: self.current_weekly_hours,
            });
        }
        self.current_weekly_hours -= hours;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool) -> Result<(), EmployeeError> {
        if !active && self.current_weekly_hours > 0 {
            return Err(EmployeeError::ActiveHoursRemaining {
                employee_id: self.id,
                hours: self.current_weekly_hours,
            });
        }
        self.active = active;
        Ok(())
    }

    pub fn add_assigned_project(&mut self, project_id: i32) {
        if !self.assigned_projects.contains(&project_id) {
            self.assigned_projects.push(project_id);
        }
    }

    pub fn remove_assigned_project(&mut self, project_id: i32) {
        self.assigned_projects.retain(|&id| id != project_id);
    }

    pub fn add_to_project_history(&mut self, project_id: i32) {
        if !self.project_history.contains(&project_id) {
            self.project_history.push(project_id);
        }
    }

    /// Sets the cached hours directly, clipped to `[0, capacity]`.
    pub(crate) fn reset_weekly_hours(&mut self, hours: i32) {
        self.current_weekly_hours = hours.clamp(0, self.weekly_hours_capacity);
    }

    /// Drops every cache derived from the ledger so the ledger can be replayed.
    pub(crate) fn clear_derived_state(&mut self) {
        self.weekly_hours_capacity = capacity_for(self.base_weekly_capacity, self.employment_rate);
        self.current_weekly_hours = 0;
        self.assigned_projects.clear();
    }

    pub(crate) fn validate(&self) -> Result<(), EmployeeError> {
        if self.name.trim().is_empty() {
            return Err(EmployeeError::EmptyName);
        }
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(EmployeeError::NegativeSalary(self.salary));
        }
        validate_rate(self.employment_rate)?;
        if !(0..=MAX_ASSIGNMENT_HOURS).contains(&self.base_weekly_capacity) {
            return Err(EmployeeError::InvalidBaseCapacity(self.base_weekly_capacity));
        }
        self.kind.validate()
    }
}

fn validate_rate(employment_rate: f64) -> Result<(), EmployeeError> {
    if !employment_rate.is_finite() || employment_rate <= 0.0 || employment_rate > 1.0 {
        return Err(EmployeeError::InvalidEmploymentRate(employment_rate));
    }
    Ok(())
}
