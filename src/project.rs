use crate::task::{Task, TaskError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectError {
    #[error("project name cannot be empty")]
    EmptyName,
    #[error("budget cannot be negative (got {0})")]
    NegativeBudget(f64),
    #[error("estimated hours cannot be negative (got {0})")]
    NegativeEstimate(i32),
    #[error("end date {end} is before start date {start}")]
    InvalidDates { start: NaiveDate, end: NaiveDate },
    #[error("project {project_id} cannot move back from {from} to {to}")]
    BackwardPhaseTransition {
        project_id: i32,
        from: ProjectPhase,
        to: ProjectPhase,
    },
    #[error("project {project_id} already has a task with id {task_id}")]
    DuplicateTask { project_id: i32, task_id: i32 },
    #[error("unknown project phase '{0}'")]
    UnknownPhase(String),
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Lifecycle stage. Declaration order is the only allowed direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectPhase {
    Analysis,
    Planning,
    Design,
    Development,
    Testing,
    Deployment,
    Maintenance,
    Completed,
}

impl ProjectPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPhase::Analysis => "Analysis",
            ProjectPhase::Planning => "Planning",
            ProjectPhase::Design => "Design",
            ProjectPhase::Development => "Development",
            ProjectPhase::Testing => "Testing",
            ProjectPhase::Deployment => "Deployment",
            ProjectPhase::Maintenance => "Maintenance",
            ProjectPhase::Completed => "Completed",
        }
    }

    pub fn all() -> [ProjectPhase; 8] {
        [
            ProjectPhase::Analysis,
            ProjectPhase::Planning,
            ProjectPhase::Design,
            ProjectPhase::Development,
            ProjectPhase::Testing,
            ProjectPhase::Deployment,
            ProjectPhase::Maintenance,
            ProjectPhase::Completed,
        ]
    }

    pub fn next(&self) -> Option<ProjectPhase> {
        let all = Self::all();
        let idx = all.iter().position(|phase| phase == self)?;
        all.get(idx + 1).copied()
    }
}

impl FromStr for ProjectPhase {
    type Err = ProjectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ProjectError::UnknownPhase(value.to_string()))
    }
}

impl fmt::Display for ProjectPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial edit applied by [`Project::apply_update`]. `None` keeps a field.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub phase: Option<ProjectPhase>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub client_name: Option<String>,
    pub estimated_hours: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: i32,
    name: String,
    #[serde(default)]
    description: String,
    phase: ProjectPhase,
    start_date: NaiveDate,
    end_date: NaiveDate,
    budget: f64,
    #[serde(default)]
    client_name: String,
    #[serde(default)]
    estimated_hours: i32,
    #[serde(default)]
    allocated_hours: i32,
    #[serde(default)]
    employee_costs: f64,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Project {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        phase: ProjectPhase,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: f64,
        estimated_hours: i32,
    ) -> Result<Self, ProjectError> {
        let project = Self {
            id,
            name: name.into(),
            description: String::new(),
            phase,
            start_date,
            end_date,
            budget,
            client_name: String::new(),
            estimated_hours,
            allocated_hours: 0,
            employee_costs: 0.0,
            tasks: Vec::new(),
        };
        project.validate_fields()?;
        Ok(project)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = client_name.into();
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn phase(&self) -> ProjectPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == ProjectPhase::Completed
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Initial estimate entered with the project; drives the affordability ceiling.
    pub fn estimated_hours(&self) -> i32 {
        self.estimated_hours
    }

    pub fn allocated_hours(&self) -> i32 {
        self.allocated_hours
    }

    pub fn employee_costs(&self) -> f64 {
        self.employee_costs
    }

    pub fn remaining_budget(&self) -> f64 {
        self.budget - self.employee_costs
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: i32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    pub(crate) fn task_mut(&mut self, task_id: i32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == task_id)
    }

    pub(crate) fn tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }

    pub fn tasks_estimated_total(&self) -> i32 {
        self.tasks.iter().map(Task::estimated_hours).sum()
    }

    pub fn tasks_allocated_total(&self) -> i32 {
        self.tasks.iter().map(Task::allocated_hours).sum()
    }

    pub fn next_task_id(&self) -> i32 {
        self.tasks.iter().map(Task::id).max().unwrap_or(0) + 1
    }

    pub fn add_task(&mut self, task: Task) -> Result<(), ProjectError> {
        if self.task(task.id()).is_some() {
            return Err(ProjectError::DuplicateTask {
                project_id: self.id,
                task_id: task.id(),
            });
        }
        task.validate()?;
        self.tasks.push(task);
        self.recompute_totals_from_tasks();
        Ok(())
    }

    pub fn set_phase(&mut self, phase: ProjectPhase) -> Result<(), ProjectError> {
        if phase < self.phase {
            return Err(ProjectError::BackwardPhaseTransition {
                project_id: self.id,
                from: self.phase,
                to: phase,
            });
        }
        self.phase = phase;
        Ok(())
    }

    /// Budget edits are not checked against costs already committed.
    pub fn set_budget(&mut self, budget: f64) -> Result<(), ProjectError> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(ProjectError::NegativeBudget(budget));
        }
        self.budget = budget;
        Ok(())
    }

    pub fn set_estimated_hours(&mut self, hours: i32) -> Result<(), ProjectError> {
        if hours < 0 {
            return Err(ProjectError::NegativeEstimate(hours));
        }
        self.estimated_hours = hours;
        Ok(())
    }

    /// Validates the whole edit first so a rejected update leaves the project untouched.
    pub fn apply_update(&mut self, update: ProjectUpdate) -> Result<(), ProjectError> {
        let mut candidate = self.clone();
        if let Some(name) = update.name {
            candidate.name = name;
        }
        if let Some(description) = update.description {
            candidate.description = description;
        }
        if let Some(start) = update.start_date {
            candidate.start_date = start;
        }
        if let Some(end) = update.end_date {
            candidate.end_date = end;
        }
        if let Some(budget) = update.budget {
            candidate.budget = budget;
        }
        if let Some(client) = update.client_name {
            candidate.client_name = client;
        }
        if let Some(hours) = update.estimated_hours {
            candidate.estimated_hours = hours;
        }
        if let Some(phase) = update.phase {
            candidate.set_phase(phase)?;
        }
        candidate.validate_fields()?;
        *self = candidate;
        Ok(())
    }

    pub(crate) fn add_employee_cost(&mut self, cost: f64) {
        self.employee_costs += cost;
    }

    /// Never drives the total below zero.
    pub(crate) fn remove_employee_cost(&mut self, cost: f64) {
        self.employee_costs = (self.employee_costs - cost).max(0.0);
    }

    pub(crate) fn reset_employee_costs(&mut self) {
        self.employee_costs = 0.0;
    }

    pub(crate) fn recompute_totals_from_tasks(&mut self) {
        self.allocated_hours = self.tasks_allocated_total();
    }

    pub(crate) fn clear_derived_state(&mut self) {
        self.employee_costs = 0.0;
        for task in &mut self.tasks {
            task.set_allocated_hours(0);
        }
        self.allocated_hours = 0;
    }

    pub(crate) fn validate_fields(&self) -> Result<(), ProjectError> {
        if self.name.trim().is_empty() {
            return Err(ProjectError::EmptyName);
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(ProjectError::NegativeBudget(self.budget));
        }
        if self.estimated_hours < 0 {
            return Err(ProjectError::NegativeEstimate(self.estimated_hours));
        }
        if self.end_date < self.start_date {
            return Err(ProjectError::InvalidDates {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}
