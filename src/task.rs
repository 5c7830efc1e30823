use crate::employee::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task name cannot be empty")]
    EmptyName,
    #[error("task {task_id} cannot have negative {field} ({value})")]
    NegativeHours {
        task_id: i32,
        field: &'static str,
        value: i32,
    },
    #[error("unknown task type '{0}'")]
    UnknownTaskType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Management,
    Development,
    Design,
    #[serde(rename = "QA")]
    Qa,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Management => "Management",
            TaskType::Development => "Development",
            TaskType::Design => "Design",
            TaskType::Qa => "QA",
        }
    }

    /// The only employee position allowed to work on this kind of task.
    pub fn required_position(&self) -> Position {
        match self {
            TaskType::Management => Position::Manager,
            TaskType::Development => Position::Developer,
            TaskType::Design => Position::Designer,
            TaskType::Qa => Position::Qa,
        }
    }
}

impl FromStr for TaskType {
    type Err = TaskError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "management" => Ok(TaskType::Management),
            "development" => Ok(TaskType::Development),
            "design" => Ok(TaskType::Design),
            "qa" => Ok(TaskType::Qa),
            _ => Err(TaskError::UnknownTaskType(value.to_string())),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskPhase {
    Planned,
    InProgress,
    Completed,
}

impl TaskPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPhase::Planned => "Planned",
            TaskPhase::InProgress => "In Progress",
            TaskPhase::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: i32,
    name: String,
    task_type: TaskType,
    estimated_hours: i32,
    #[serde(default)]
    allocated_hours: i32,
    #[serde(default)]
    priority: i32,
}

impl Task {
    pub fn new(
        id: i32,
        name: impl Into<String>,
        task_type: TaskType,
        estimated_hours: i32,
        priority: i32,
    ) -> Result<Self, TaskError> {
        let task = Self {
            id,
            name: name.into(),
            task_type,
            estimated_hours,
            allocated_hours: 0,
            priority,
        };
        task.validate()?;
        Ok(task)
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn estimated_hours(&self) -> i32 {
        self.estimated_hours
    }

    pub fn allocated_hours(&self) -> i32 {
        self.allocated_hours
    }

    /// Hours still missing before the task reaches its estimate.
    pub fn remaining_hours(&self) -> i32 {
        self.estimated_hours - self.allocated_hours
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn phase(&self) -> TaskPhase {
        if self.allocated_hours == 0 {
            TaskPhase::Planned
        } else if self.allocated_hours >= self.estimated_hours {
            TaskPhase::Completed
        } else {
            TaskPhase::InProgress
        }
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    pub fn set_estimated_hours(&mut self, hours: i32) -> Result<(), TaskError> {
        if hours < 0 {
            return Err(TaskError::NegativeHours {
                task_id: self.id,
                field: "estimated hours",
                value: hours,
            });
        }
        self.estimated_hours = hours;
        Ok(())
    }

    pub(crate) fn add_allocated_hours(&mut self, hours: i32) {
        self.allocated_hours = self.allocated_hours.saturating_add(hours).max(0);
    }

    pub(crate) fn set_allocated_hours(&mut self, hours: i32) {
        self.allocated_hours = hours.max(0);
    }

    pub(crate) fn validate(&self) -> Result<(), TaskError> {
        if self.name.trim().is_empty() {
            return Err(TaskError::EmptyName);
        }
        if self.estimated_hours < 0 {
            return Err(TaskError::NegativeHours {
                task_id: self.id,
                field: "estimated hours",
                value: self.estimated_hours,
            });
        }
        if self.allocated_hours < 0 {
            return Err(TaskError::NegativeHours {
                task_id: self.id,
                field: "allocated hours",
                value: self.allocated_hours,
            });
        }
        Ok(())
    }
}
