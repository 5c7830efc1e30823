use crate::company::Company;
use crate::employee::{Employee, EmployeeError};
use crate::engine::MAX_ASSIGNMENT_HOURS;
use crate::ledger::AssignmentRecord;
use crate::project::{Project, ProjectError};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("duplicate employee id {0}")]
    DuplicateEmployee(i32),
    #[error("duplicate project id {0}")]
    DuplicateProject(i32),
    #[error("project {project_id} has duplicate task id {task_id}")]
    DuplicateTask { project_id: i32, task_id: i32 },
    #[error("employee {employee_id}: {source}")]
    Employee {
        employee_id: i32,
        #[source]
        source: EmployeeError,
    },
    #[error("project {project_id}: {source}")]
    Project {
        project_id: i32,
        #[source]
        source: ProjectError,
    },
    #[error(
        "assignment ({employee_id}, {project_id}, {task_id}) has non-positive hours {hours}"
    )]
    NonPositiveHours {
        employee_id: i32,
        project_id: i32,
        task_id: i32,
        hours: i32,
    },
    #[error(
        "assignment ({employee_id}, {project_id}, {task_id}) has {hours}h, more than a week holds"
    )]
    ExcessiveHours {
        employee_id: i32,
        project_id: i32,
        task_id: i32,
        hours: i32,
    },
    #[error("assignment ({employee_id}, {project_id}, {task_id}) appears more than once")]
    DuplicateAssignment {
        employee_id: i32,
        project_id: i32,
        task_id: i32,
    },
    #[error("assignment references unknown employee {0}")]
    UnknownEmployee(i32),
    #[error("assignment references unknown task {task_id} of project {project_id}")]
    UnknownTask { project_id: i32, task_id: i32 },
}

pub fn validate_employees(employees: &[Employee]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(employees.len());
    for employee in employees {
        if !seen.insert(employee.id()) {
            return Err(ValidationError::DuplicateEmployee(employee.id()));
        }
        employee
            .validate()
            .map_err(|source| ValidationError::Employee {
                employee_id: employee.id(),
                source,
            })?;
    }
    Ok(())
}

pub fn validate_projects(projects: &[Project]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(projects.len());
    for project in projects {
        if !seen.insert(project.id()) {
            return Err(ValidationError::DuplicateProject(project.id()));
        }
        project
            .validate_fields()
            .map_err(|source| ValidationError::Project {
                project_id: project.id(),
                source,
            })?;
        let mut task_ids = HashSet::with_capacity(project.tasks().len());
        for task in project.tasks() {
            if !task_ids.insert(task.id()) {
                return Err(ValidationError::DuplicateTask {
                    project_id: project.id(),
                    task_id: task.id(),
                });
            }
            task.validate().map_err(|err| ValidationError::Project {
                project_id: project.id(),
                source: err.into(),
            })?;
        }
    }
    Ok(())
}

pub fn validate_assignments(
    records: &[AssignmentRecord],
    employees: &[Employee],
    projects: &[Project],
) -> Result<(), ValidationError> {
    let employee_ids: HashSet<i32> = employees.iter().map(Employee::id).collect();
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if record.hours <= 0 {
            return Err(ValidationError::NonPositiveHours {
                employee_id: record.employee_id,
                project_id: record.project_id,
                task_id: record.task_id,
                hours: record.hours,
            });
        }
        if record.hours > MAX_ASSIGNMENT_HOURS {
            return Err(ValidationError::ExcessiveHours {
                employee_id: record.employee_id,
                project_id: record.project_id,
                task_id: record.task_id,
                hours: record.hours,
            });
        }
        if !seen.insert(record.key()) {
            return Err(ValidationError::DuplicateAssignment {
                employee_id: record.employee_id,
                project_id: record.project_id,
                task_id: record.task_id,
            });
        }
        if !employee_ids.contains(&record.employee_id) {
            return Err(ValidationError::UnknownEmployee(record.employee_id));
        }
        let task_known = projects
            .iter()
            .find(|p| p.id() == record.project_id)
            .is_some_and(|p| p.task(record.task_id).is_some());
        if !task_known {
            return Err(ValidationError::UnknownTask {
                project_id: record.project_id,
                task_id: record.task_id,
            });
        }
    }
    Ok(())
}

pub fn validate_records(
    employees: &[Employee],
    projects: &[Project],
    records: &[AssignmentRecord],
) -> Result<(), ValidationError> {
    validate_employees(employees)?;
    validate_projects(projects)?;
    validate_assignments(records, employees, projects)
}

pub fn validate_company(company: &Company) -> Result<(), ValidationError> {
    validate_records(
        company.employees(),
        company.projects(),
        &company.task_assignments(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::{EmployeeKind, Position};
    use crate::project::ProjectPhase;
    use crate::task::{Task, TaskType};
    use chrono::NaiveDate;

    fn employee(id: i32) -> Employee {
        Employee::new(
            id,
            "Kim",
            2000.0,
            "Design",
            EmployeeKind::default_for(Position::Designer),
            1.0,
        )
        .unwrap()
    }

    fn project(id: i32) -> Project {
        let mut project = Project::new(
            id,
            "Brand",
            ProjectPhase::Design,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            5000.0,
            50,
        )
        .unwrap();
        project
            .add_task(Task::new(1, "Logo", TaskType::Design, 10, 1).unwrap())
            .unwrap();
        project
    }

    fn record(employee_id: i32, task_id: i32, hours: i32) -> AssignmentRecord {
        AssignmentRecord {
            employee_id,
            project_id: 1,
            task_id,
            hours,
        }
    }

    #[test]
    fn detects_duplicate_ids() {
        assert_eq!(
            validate_employees(&[employee(1), employee(1)]),
            Err(ValidationError::DuplicateEmployee(1))
        );
        assert_eq!(
            validate_projects(&[project(4), project(4)]),
            Err(ValidationError::DuplicateProject(4))
        );
    }

    #[test]
    fn checks_ledger_references() {
        let employees = [employee(1)];
        let projects = [project(1)];
        assert!(validate_records(&employees, &projects, &[record(1, 1, 5)]).is_ok());
        assert_eq!(
            validate_records(&employees, &projects, &[record(2, 1, 5)]),
            Err(ValidationError::UnknownEmployee(2))
        );
        assert_eq!(
            validate_records(&employees, &projects, &[record(1, 9, 5)]),
            Err(ValidationError::UnknownTask {
                project_id: 1,
                task_id: 9
            })
        );
        assert!(matches!(
            validate_records(&employees, &projects, &[record(1, 1, 0)]),
            Err(ValidationError::NonPositiveHours { .. })
        ));
        assert!(matches!(
            validate_records(&employees, &projects, &[record(1, 1, 169)]),
            Err(ValidationError::ExcessiveHours { hours: 169, .. })
        ));
        assert!(validate_records(&employees, &projects, &[record(1, 1, 168)]).is_ok());
        assert!(matches!(
            validate_records(&employees, &projects, &[record(1, 1, 2), record(1, 1, 3)]),
            Err(ValidationError::DuplicateAssignment { .. })
        ));
    }
}
