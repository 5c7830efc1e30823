//! Company-wide figures and tabular views for reporting.

use crate::company::Company;
use crate::cost;
use chrono::NaiveDate;
use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyStatistics {
    pub employee_count: usize,
    pub active_employee_count: usize,
    pub project_count: usize,
    pub task_count: usize,
    pub total_salaries: f64,
    pub total_budget: f64,
    pub total_employee_costs: f64,
    pub total_allocated_hours: i32,
    pub total_estimated_hours: i32,
    /// Mean of used/capacity over active employees with non-zero capacity.
    pub average_utilization: f64,
}

impl CompanyStatistics {
    pub fn from_company(company: &Company) -> Self {
        let employees = company.employees();
        let projects = company.projects();

        let utilizations: Vec<f64> = employees
            .iter()
            .filter(|e| e.is_active() && e.weekly_hours_capacity() > 0)
            .map(|e| f64::from(e.current_weekly_hours()) / f64::from(e.weekly_hours_capacity()))
            .collect();
        let average_utilization = if utilizations.is_empty() {
            0.0
        } else {
            utilizations.iter().sum::<f64>() / utilizations.len() as f64
        };

        Self {
            employee_count: employees.len(),
            active_employee_count: employees.iter().filter(|e| e.is_active()).count(),
            project_count: projects.len(),
            task_count: projects.iter().map(|p| p.tasks().len()).sum(),
            total_salaries: employees.iter().map(|e| e.salary()).sum(),
            total_budget: projects.iter().map(|p| p.budget()).sum(),
            total_employee_costs: projects.iter().map(|p| p.employee_costs()).sum(),
            total_allocated_hours: projects.iter().map(|p| p.allocated_hours()).sum(),
            total_estimated_hours: projects.iter().map(|p| p.tasks_estimated_total()).sum(),
            average_utilization,
        }
    }
}

impl Company {
    pub fn statistics(&self) -> CompanyStatistics {
        CompanyStatistics::from_company(self)
    }
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch");
    (date - epoch).num_days() as i32
}

pub fn employees_frame(company: &Company) -> PolarsResult<DataFrame> {
    let employees = company.employees();
    let ids: Vec<i32> = employees.iter().map(|e| e.id()).collect();
    let names: Vec<&str> = employees.iter().map(|e| e.name()).collect();
    let positions: Vec<&str> = employees.iter().map(|e| e.employee_type()).collect();
    let departments: Vec<&str> = employees.iter().map(|e| e.department()).collect();
    let active: Vec<bool> = employees.iter().map(|e| e.is_active()).collect();
    let capacity: Vec<i32> = employees.iter().map(|e| e.weekly_hours_capacity()).collect();
    let used: Vec<i32> = employees.iter().map(|e| e.current_weekly_hours()).collect();
    let available: Vec<i32> = employees.iter().map(|e| e.available_hours()).collect();
    let utilization: Vec<f64> = employees
        .iter()
        .map(|e| {
            if e.weekly_hours_capacity() > 0 {
                f64::from(e.current_weekly_hours()) / f64::from(e.weekly_hours_capacity())
            } else {
                0.0
            }
        })
        .collect();
    let hourly_rate: Vec<f64> = employees.iter().map(|e| e.hourly_rate()).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("position"), positions).into_column(),
        Series::new(PlSmallStr::from_static("department"), departments).into_column(),
        Series::new(PlSmallStr::from_static("active"), active).into_column(),
        Series::new(PlSmallStr::from_static("capacity"), capacity).into_column(),
        Series::new(PlSmallStr::from_static("used"), used).into_column(),
        Series::new(PlSmallStr::from_static("available"), available).into_column(),
        Series::new(PlSmallStr::from_static("utilization"), utilization).into_column(),
        Series::new(PlSmallStr::from_static("hourly_rate"), hourly_rate).into_column(),
    ])
}

pub fn projects_frame(company: &Company) -> PolarsResult<DataFrame> {
    let projects = company.projects();
    let ids: Vec<i32> = projects.iter().map(|p| p.id()).collect();
    let names: Vec<&str> = projects.iter().map(|p| p.name()).collect();
    let phases: Vec<&str> = projects.iter().map(|p| p.phase().as_str()).collect();
    let budgets: Vec<f64> = projects.iter().map(|p| p.budget()).collect();
    let costs: Vec<f64> = projects.iter().map(|p| p.employee_costs()).collect();
    let remaining: Vec<f64> = projects.iter().map(|p| p.remaining_budget()).collect();
    let estimated: Vec<i32> = projects.iter().map(|p| p.estimated_hours()).collect();
    let allocated: Vec<i32> = projects.iter().map(|p| p.allocated_hours()).collect();
    let task_counts: Vec<i32> = projects.iter().map(|p| p.tasks().len() as i32).collect();
    let starts: Vec<i32> = projects.iter().map(|p| date_to_i32(p.start_date())).collect();
    let ends: Vec<i32> = projects.iter().map(|p| date_to_i32(p.end_date())).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("phase"), phases).into_column(),
        Series::new(PlSmallStr::from_static("budget"), budgets).into_column(),
        Series::new(PlSmallStr::from_static("employee_costs"), costs).into_column(),
        Series::new(PlSmallStr::from_static("remaining_budget"), remaining).into_column(),
        Series::new(PlSmallStr::from_static("estimated_hours"), estimated).into_column(),
        Series::new(PlSmallStr::from_static("allocated_hours"), allocated).into_column(),
        Series::new(PlSmallStr::from_static("tasks"), task_counts).into_column(),
        Series::new(PlSmallStr::from_static("start_date"), starts)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("end_date"), ends)
            .cast(&DataType::Date)?
            .into_column(),
    ])
}

pub fn tasks_frame(company: &Company, project_id: i32) -> PolarsResult<DataFrame> {
    let tasks = company
        .project(project_id)
        .map(|p| p.tasks())
        .unwrap_or_default();
    let ids: Vec<i32> = tasks.iter().map(|t| t.id()).collect();
    let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
    let types: Vec<&str> = tasks.iter().map(|t| t.task_type().as_str()).collect();
    let priorities: Vec<i32> = tasks.iter().map(|t| t.priority()).collect();
    let estimated: Vec<i32> = tasks.iter().map(|t| t.estimated_hours()).collect();
    let allocated: Vec<i32> = tasks.iter().map(|t| t.allocated_hours()).collect();
    let phases: Vec<&str> = tasks.iter().map(|t| t.phase().as_str()).collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("id"), ids).into_column(),
        Series::new(PlSmallStr::from_static("name"), names).into_column(),
        Series::new(PlSmallStr::from_static("type"), types).into_column(),
        Series::new(PlSmallStr::from_static("priority"), priorities).into_column(),
        Series::new(PlSmallStr::from_static("estimated_hours"), estimated).into_column(),
        Series::new(PlSmallStr::from_static("allocated_hours"), allocated).into_column(),
        Series::new(PlSmallStr::from_static("phase"), phases).into_column(),
    ])
}

/// One row per ledger entry, costed at the employee's current salary.
pub fn ledger_frame(company: &Company) -> PolarsResult<DataFrame> {
    let records = company.task_assignments();
    let employee_ids: Vec<i32> = records.iter().map(|r| r.employee_id).collect();
    let project_ids: Vec<i32> = records.iter().map(|r| r.project_id).collect();
    let task_ids: Vec<i32> = records.iter().map(|r| r.task_id).collect();
    let hours: Vec<i32> = records.iter().map(|r| r.hours).collect();
    let costs: Vec<f64> = records
        .iter()
        .map(|r| {
            company
                .employee(r.employee_id)
                .map(|e| cost::employee_cost(e.salary(), r.hours))
                .unwrap_or(0.0)
        })
        .collect();

    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static("employee_id"), employee_ids).into_column(),
        Series::new(PlSmallStr::from_static("project_id"), project_ids).into_column(),
        Series::new(PlSmallStr::from_static("task_id"), task_ids).into_column(),
        Series::new(PlSmallStr::from_static("hours"), hours).into_column(),
        Series::new(PlSmallStr::from_static("cost"), costs).into_column(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::{Employee, EmployeeKind, Position};
    use crate::metadata::CompanyProfile;
    use crate::project::{Project, ProjectPhase};
    use crate::task::{Task, TaskType};

    fn company() -> Company {
        let mut company = Company::new(CompanyProfile::default());
        company
            .add_employee(
                Employee::new(
                    1,
                    "Dana",
                    4000.0,
                    "Engineering",
                    EmployeeKind::default_for(Position::Developer),
                    1.0,
                )
                .unwrap(),
            )
            .unwrap();
        company
            .add_employee(
                Employee::new(
                    2,
                    "Sam",
                    2400.0,
                    "Engineering",
                    EmployeeKind::default_for(Position::Developer),
                    0.5,
                )
                .unwrap(),
            )
            .unwrap();
        let mut project = Project::new(
            1,
            "Core",
            ProjectPhase::Development,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            10_000.0,
            100,
        )
        .unwrap();
        project
            .add_task(Task::new(1, "Build", TaskType::Development, 30, 1).unwrap())
            .unwrap();
        company.add_project(project).unwrap();
        company.assign_employee_to_task(1, 1, 1, 20).unwrap();
        company
    }

    #[test]
    fn summary_totals() {
        let stats = company().statistics();
        assert_eq!(stats.employee_count, 2);
        assert_eq!(stats.project_count, 1);
        assert_eq!(stats.task_count, 1);
        assert!((stats.total_salaries - 6400.0).abs() < 1e-9);
        assert!((stats.total_employee_costs - 500.0).abs() < 1e-9);
        // (20/40 + 0/20) / 2
        assert!((stats.average_utilization - 0.25).abs() < 1e-9);
    }

    #[test]
    fn dates_are_days_since_epoch() {
        assert_eq!(date_to_i32(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(date_to_i32(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()), 20089);
        assert_eq!(date_to_i32(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()), -1);
    }

    #[test]
    fn frames_have_one_row_per_record() {
        let company = company();
        let employees = employees_frame(&company).unwrap();
        assert_eq!(employees.height(), 2);
        assert_eq!(employees.width(), 10);

        let projects = projects_frame(&company).unwrap();
        assert_eq!(projects.height(), 1);
        assert_eq!(
            projects.column("start_date").unwrap().dtype(),
            &DataType::Date
        );

        let ledger = ledger_frame(&company).unwrap();
        assert_eq!(ledger.height(), 1);
        let cost = ledger
            .column("cost")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert!((cost - 500.0).abs() < 1e-9);

        assert_eq!(tasks_frame(&company, 1).unwrap().height(), 1);
        assert_eq!(tasks_frame(&company, 42).unwrap().height(), 0);
    }
}
