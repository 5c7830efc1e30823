use chrono::NaiveDate;
use workforce_planner::{
    AssignmentError, Company, CompanyProfile, Employee, EmployeeKind, ErrorKind, Position, Project,
    ProjectPhase, Task, TaskType,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn developer(id: i32, name: &str, salary: f64) -> Employee {
    Employee::new(
        id,
        name,
        salary,
        "Engineering",
        EmployeeKind::default_for(Position::Developer),
        1.0,
    )
    .unwrap()
}

fn dev_project(id: i32, budget: f64, estimated_hours: i32) -> Project {
    Project::new(
        id,
        format!("Project {id}"),
        ProjectPhase::Development,
        d(2025, 3, 1),
        d(2025, 6, 30),
        budget,
        estimated_hours,
    )
    .unwrap()
}

fn dev_task(id: i32, estimated_hours: i32, priority: i32) -> Task {
    Task::new(id, format!("Task {id}"), TaskType::Development, estimated_hours, priority).unwrap()
}

fn acme() -> Company {
    Company::new(CompanyProfile::new("Acme", "Software", "Berlin", 2010))
}

/// Cached hours agree with the ledger for active employees and assigned projects.
fn assert_consistent(company: &Company) {
    for employee in company.employees() {
        assert!(employee.current_weekly_hours() >= 0);
        assert!(employee.current_weekly_hours() <= employee.weekly_hours_capacity());
        if employee.is_active() {
            assert_eq!(
                employee.current_weekly_hours(),
                company.ledger().employee_total(employee.id()),
                "employee {} hours drifted from the ledger",
                employee.id()
            );
        }
    }
    for project in company.projects() {
        assert!(project.employee_costs() >= 0.0);
        for task in project.tasks() {
            assert!(task.allocated_hours() >= 0);
        }
        assert_eq!(project.allocated_hours(), project.tasks_allocated_total());
    }
}

#[test]
fn single_assignment_updates_all_caches() {
    let mut company = acme();
    company.add_employee(developer(1, "Dana", 4000.0)).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 30, 1)).unwrap();
    company.add_project(project).unwrap();

    let assigned = company.assign_employee_to_task(1, 1, 1, 20).unwrap();
    assert_eq!(assigned, 20);

    let project = company.project(1).unwrap();
    assert_eq!(project.task(1).unwrap().allocated_hours(), 20);
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 20);
    assert!((project.employee_costs() - 500.0).abs() < 1e-9);
    assert_eq!(company.employee_task_hours(1, 1, 1), 20);
    assert!(company.employee(1).unwrap().assigned_projects().contains(&1));
    assert_consistent(&company);
}

#[test]
fn request_is_clamped_to_what_the_task_needs() {
    let mut company = acme();
    company.add_employee(developer(1, "Dana", 4000.0)).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 30, 1)).unwrap();
    company.add_project(project).unwrap();

    company.assign_employee_to_task(1, 1, 1, 20).unwrap();
    assert_eq!(company.assign_employee_to_task(1, 1, 1, 25).unwrap(), 10);
    assert_eq!(company.project(1).unwrap().task(1).unwrap().allocated_hours(), 30);
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 30);
    assert_eq!(company.employee_task_hours(1, 1, 1), 30);

    let err = company.assign_employee_to_task(1, 1, 1, 5).unwrap_err();
    assert!(matches!(err, AssignmentError::TaskFullyAllocated { .. }));
    assert!(err.to_string().contains("already fully allocated"));
    assert_eq!(err.kind(), ErrorKind::StateConflict);
    assert_consistent(&company);
}

#[test]
fn auto_assign_prefers_priority_then_cheaper_developer() {
    let mut company = acme();
    // 20/h and 30/h
    company.add_employee(developer(1, "Pricey", 4800.0)).unwrap();
    company.add_employee(developer(2, "Thrifty", 3200.0)).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 10, 1)).unwrap();
    project.add_task(dev_task(2, 20, 5)).unwrap();
    company.add_project(project).unwrap();

    let summary = company.auto_assign_employees_to_project(1).unwrap();

    assert_eq!(summary.hours_assigned, 30);
    assert_eq!(summary.assignments, 2);
    assert_eq!(company.employee_task_hours(2, 1, 2), 20);
    assert_eq!(company.employee_task_hours(2, 1, 1), 10);
    assert_eq!(company.employee_task_hours(1, 1, 1), 0);
    assert_eq!(summary.employee_usage.get(&2), Some(&30));
    assert!(!summary.employee_usage.contains_key(&1));
    assert!((summary.cost_added - 600.0).abs() < 1e-9);

    let project = company.project(1).unwrap();
    assert!((project.employee_costs() - 600.0).abs() < 1e-9);
    assert_eq!(project.allocated_hours(), 30);
    assert_consistent(&company);
}

#[test]
fn auto_assign_spills_over_to_the_next_candidate() {
    let mut company = acme();
    company.add_employee(developer(1, "Pricey", 4800.0)).unwrap();
    company.add_employee(developer(2, "Thrifty", 3200.0)).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 50, 1)).unwrap();
    company.add_project(project).unwrap();

    let summary = company.auto_assign_employees_to_project(1).unwrap();
    assert_eq!(company.employee_task_hours(2, 1, 1), 40);
    assert_eq!(company.employee_task_hours(1, 1, 1), 10);
    assert_eq!(summary.hours_assigned, 50);
    assert!((summary.cost_added - (40.0 * 20.0 + 10.0 * 30.0)).abs() < 1e-9);
    assert_consistent(&company);
}

#[test]
fn lower_employment_rate_scales_larger_assignment_harder() {
    let mut company = acme();
    company.add_employee(developer(1, "Dana", 4000.0)).unwrap();
    for id in [1, 2] {
        let mut project = dev_project(id, 10_000.0, 100);
        project.add_task(dev_task(1, 40, 1)).unwrap();
        company.add_project(project).unwrap();
    }
    company.assign_employee_to_task(1, 1, 1, 25).unwrap();
    company.assign_employee_to_task(1, 2, 1, 10).unwrap();
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 35);

    company.change_employment_rate(1, 0.5).unwrap();

    let employee = company.employee(1).unwrap();
    assert_eq!(employee.weekly_hours_capacity(), 20);
    let first = company.employee_task_hours(1, 1, 1);
    let second = company.employee_task_hours(1, 2, 1);
    assert!(first + second <= 20);
    assert_eq!((first, second), (13, 5));
    assert!(25 - first > 10 - second);
    assert_eq!(employee.current_weekly_hours(), first + second);
    assert_eq!(company.project(1).unwrap().task(1).unwrap().allocated_hours(), 13);
    assert!((company.project(2).unwrap().employee_costs() - 5.0 * 25.0).abs() < 1e-9);
    assert_consistent(&company);
}

#[test]
fn higher_employment_rate_keeps_assignments() {
    let mut company = acme();
    let part_timer = Employee::new(
        1,
        "Dana",
        4000.0,
        "Engineering",
        EmployeeKind::default_for(Position::Developer),
        0.5,
    )
    .unwrap();
    company.add_employee(part_timer).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 40, 1)).unwrap();
    company.add_project(project).unwrap();
    company.assign_employee_to_task(1, 1, 1, 15).unwrap();

    company.change_employment_rate(1, 1.0).unwrap();
    assert_eq!(company.employee_task_hours(1, 1, 1), 15);
    assert_eq!(company.employee(1).unwrap().available_hours(), 25);
    assert_consistent(&company);
}

#[test]
fn firing_drains_hours_and_cost_without_going_negative() {
    let mut company = acme();
    company.add_employee(developer(1, "Dana", 4000.0)).unwrap();
    company.add_employee(developer(2, "Eli", 4000.0)).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 30, 1)).unwrap();
    company.add_project(project).unwrap();
    company.assign_employee_to_task(1, 1, 1, 20).unwrap();
    company.assign_employee_to_task(2, 1, 1, 10).unwrap();
    assert!((company.project(1).unwrap().employee_costs() - 750.0).abs() < 1e-9);

    company.fire_employee(1).unwrap();

    let project = company.project(1).unwrap();
    assert_eq!(project.task(1).unwrap().allocated_hours(), 10);
    assert!((project.employee_costs() - 250.0).abs() < 1e-9);
    let fired = company.employee(1).unwrap();
    assert!(!fired.is_active());
    assert_eq!(fired.current_weekly_hours(), 0);
    assert!(fired.assigned_projects().is_empty());
    assert!(fired.project_history().contains(&1));
    // history stays in the ledger
    assert_eq!(company.employee_task_hours(1, 1, 1), 20);

    let err = company.assign_employee_to_task(1, 1, 1, 5).unwrap_err();
    assert!(matches!(err, AssignmentError::InactiveEmployee { .. }));
    assert!(matches!(
        company.fire_employee(1),
        Err(AssignmentError::InactiveEmployee { .. })
    ));

    company.reconcile();
    let project = company.project(1).unwrap();
    assert_eq!(project.task(1).unwrap().allocated_hours(), 10);
    assert!((project.employee_costs() - 250.0).abs() < 1e-9);
    assert_consistent(&company);
}

#[test]
fn rehire_starts_with_an_empty_week() {
    let mut company = acme();
    company.add_employee(developer(1, "Dana", 4000.0)).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 30, 1)).unwrap();
    company.add_project(project).unwrap();
    company.assign_employee_to_task(1, 1, 1, 20).unwrap();

    company.fire_employee(1).unwrap();
    company.reactivate_employee(1).unwrap();

    let employee = company.employee(1).unwrap();
    assert!(employee.is_active());
    assert_eq!(employee.current_weekly_hours(), 0);
    assert_eq!(company.employee_task_hours(1, 1, 1), 0);
    assert_eq!(company.project(1).unwrap().task(1).unwrap().allocated_hours(), 0);
    assert!(matches!(
        company.reactivate_employee(1),
        Err(AssignmentError::EmployeeAlreadyActive(1))
    ));
    assert_consistent(&company);
}

#[test]
fn removing_records_cleans_the_ledger() {
    let mut company = acme();
    company.add_employee(developer(1, "Dana", 4000.0)).unwrap();
    company.add_employee(developer(2, "Eli", 4000.0)).unwrap();
    for id in [1, 2] {
        let mut project = dev_project(id, 10_000.0, 100);
        project.add_task(dev_task(1, 30, 1)).unwrap();
        company.add_project(project).unwrap();
    }
    company.assign_employee_to_task(1, 1, 1, 10).unwrap();
    company.assign_employee_to_task(2, 1, 1, 10).unwrap();
    company.assign_employee_to_task(1, 2, 1, 15).unwrap();

    let removed = company.remove_employee(2).unwrap();
    assert_eq!(removed.name(), "Eli");
    assert!(company.employee(2).is_none());
    assert_eq!(company.project(1).unwrap().task(1).unwrap().allocated_hours(), 10);

    let removed = company.remove_project(2).unwrap();
    assert_eq!(removed.id(), 2);
    assert!(company.ledger().entries_for_project(2).is_empty());
    let dana = company.employee(1).unwrap();
    assert_eq!(dana.current_weekly_hours(), 10);
    assert!(!dana.assigned_projects().contains(&2));

    assert!(matches!(
        company.remove_project(2),
        Err(AssignmentError::ProjectNotFound(2))
    ));
    assert_consistent(&company);
}

#[test]
fn mixed_operations_keep_ledger_and_caches_in_step() {
    let mut company = acme();
    for (id, salary) in [(1, 3200.0), (2, 4000.0), (3, 4800.0)] {
        company
            .add_employee(developer(id, &format!("Dev {id}"), salary))
            .unwrap();
    }
    for id in [1, 2] {
        let mut project = dev_project(id, 20_000.0, 200);
        project.add_task(dev_task(1, 30, 2)).unwrap();
        project.add_task(dev_task(2, 45, 1)).unwrap();
        company.add_project(project).unwrap();
    }

    company.assign_employee_to_task(3, 1, 1, 12).unwrap();
    company.auto_assign_employees_to_project(1).unwrap();
    assert_consistent(&company);
    company.auto_assign_employees_to_project(2).unwrap();
    assert_consistent(&company);
    company.change_employment_rate(1, 0.75).unwrap();
    assert_consistent(&company);
    company.scale_employee_task_assignments(2, 0.5).unwrap();
    assert_consistent(&company);
    company.remove_employee(3).unwrap();
    assert_consistent(&company);

    for project in company.projects() {
        assert!(project.employee_costs() <= project.budget());
        for task in project.tasks() {
            assert_eq!(
                task.allocated_hours(),
                company.ledger().task_total(project.id(), task.id())
            );
        }
    }
}

#[test]
fn reconcile_is_idempotent() {
    let mut company = acme();
    company.add_employee(developer(1, "Dana", 4000.0)).unwrap();
    company.add_employee(developer(2, "Eli", 3200.0)).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 30, 1)).unwrap();
    project.add_task(dev_task(2, 25, 3)).unwrap();
    company.add_project(project).unwrap();
    company.auto_assign_employees_to_project(1).unwrap();
    company.fire_employee(2).unwrap();

    company.reconcile();
    let once = company.clone();
    company.reconcile();
    assert_eq!(company.task_assignments(), once.task_assignments());
    assert_eq!(company.employees(), once.employees());
    assert_eq!(company.projects(), once.projects());
}

#[test]
fn assignments_never_push_costs_over_budget() {
    let mut company = acme();
    for id in 1..=6 {
        company
            .add_employee(developer(id, &format!("Dev {id}"), 4000.0))
            .unwrap();
    }
    let mut project = dev_project(1, 4000.0, 40);
    project.add_task(dev_task(1, 168, 1)).unwrap();
    project.add_task(dev_task(2, 168, 1)).unwrap();
    company.add_project(project).unwrap();

    let mut budget_errors = 0;
    for id in 1..=6 {
        match company.assign_employee_to_task(id, 1, 1 + id % 2, 40) {
            Ok(_) => {}
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::Budget);
                budget_errors += 1;
            }
        }
        let project = company.project(1).unwrap();
        assert!(project.employee_costs() <= project.budget() + 1e-9);
    }
    assert_eq!(budget_errors, 2);

    let summary = company.auto_assign_employees_to_project(1).unwrap();
    assert_eq!(summary.hours_assigned, 0);
    assert_consistent(&company);
}

#[test]
fn unit_scale_factor_conserves_hours() {
    let mut company = acme();
    company.add_employee(developer(1, "Dana", 4000.0)).unwrap();
    let mut project = dev_project(1, 10_000.0, 100);
    project.add_task(dev_task(1, 30, 1)).unwrap();
    project.add_task(dev_task(2, 30, 1)).unwrap();
    company.add_project(project).unwrap();
    company.assign_employee_to_task(1, 1, 1, 17).unwrap();
    company.assign_employee_to_task(1, 1, 2, 9).unwrap();

    let before = company.task_assignments();
    company.scale_employee_task_assignments(1, 1.0).unwrap();
    assert_eq!(company.task_assignments(), before);
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 26);

    assert!(matches!(
        company.scale_employee_task_assignments(1, 0.0),
        Err(AssignmentError::InvalidScaleFactor(_))
    ));
    assert!(matches!(
        company.scale_employee_task_assignments(1, f64::NAN),
        Err(AssignmentError::InvalidScaleFactor(_))
    ));
}
