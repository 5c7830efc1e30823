#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use tempfile::NamedTempFile;
use workforce_planner::{
    Company, CompanyProfile, CompanyStore, Employee, EmployeeKind, Position, Project,
    ProjectPhase, SqliteCompanyStore, Task, TaskType,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_company() -> Company {
    let mut company = Company::new(CompanyProfile::new("Fabrikam", "Retail", "Lyon", 2004));
    company
        .add_employee(
            Employee::new(
                1,
                "Ada",
                3600.0,
                "QA",
                EmployeeKind::Qa {
                    testing_type: "Exploratory".into(),
                    bugs_found: 12,
                },
                1.0,
            )
            .unwrap(),
        )
        .unwrap();
    company
        .add_employee(
            Employee::new(
                2,
                "Ben",
                2400.0,
                "QA",
                EmployeeKind::default_for(Position::Qa),
                0.8,
            )
            .unwrap(),
        )
        .unwrap();

    let mut project = Project::new(
        7,
        "Checkout",
        ProjectPhase::Testing,
        d(2025, 4, 1),
        d(2025, 5, 30),
        12_000.0,
        150,
    )
    .unwrap();
    project
        .add_task(Task::new(1, "Regression", TaskType::Qa, 30, 4).unwrap())
        .unwrap();
    project
        .add_task(Task::new(2, "Load tests", TaskType::Qa, 20, 1).unwrap())
        .unwrap();
    company.add_project(project).unwrap();
    company.auto_assign_employees_to_project(7).unwrap();
    company.reconcile();
    company
}

#[test]
fn sqlite_store_round_trip_company() {
    let file = NamedTempFile::new().unwrap();
    let store = SqliteCompanyStore::new(file.path()).unwrap();
    let company = sample_company();
    assert!(!company.task_assignments().is_empty());

    store.save_company(&company).expect("save company");
    let loaded = store.load_company().expect("load company").expect("company row");

    assert_eq!(loaded.profile(), company.profile());
    assert_eq!(loaded.task_assignments(), company.task_assignments());
    for (a, e) in loaded.employees().iter().zip(company.employees()) {
        assert_eq!(a.kind(), e.kind());
        assert_eq!(a.weekly_hours_capacity(), e.weekly_hours_capacity());
        assert_eq!(a.current_weekly_hours(), e.current_weekly_hours());
        assert_eq!(a.assigned_projects(), e.assigned_projects());
    }
    let (a, e) = (loaded.project(7).unwrap(), company.project(7).unwrap());
    assert_eq!(a.tasks(), e.tasks());
    assert_eq!(a.allocated_hours(), e.allocated_hours());
    assert!((a.employee_costs() - e.employee_costs()).abs() < 1e-6);
}

#[test]
fn sqlite_store_without_company_loads_none() {
    let store = SqliteCompanyStore::in_memory().unwrap();
    assert!(store.load_company().unwrap().is_none());
}

#[test]
fn sqlite_store_save_replaces_previous_state() {
    let store = SqliteCompanyStore::in_memory().unwrap();
    let mut company = sample_company();
    store.save_company(&company).unwrap();

    company.remove_employee(2).unwrap();
    store.save_company(&company).unwrap();

    let loaded = store.load_company().unwrap().unwrap();
    assert_eq!(loaded.employees().len(), 1);
    assert!(loaded.ledger().entries_for_employee(2).is_empty());
    assert_eq!(loaded.task_assignments(), company.task_assignments());
}
