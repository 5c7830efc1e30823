use crate::company::Company;
use crate::cost;
use tracing::{debug, warn};

impl Company {
    /// Rebuilds every employee's weekly hours from the ledger.
    ///
    /// Entries of inactive employees stay in the ledger but are not counted.
    /// An entry that would overflow capacity only fills what is left.
    pub fn recalculate_employee_hours(&mut self) {
        for employee in &mut self.employees {
            employee.reset_weekly_hours(0);
        }
        for (key, hours) in self.ledger.iter() {
            let Some(employee) = self
                .employees
                .iter_mut()
                .find(|e| e.id() == key.employee_id)
            else {
                continue;
            };
            if !employee.is_active() {
                continue;
            }
            if let Err(err) = employee.add_weekly_hours(hours) {
                warn!(
                    employee_id = key.employee_id,
                    project_id = key.project_id,
                    task_id = key.task_id,
                    %err,
                    "ledger entry clipped to remaining capacity"
                );
                let clipped = employee.current_weekly_hours().saturating_add(hours);
                employee.reset_weekly_hours(clipped);
            }
        }
    }

    /// Rebuilds task allocations and project costs from the ledger, counting
    /// only employees still assigned to each project.
    pub fn recalculate_task_allocated_hours(&mut self) {
        self.fix_task_assignments_to_capacity();

        for project in &mut self.projects {
            let project_id = project.id();
            project.reset_employee_costs();
            let mut total_cost = 0.0;

            for task in project.tasks_mut() {
                let mut allocated: i32 = 0;
                for (key, hours) in self.ledger.iter() {
                    if key.project_id != project_id || key.task_id != task.id() {
                        continue;
                    }
                    let Some(employee) = self.employees.iter().find(|e| e.id() == key.employee_id)
                    else {
                        continue;
                    };
                    if !employee.is_assigned_to_project(project_id) {
                        continue;
                    }
                    allocated = allocated.saturating_add(hours);
                    total_cost += cost::employee_cost(employee.salary(), hours);
                }
                task.set_allocated_hours(allocated);
            }

            project.add_employee_cost(total_cost);
            project.recompute_totals_from_tasks();
        }
    }

    /// Full reconciliation pass. Idempotent: running it twice without a
    /// ledger change in between yields the same state.
    pub fn reconcile(&mut self) {
        self.fix_task_assignments_to_capacity();
        self.recalculate_employee_hours();
        self.recalculate_task_allocated_hours();
        debug!(entries = self.ledger.len(), "company reconciled");
    }
}

#[cfg(test)]
mod tests {
    use crate::employee::{Employee, EmployeeKind, Position};
    use crate::project::{Project, ProjectPhase};
    use crate::task::{Task, TaskType};
    use crate::{Company, CompanyProfile};
    use chrono::NaiveDate;

    fn company() -> Company {
        let mut company = Company::new(CompanyProfile::default());
        for (id, salary) in [(1, 3200.0), (2, 4800.0)] {
            company
                .add_employee(
                    Employee::new(
                        id,
                        format!("Dev {id}"),
                        salary,
                        "Engineering",
                        EmployeeKind::default_for(Position::Developer),
                        1.0,
                    )
                    .unwrap(),
                )
                .unwrap();
        }
        let mut project = Project::new(
            1,
            "Core",
            ProjectPhase::Development,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            20_000.0,
            200,
        )
        .unwrap();
        project
            .add_task(Task::new(1, "Parser", TaskType::Development, 40, 2).unwrap())
            .unwrap();
        project
            .add_task(Task::new(2, "Codegen", TaskType::Development, 40, 1).unwrap())
            .unwrap();
        company.add_project(project).unwrap();
        company
    }

    #[test]
    fn rebuilds_caches_from_ledger() {
        let mut company = company();
        company.restore_task_assignment(1, 1, 1, 12).unwrap();
        company.restore_task_assignment(1, 1, 2, 8).unwrap();
        company.restore_task_assignment(2, 1, 1, 10).unwrap();
        company.reconcile();

        assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 20);
        assert_eq!(company.employee(2).unwrap().current_weekly_hours(), 10);
        let project = company.project(1).unwrap();
        assert_eq!(project.task(1).unwrap().allocated_hours(), 22);
        assert_eq!(project.task(2).unwrap().allocated_hours(), 8);
        assert_eq!(project.allocated_hours(), 30);
        // 20h at 20/h plus 10h at 30/h
        assert!((project.employee_costs() - 700.0).abs() < 1e-9);
    }

    #[test]
    fn overflowing_ledger_is_scaled_into_capacity() {
        let mut company = company();
        company.restore_task_assignment(1, 1, 1, 30).unwrap();
        company.restore_task_assignment(1, 1, 2, 30).unwrap();
        company.reconcile();

        assert_eq!(company.employee_total_hours(1), 40);
        assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 40);
        assert_eq!(company.project(1).unwrap().allocated_hours(), 40);
    }

    #[test]
    fn huge_restored_entries_do_not_overflow() {
        let mut company = company();
        company.restore_task_assignment(1, 1, 1, 2_000_000_000).unwrap();
        company.restore_task_assignment(1, 1, 2, 2_000_000_000).unwrap();
        company.reconcile();

        assert_eq!(company.employee_task_hours(1, 1, 1), 20);
        assert_eq!(company.employee_task_hours(1, 1, 2), 20);
        assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 40);
        assert_eq!(company.project(1).unwrap().allocated_hours(), 40);
    }

    #[test]
    fn pass_is_idempotent() {
        let mut company = company();
        company.assign_employee_to_task(1, 1, 1, 15).unwrap();
        company.assign_employee_to_task(2, 1, 2, 25).unwrap();
        company.reconcile();
        let employees = company.employees().to_vec();
        let projects = company.projects().to_vec();
        company.reconcile();
        assert_eq!(company.employees(), employees.as_slice());
        assert_eq!(company.projects(), projects.as_slice());
    }

    #[test]
    fn inactive_employees_are_not_counted() {
        let mut company = company();
        company.assign_employee_to_task(1, 1, 1, 10).unwrap();
        company.fire_employee(1).unwrap();
        company.reconcile();
        assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 0);
        assert_eq!(company.employee_task_hours(1, 1, 1), 10);
        assert_eq!(company.project(1).unwrap().task(1).unwrap().allocated_hours(), 0);
    }
}
