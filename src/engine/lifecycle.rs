use crate::company::Company;
use crate::employee::Employee;
use crate::error::{AssignmentError, AssignmentResult};
use crate::project::{Project, ProjectUpdate};
use tracing::info;

impl Company {
    /// Deactivates an employee but keeps the record and its ledger history.
    ///
    /// The employee's hours are drained from each assigned project first:
    /// every task loses its proportional share and the matching cost is
    /// removed from the project.
    pub fn fire_employee(&mut self, employee_id: i32) -> AssignmentResult<()> {
        let ei = self.employee_index(employee_id)?;
        let employee = &self.employees[ei];
        if !employee.is_active() {
            return Err(AssignmentError::InactiveEmployee {
                employee_id,
                name: employee.name().to_string(),
            });
        }
        let hourly_rate = employee.hourly_rate();
        let assigned: Vec<i32> = employee.assigned_projects().to_vec();

        for &project_id in &assigned {
            let employee_hours = self.ledger.employee_project_total(employee_id, project_id);
            let Some(project) = self.projects.iter_mut().find(|p| p.id() == project_id) else {
                continue;
            };
            let project_total = project.allocated_hours();
            if project_total > 0 && employee_hours > 0 {
                for task in project.tasks_mut() {
                    let share = i64::from(task.allocated_hours()) * i64::from(employee_hours)
                        / i64::from(project_total);
                    task.add_allocated_hours(-(share as i32));
                }
            }
            let cost = (hourly_rate * f64::from(employee_hours)).min(project.employee_costs());
            project.remove_employee_cost(cost);
            project.recompute_totals_from_tasks();
        }

        let employee = &mut self.employees[ei];
        employee.reset_weekly_hours(0);
        for &project_id in &assigned {
            employee.add_to_project_history(project_id);
            employee.remove_assigned_project(project_id);
        }
        employee.set_active(false)?;
        info!(employee_id, projects = assigned.len(), "employee fired");
        Ok(())
    }

    /// Deletes an employee together with every ledger entry it owns.
    pub fn remove_employee(&mut self, employee_id: i32) -> AssignmentResult<Employee> {
        let ei = self.employee_index(employee_id)?;
        let removed_entries = self.ledger.remove_employee(employee_id);
        for (key, _) in &removed_entries {
            if let Some(project) = self.projects.iter_mut().find(|p| p.id() == key.project_id) {
                project.recompute_totals_from_tasks();
            }
        }
        let employee = self.employees.remove(ei);
        self.reconcile();
        info!(employee_id, entries = removed_entries.len(), "employee removed");
        Ok(employee)
    }

    /// Brings a fired employee back with an empty week. Old ledger entries are
    /// dropped; the project history keeps the ids.
    pub fn reactivate_employee(&mut self, employee_id: i32) -> AssignmentResult<()> {
        let ei = self.employee_index(employee_id)?;
        if self.employees[ei].is_active() {
            return Err(AssignmentError::EmployeeAlreadyActive(employee_id));
        }
        self.ledger.remove_employee(employee_id);
        self.employees[ei].set_active(true)?;
        self.reconcile();
        info!(employee_id, "employee reactivated");
        Ok(())
    }

    /// Swaps in an edited record with the same id.
    ///
    /// History, project set and active flag carry over. A lower employment
    /// rate scales the employee's assignments by new/old; otherwise the old
    /// entries are replayed onto the new record.
    pub fn replace_employee(&mut self, mut updated: Employee) -> AssignmentResult<()> {
        let employee_id = updated.id();
        let ei = self.employee_index(employee_id)?;
        let previous = self.employees[ei].clone();

        for &project_id in previous.project_history() {
            updated.add_to_project_history(project_id);
        }
        for &project_id in previous.assigned_projects() {
            updated.add_assigned_project(project_id);
        }
        if !previous.is_active() {
            updated.set_active(false)?;
        }

        let factor = updated.employment_rate() / previous.employment_rate();
        if factor < 1.0 {
            updated.reset_weekly_hours(previous.current_weekly_hours());
            self.employees[ei] = updated;
            self.scale_employee_task_assignments(employee_id, factor)?;
        } else {
            let entries = self.ledger.remove_employee(employee_id);
            self.employees[ei] = updated;
            for (key, hours) in entries {
                self.restore_task_assignment(key.employee_id, key.project_id, key.task_id, hours)?;
            }
            self.reconcile();
        }
        info!(employee_id, factor, "employee record replaced");
        Ok(())
    }

    /// Sets a new employment rate. A shrinking capacity scales the employee's
    /// assignments by the rate ratio; a growing one keeps them as they are.
    pub fn change_employment_rate(
        &mut self,
        employee_id: i32,
        employment_rate: f64,
    ) -> AssignmentResult<()> {
        let ei = self.employee_index(employee_id)?;
        let old_rate = self.employees[ei].employment_rate();
        self.employees[ei].set_employment_rate(employment_rate)?;
        let factor = (employment_rate / old_rate).min(1.0);
        self.scale_employee_task_assignments(employee_id, factor)
    }

    /// Applies a partial project edit. The ledger is left alone; caches are
    /// reconciled afterwards.
    pub fn update_project(
        &mut self,
        project_id: i32,
        update: ProjectUpdate,
    ) -> AssignmentResult<()> {
        let pi = self.project_index(project_id)?;
        self.projects[pi].apply_update(update)?;
        self.reconcile();
        info!(project_id, "project updated");
        Ok(())
    }

    pub fn remove_project(&mut self, project_id: i32) -> AssignmentResult<Project> {
        let pi = self.project_index(project_id)?;
        let removed_entries = self.ledger.remove_project(project_id);
        for employee in &mut self.employees {
            employee.remove_assigned_project(project_id);
        }
        let project = self.projects.remove(pi);
        self.reconcile();
        info!(project_id, entries = removed_entries.len(), "project removed");
        Ok(project)
    }
}
