use crate::company::Company;
use crate::cost;
use crate::error::{AssignmentError, AssignmentResult};
use crate::ledger::AssignmentKey;
use crate::rules;
use tracing::{debug, warn};

pub const MIN_ASSIGNMENT_HOURS: i32 = 1;
/// Hours in a week.
pub const MAX_ASSIGNMENT_HOURS: i32 = 168;

impl Company {
    /// Assigns up to `requested_hours` of an employee's week to a task.
    ///
    /// Every check runs before any state is touched, so a failed call leaves
    /// the company unchanged. The amount committed is clamped to what the task
    /// still needs and returned.
    pub fn assign_employee_to_task(
        &mut self,
        employee_id: i32,
        project_id: i32,
        task_id: i32,
        requested_hours: i32,
    ) -> AssignmentResult<i32> {
        let ei = self.employee_index(employee_id)?;
        let employee = &self.employees[ei];
        if !employee.is_active() {
            return Err(AssignmentError::InactiveEmployee {
                employee_id,
                name: employee.name().to_string(),
            });
        }

        if !(MIN_ASSIGNMENT_HOURS..=MAX_ASSIGNMENT_HOURS).contains(&requested_hours) {
            return Err(AssignmentError::InvalidHours {
                requested: requested_hours,
                min: MIN_ASSIGNMENT_HOURS,
                max: MAX_ASSIGNMENT_HOURS,
            });
        }

        let pi = self.project_index(project_id)?;
        let project = &self.projects[pi];
        if project.is_completed() {
            return Err(AssignmentError::ProjectCompleted {
                project_id,
                name: project.name().to_string(),
            });
        }

        let task = project
            .task(task_id)
            .ok_or(AssignmentError::TaskNotFound {
                project_id,
                task_id,
            })?;
        if requested_hours > task.estimated_hours() {
            return Err(AssignmentError::ExceedsTaskEstimate {
                task_id,
                requested: requested_hours,
                estimated: task.estimated_hours(),
            });
        }

        let position = employee.position();
        if !rules::role_matches_phase(position, project.phase()) {
            if let Some(required) = rules::required_position(project.phase()) {
                return Err(AssignmentError::RoleMismatch {
                    employee_id,
                    position,
                    phase: project.phase(),
                    required,
                });
            }
        }
        if !rules::task_type_matches_position(task.task_type(), position) {
            return Err(AssignmentError::TaskTypeMismatch {
                task_id,
                task_type: task.task_type(),
                position,
            });
        }

        let needed = task.remaining_hours();
        if needed <= 0 {
            return Err(AssignmentError::TaskFullyAllocated {
                task_id,
                estimated: task.estimated_hours(),
                allocated: task.allocated_hours(),
            });
        }
        let to_assign = needed.min(requested_hours);

        if employee.available_hours() < to_assign {
            return Err(AssignmentError::CapacityExceeded {
                employee_id,
                capacity: employee.weekly_hours_capacity(),
                used: employee.current_weekly_hours(),
                available: employee.available_hours(),
                requested: to_assign,
            });
        }

        let budget = project.budget();
        if employee.salary() > budget {
            return Err(AssignmentError::SalaryExceedsBudget {
                employee_id,
                salary: employee.salary(),
                budget,
            });
        }

        let hourly_rate = employee.hourly_rate();
        if let Some(ceiling) = cost::max_affordable_hourly_rate(budget, project.estimated_hours()) {
            if hourly_rate > ceiling {
                return Err(AssignmentError::RateExceedsCeiling {
                    employee_id,
                    hourly_rate,
                    ceiling,
                    budget,
                    estimated_hours: project.estimated_hours(),
                });
            }
        }

        let additional_cost = cost::employee_cost(employee.salary(), to_assign);
        let current_costs = project.employee_costs();
        if current_costs + additional_cost > budget {
            return Err(AssignmentError::BudgetExceeded {
                project_id,
                budget,
                current_costs,
                additional_cost,
                remaining: budget - current_costs,
            });
        }

        let employee = &mut self.employees[ei];
        employee.add_weekly_hours(to_assign)?;
        employee.add_assigned_project(project_id);

        let project = &mut self.projects[pi];
        if let Some(task) = project.task_mut(task_id) {
            task.add_allocated_hours(to_assign);
        }
        self.ledger
            .add(AssignmentKey::new(employee_id, project_id, task_id), to_assign);
        project.add_employee_cost(additional_cost);
        project.recompute_totals_from_tasks();

        debug!(
            employee_id,
            project_id,
            task_id,
            hours = to_assign,
            cost = additional_cost,
            "assignment committed"
        );
        Ok(to_assign)
    }

    /// Sets a ledger entry to an absolute value while rebuilding state.
    ///
    /// No business rule is checked. The employee's counter grows by the
    /// difference from the previous entry when active; a capacity failure is
    /// logged and skipped.
    pub fn restore_task_assignment(
        &mut self,
        employee_id: i32,
        project_id: i32,
        task_id: i32,
        hours: i32,
    ) -> AssignmentResult<()> {
        let ei = self.employee_index(employee_id)?;
        let key = AssignmentKey::new(employee_id, project_id, task_id);
        let existing = self.ledger.set(key, hours);
        let delta = hours.max(0) - existing;

        let employee = &mut self.employees[ei];
        employee.add_to_project_history(project_id);
        if employee.is_active() {
            employee.add_assigned_project(project_id);
            if delta > 0 {
                if let Err(err) = employee.add_weekly_hours(delta) {
                    warn!(employee_id, project_id, task_id, %err, "restored hours exceed capacity");
                }
            }
        }
        Ok(())
    }
}
