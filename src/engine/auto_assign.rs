use crate::company::Company;
use crate::cost;
use crate::error::{AssignmentError, AssignmentResult};
use crate::ledger::AssignmentKey;
use crate::rules;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// What one auto-assign pass committed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoAssignSummary {
    pub assignments: usize,
    pub hours_assigned: i32,
    pub cost_added: f64,
    /// Hours committed per employee id during the pass.
    pub employee_usage: BTreeMap<i32, i32>,
}

struct Candidate {
    index: usize,
    hourly_rate: f64,
    truly_available: i32,
}

impl Company {
    /// Greedily staffs every task of a project from the whole active workforce.
    ///
    /// Tasks are visited by priority, then by hours still needed; for each
    /// task the cheapest eligible employees go first, ties broken by who has
    /// more free time. Infeasible candidates are skipped, so a project nobody
    /// can work on simply gets no hours.
    pub fn auto_assign_employees_to_project(
        &mut self,
        project_id: i32,
    ) -> AssignmentResult<AutoAssignSummary> {
        let pi = self.project_index(project_id)?;
        let project = &self.projects[pi];
        if project.is_completed() {
            return Err(AssignmentError::ProjectCompleted {
                project_id,
                name: project.name().to_string(),
            });
        }
        if project.tasks().is_empty() {
            return Err(AssignmentError::NoTasks(project_id));
        }

        let phase = project.phase();
        let budget = project.budget();
        let ceiling = cost::max_affordable_hourly_rate(budget, project.estimated_hours());

        let mut task_order: Vec<(i32, i32, i32)> = project
            .tasks()
            .iter()
            .map(|task| (task.id(), task.priority(), task.remaining_hours()))
            .collect();
        task_order.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));

        let pass_start_available: BTreeMap<i32, i32> = self
            .employees
            .iter()
            .filter(|e| e.is_active())
            .map(|e| (e.id(), e.available_hours()))
            .collect();

        let mut summary = AutoAssignSummary::default();
        let mut current_costs = project.employee_costs();
        let mut remaining_budget = budget - current_costs;

        for (task_id, _, _) in task_order {
            let Some(task) = self.projects[pi].task(task_id) else {
                continue;
            };
            let mut remaining = task.remaining_hours();
            if remaining <= 0 {
                continue;
            }
            let task_type = task.task_type();

            let mut pool: Vec<Candidate> = self
                .employees
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_active())
                .filter(|(_, e)| rules::role_matches_phase(e.position(), phase))
                .filter(|(_, e)| rules::task_type_matches_position(task_type, e.position()))
                .filter(|(_, e)| e.salary() <= budget)
                .filter(|(_, e)| ceiling.is_none_or(|limit| e.hourly_rate() <= limit))
                .filter_map(|(index, e)| {
                    let start = pass_start_available.get(&e.id()).copied().unwrap_or(0);
                    let used = summary.employee_usage.get(&e.id()).copied().unwrap_or(0);
                    let truly_available = start - used;
                    (truly_available > 0).then(|| Candidate {
                        index,
                        hourly_rate: e.hourly_rate(),
                        truly_available,
                    })
                })
                .collect();
            pool.sort_by(|a, b| match a.hourly_rate.total_cmp(&b.hourly_rate) {
                Ordering::Equal => b.truly_available.cmp(&a.truly_available),
                other => other,
            });

            for candidate in pool {
                let mut to_assign = remaining.min(candidate.truly_available);
                if let Some(affordable) =
                    cost::max_affordable_hours(remaining_budget, candidate.hourly_rate)
                {
                    to_assign = to_assign.min(affordable);
                }
                if to_assign <= 0 {
                    continue;
                }
                let employee = &mut self.employees[candidate.index];
                let assignment_cost = cost::employee_cost(employee.salary(), to_assign);
                if current_costs + assignment_cost > budget {
                    continue;
                }
                if let Err(err) = employee.add_weekly_hours(to_assign) {
                    warn!(employee_id = employee.id(), %err, "auto-assign candidate lost capacity");
                    continue;
                }
                employee.add_assigned_project(project_id);
                let employee_id = employee.id();

                if let Some(task) = self.projects[pi].task_mut(task_id) {
                    task.add_allocated_hours(to_assign);
                }
                self.ledger
                    .add(AssignmentKey::new(employee_id, project_id, task_id), to_assign);
                *summary.employee_usage.entry(employee_id).or_insert(0) += to_assign;
                current_costs += assignment_cost;
                remaining_budget -= assignment_cost;
                remaining -= to_assign;
                summary.assignments += 1;
                summary.hours_assigned += to_assign;

                debug!(employee_id, project_id, task_id, hours = to_assign, "auto-assigned");
                if remaining <= 0 {
                    break;
                }
            }
        }

        summary.cost_added = summary
            .employee_usage
            .iter()
            .filter_map(|(id, hours)| {
                self.employee(*id)
                    .map(|e| cost::employee_cost(e.salary(), *hours))
            })
            .sum();
        let project = &mut self.projects[pi];
        project.add_employee_cost(summary.cost_added);
        project.recompute_totals_from_tasks();

        info!(
            project_id,
            assignments = summary.assignments,
            hours = summary.hours_assigned,
            cost = summary.cost_added,
            "auto-assign finished"
        );
        Ok(summary)
    }
}
