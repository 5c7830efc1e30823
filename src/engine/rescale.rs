use crate::company::Company;
use crate::error::{AssignmentError, AssignmentResult};
use crate::ledger::AssignmentKey;
use tracing::{info, warn};

/// One ledger entry before and after a rescale.
#[derive(Debug, Clone, Copy)]
struct EntryChange {
    key: AssignmentKey,
    old_hours: i32,
    new_hours: i32,
}

fn total(changes: &[EntryChange]) -> i32 {
    changes
        .iter()
        .map(|c| c.new_hours)
        .fold(0, i32::saturating_add)
}

/// Shrinks `changes` until they fit in `capacity`: first proportionally, then
/// by trimming the largest entries first to absorb rounding.
fn fit_to_capacity(changes: &mut [EntryChange], capacity: i32) {
    let capacity = capacity.max(0);
    let scaled_total = total(changes);
    if scaled_total <= capacity {
        return;
    }

    let adjust = f64::from(capacity) / f64::from(scaled_total);
    for change in changes.iter_mut() {
        change.new_hours = (f64::from(change.new_hours) * adjust)
            .round()
            .clamp(0.0, f64::from(capacity)) as i32;
    }

    let mut excess = total(changes) - capacity;
    if excess <= 0 {
        return;
    }
    let mut order: Vec<usize> = (0..changes.len()).collect();
    order.sort_by(|&a, &b| changes[b].new_hours.cmp(&changes[a].new_hours));
    for idx in order {
        if excess <= 0 {
            break;
        }
        let cut = changes[idx].new_hours.min(excess);
        changes[idx].new_hours -= cut;
        excess -= cut;
    }
}

impl Company {
    /// Rescales every employee whose ledger total exceeds current capacity.
    pub fn fix_task_assignments_to_capacity(&mut self) {
        for (employee_id, assigned) in self.ledger.totals_by_employee() {
            let Some(employee) = self.employee(employee_id) else {
                continue;
            };
            let capacity = employee.weekly_hours_capacity();
            if assigned <= capacity {
                continue;
            }

            let factor = f64::from(capacity) / f64::from(assigned);
            let mut changes: Vec<EntryChange> = self
                .ledger
                .entries_for_employee(employee_id)
                .into_iter()
                .map(|(key, hours)| EntryChange {
                    key,
                    old_hours: hours,
                    new_hours: (f64::from(hours) * factor)
                        .round()
                        .clamp(0.0, f64::from(capacity)) as i32,
                })
                .collect();
            fit_to_capacity(&mut changes, capacity);
            self.apply_entry_changes(employee_id, &changes);

            let new_total = total(&changes);
            if let Ok(ei) = self.employee_index(employee_id) {
                let employee = &mut self.employees[ei];
                if employee.is_active() {
                    employee.reset_weekly_hours(new_total);
                }
            }
            warn!(
                employee_id,
                capacity,
                before = assigned,
                after = new_total,
                "ledger exceeded capacity and was scaled down"
            );
        }
    }

    /// Multiplies an employee's ledger entries by `factor`, then forces the
    /// result under capacity and reconciles every cached total. No single
    /// entry is scaled past capacity.
    pub fn scale_employee_task_assignments(
        &mut self,
        employee_id: i32,
        factor: f64,
    ) -> AssignmentResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(AssignmentError::InvalidScaleFactor(factor));
        }
        let ei = self.employee_index(employee_id)?;
        let capacity = self.employees[ei].weekly_hours_capacity();

        let mut changes: Vec<EntryChange> = self
            .ledger
            .entries_for_employee(employee_id)
            .into_iter()
            .map(|(key, hours)| EntryChange {
                key,
                old_hours: hours,
                new_hours: (f64::from(hours) * factor)
                    .round()
                    .clamp(0.0, f64::from(capacity)) as i32,
            })
            .collect();
        let before = changes
            .iter()
            .map(|c| c.old_hours)
            .fold(0, i32::saturating_add);
        fit_to_capacity(&mut changes, capacity);
        self.apply_entry_changes(employee_id, &changes);

        self.reconcile();

        let new_total = self.ledger.employee_total(employee_id);
        let employee = &mut self.employees[ei];
        if employee.is_active() {
            employee.reset_weekly_hours(new_total.min(capacity));
        }
        info!(
            employee_id,
            factor,
            capacity,
            before,
            after = new_total,
            "assignments rescaled"
        );
        Ok(())
    }

    /// Writes rescaled entries back and moves task hours and project costs by
    /// the per-entry difference.
    fn apply_entry_changes(&mut self, employee_id: i32, changes: &[EntryChange]) {
        let hourly_rate = match self.employee(employee_id) {
            Some(employee) => employee.hourly_rate(),
            None => return,
        };
        for change in changes {
            let diff = change.new_hours - change.old_hours;
            self.ledger.set(change.key, change.new_hours);
            if diff == 0 {
                continue;
            }
            let Some(project) = self
                .projects
                .iter_mut()
                .find(|p| p.id() == change.key.project_id)
            else {
                continue;
            };
            if let Some(task) = project.task_mut(change.key.task_id) {
                task.add_allocated_hours(diff);
            }
            let cost_change = hourly_rate * f64::from(diff);
            if cost_change >= 0.0 {
                project.add_employee_cost(cost_change);
            } else {
                project.remove_employee_cost(-cost_change);
            }
            project.recompute_totals_from_tasks();
        }
    }
}
