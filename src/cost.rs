/// Working hours in a month. Every cost figure in the crate converts a monthly
/// salary to an hourly rate with this constant.
pub const HOURS_PER_MONTH: f64 = 160.0;

/// Share of a project's average budget per estimated hour that a single
/// employee's hourly rate may reach.
pub const MAX_AFFORDABLE_RATE_MULTIPLIER: f64 = 0.7;

pub fn hourly_rate(monthly_salary: f64) -> f64 {
    monthly_salary / HOURS_PER_MONTH
}

pub fn employee_cost(monthly_salary: f64, hours: i32) -> f64 {
    hourly_rate(monthly_salary) * f64::from(hours)
}

/// Affordability ceiling for a project. `None` when the project carries no
/// estimate, in which case the ceiling does not apply.
pub fn max_affordable_hourly_rate(budget: f64, estimated_hours: i32) -> Option<f64> {
    if estimated_hours <= 0 {
        return None;
    }
    Some(budget / f64::from(estimated_hours) * MAX_AFFORDABLE_RATE_MULTIPLIER)
}

/// Whole hours of work `remaining_budget` still pays for at `rate`.
/// `None` for a zero rate: such an employee is bounded by time only.
pub fn max_affordable_hours(remaining_budget: f64, rate: f64) -> Option<i32> {
    if rate <= 0.0 {
        return None;
    }
    if remaining_budget <= 0.0 {
        return Some(0);
    }
    Some((remaining_budget / rate).floor().min(f64::from(i32::MAX)) as i32)
}
