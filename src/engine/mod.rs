//! Assignment operations over a [`Company`](crate::Company).
//!
//! Each submodule adds an `impl Company` block:
//! - `assign`: validated single assignment and permissive replay
//! - `auto_assign`: greedy project-wide staffing
//! - `rescale`: shrinking ledger entries to fit capacity
//! - `reconcile`: rebuilding cached totals from the ledger
//! - `lifecycle`: firing, removal, record edits and project edits

mod assign;
mod auto_assign;
mod lifecycle;
mod reconcile;
mod rescale;

pub use assign::{MAX_ASSIGNMENT_HOURS, MIN_ASSIGNMENT_HOURS};
pub use auto_assign::AutoAssignSummary;
