//! Display order for tasks.
//!
//! Incomplete tasks come before completed ones; inside each group tasks are
//! ordered high, medium, low. Equal keys keep their input order.

use super::Task;

/// Order tasks for display without touching the input.
pub fn order_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    // `sort_by_key` is stable.
    ordered.sort_by_key(|t| (t.completed, t.priority.rank()));
    ordered
}
