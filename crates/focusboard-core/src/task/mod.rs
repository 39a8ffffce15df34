//! Task model and derived bookkeeping.
//!
//! A task is a label with a priority, a completion flag and a time estimate
//! in minutes. Ordering lives in [`ordering`], the persisted collection in
//! [`store`].

pub mod ordering;
pub mod store;

pub use ordering::order_tasks;
pub use store::TaskStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority.
///
/// Declaration order is the sort order: `High` sorts first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high(0) < medium(1) < low(2).
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}' (expected high, medium or low)")),
        }
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque id, unique within a store, never changes
    pub id: String,
    /// Non-empty label
    pub text: String,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    /// Estimated effort in minutes
    #[serde(default)]
    pub time_estimate: u32,
}

/// Completion and estimate totals over a task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub completed: usize,
    pub total: usize,
    /// Whole percent, 0 when there are no tasks
    pub completion_rate: u32,
    /// Sum of estimates over all tasks
    pub estimated_minutes: u64,
    /// Sum of estimates over incomplete tasks
    pub remaining_minutes: u64,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let estimated_minutes = tasks.iter().map(|t| u64::from(t.time_estimate)).sum();
        let remaining_minutes = tasks
            .iter()
            .filter(|t| !t.completed)
            .map(|t| u64::from(t.time_estimate))
            .sum();

        // Rounded half up, integer-only.
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed * 200 + total) / (total * 2)) as u32
        };

        Self {
            completed,
            total,
            completion_rate,
            estimated_minutes,
            remaining_minutes,
        }
    }
}
