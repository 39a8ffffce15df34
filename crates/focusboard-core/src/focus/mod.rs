//! Focus session accounting.
//!
//! A stopwatch-style session counts whole seconds while running. Stopping it
//! folds the count into a total that belongs to one calendar day; when the
//! day changes the total starts again from zero.

mod ticker;
mod tracker;

pub use ticker::{FocusTicker, Tick};
pub use tracker::{FocusSessionTracker, FocusState};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An in-progress session. Lives only in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    /// Sequence number used to match ticks to the session that asked for them.
    pub id: u64,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: u64,
}

/// Seconds of focus attributed to one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyFocusTotal {
    pub date: NaiveDate,
    pub total_secs: u64,
}

impl DailyFocusTotal {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_secs: 0,
        }
    }

    pub fn is_for(&self, day: NaiveDate) -> bool {
        self.date == day
    }
}

/// Render seconds as `HH:MM:SS`. Hours widen past two digits when needed.
pub fn format_hms(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
