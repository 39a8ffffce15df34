use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Every successful mutation produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task: Task,
        at: DateTime<Utc>,
    },
    TaskToggled {
        id: String,
        completed: bool,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        id: String,
        at: DateTime<Utc>,
    },
    FocusStarted {
        session: u64,
        at: DateTime<Utc>,
    },
    /// Session ended and its elapsed time was folded into today's total.
    FocusStopped {
        session: u64,
        elapsed_secs: u64,
        total_today_secs: u64,
        at: DateTime<Utc>,
    },
    /// The day key changed; the previous day's total was dropped.
    FocusTotalReset {
        date: NaiveDate,
        discarded_secs: u64,
        at: DateTime<Utc>,
    },
    BlockedSiteAdded {
        domain: String,
        at: DateTime<Utc>,
    },
    BlockedSiteRemoved {
        domain: String,
        at: DateTime<Utc>,
    },
}
