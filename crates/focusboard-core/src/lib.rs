//! # Focusboard Core Library
//!
//! Business logic for a single-user productivity dashboard: a prioritized
//! task list, a stopwatch-style focus timer with a per-day total, a daily
//! rotating tip and a distraction watchlist. The CLI binary is a thin layer
//! over the same library.
//!
//! ## Architecture
//!
//! - **Dashboard**: the one owned state object; every user event goes
//!   through it and every mutation is mirrored to the store before it returns
//! - **Task ordering**: a pure stable sort (incomplete first, then
//!   high/medium/low)
//! - **Focus tracker**: an `Idle`/`Running` state machine driven by a
//!   cancelable tick, with a total that resets when the calendar day changes
//! - **Storage**: a key-value port with SQLite and in-memory backends, plus
//!   TOML configuration
//!
//! ## Key Components
//!
//! - [`Dashboard`]: state owner and event entry point
//! - [`order_tasks`]: display ordering
//! - [`FocusSessionTracker`]: session accounting
//! - [`KeyValueStore`]: persistence port
//! - [`Config`]: application configuration

pub mod blocklist;
pub mod clock;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod focus;
pub mod storage;
pub mod task;
pub mod tips;

pub use blocklist::BlockedSites;
pub use clock::{Clock, ManualClock, SystemClock};
pub use dashboard::{Dashboard, DashboardSnapshot, FocusSnapshot};
pub use error::{ConfigError, CoreError, FocusError, Rejection, StoreError};
pub use events::Event;
pub use focus::{
    format_hms, DailyFocusTotal, FocusSession, FocusSessionTracker, FocusState, FocusTicker, Tick,
};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore, StoreBackend};
pub use task::{order_tasks, Priority, Task, TaskStore, TaskSummary};
pub use tips::DailyTipSelector;
