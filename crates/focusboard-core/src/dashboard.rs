//! The dashboard state object.
//!
//! [`Dashboard`] owns every piece of in-memory state and is the single entry
//! point for user events. Opening it performs the startup load: tasks,
//! watchlist and today's focus total are read from the store and the
//! day-rollover check runs before anything else can accumulate.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::blocklist::BlockedSites;
use crate::clock::{Clock, SystemClock};
use crate::error::{FocusError, Rejection};
use crate::events::Event;
use crate::focus::{format_hms, FocusSessionTracker, FocusState, Tick};
use crate::storage::{Config, KeyValueStore};
use crate::task::{Priority, Task, TaskStore, TaskSummary};
use crate::tips::DailyTipSelector;

/// Focus numbers for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSnapshot {
    pub state: FocusState,
    pub elapsed_secs: u64,
    pub date: NaiveDate,
    pub total_today_secs: u64,
    /// `total_today_secs` as `HH:MM:SS`
    pub total_today: String,
}

/// Everything a view needs, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub tip: Option<String>,
    pub tasks: Vec<Task>,
    pub summary: TaskSummary,
    pub focus: FocusSnapshot,
    pub blocked_sites: Vec<String>,
}

pub struct Dashboard<S, C = SystemClock> {
    clock: C,
    config: Config,
    tips: DailyTipSelector,
    tasks: TaskStore<S>,
    focus: FocusSessionTracker<S>,
    sites: BlockedSites<S>,
}

impl<S: KeyValueStore + Clone, C: Clock> Dashboard<S, C> {
    /// Load all persisted state and apply the day-rollover rule.
    pub fn open(store: S, clock: C, config: Config) -> Self {
        let (focus, reset) =
            FocusSessionTracker::load(store.clone(), clock.today(), clock.now_utc());
        if let Some(Event::FocusTotalReset { date, discarded_secs, .. }) = reset {
            info!(%date, discarded_secs, "started a new focus day");
        }
        let tasks = TaskStore::load(store.clone());
        let sites = BlockedSites::load(store, &config.blocklist.defaults);
        let tips = DailyTipSelector::new(config.tips.clone());

        Self {
            clock,
            config,
            tips,
            tasks,
            focus,
            sites,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ── Tasks ────────────────────────────────────────────────────────

    /// Add a task. `None` fields take the configured defaults.
    pub fn add_task(
        &mut self,
        text: &str,
        priority: Option<Priority>,
        time_estimate: Option<u32>,
    ) -> Result<Event, Rejection> {
        let priority = priority.unwrap_or(self.config.tasks.default_priority);
        let time_estimate = time_estimate.unwrap_or(self.config.tasks.default_time_estimate);
        self.tasks
            .add(text, priority, time_estimate, self.clock.now_utc())
    }

    pub fn toggle_task(&mut self, id: &str) -> Result<Event, Rejection> {
        self.tasks.toggle(id, self.clock.now_utc())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Event, Rejection> {
        self.tasks.delete(id, self.clock.now_utc())
    }

    /// Tasks in display order.
    pub fn tasks(&self) -> Vec<&Task> {
        self.tasks.ordered()
    }

    pub fn task_summary(&self) -> TaskSummary {
        self.tasks.summary()
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Start a session driven by explicit [`on_tick`](Self::on_tick) calls.
    pub fn start_focus(&mut self) -> Result<Event, FocusError> {
        self.focus.start(self.clock.now_utc())
    }

    /// Start a session with a ticker that sends to `tx` every configured
    /// interval. Must be called from within a tokio runtime.
    pub fn start_focus_ticking(&mut self, tx: UnboundedSender<Tick>) -> Result<Event, FocusError> {
        let period = Duration::from_millis(self.config.focus.tick_interval_ms.max(1));
        self.focus.start_ticking(self.clock.now_utc(), period, tx)
    }

    pub fn on_tick(&mut self, tick: Tick) -> Option<u64> {
        self.focus.tick(tick)
    }

    /// Stop the running session. Empty when nothing was running.
    pub fn stop_focus(&mut self) -> Vec<Event> {
        self.focus.stop(self.clock.today(), self.clock.now_utc())
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    pub fn focus_elapsed_secs(&self) -> u64 {
        self.focus.elapsed_secs()
    }

    /// Re-run the day-boundary check against the clock.
    pub fn refresh_day(&mut self) -> Option<Event> {
        self.focus.roll_over(self.clock.today(), self.clock.now_utc())
    }

    /// Today's accumulated focus seconds, after the day-boundary check.
    pub fn total_focus_today(&mut self) -> u64 {
        self.refresh_day();
        self.focus.daily_total().total_secs
    }

    // ── Tip ──────────────────────────────────────────────────────────

    pub fn daily_tip(&self) -> Option<&str> {
        self.tips.tip_for(self.clock.today())
    }

    // ── Watchlist ────────────────────────────────────────────────────

    pub fn blocked_sites(&self) -> &[String] {
        self.sites.sites()
    }

    pub fn add_blocked_site(&mut self, domain: &str) -> Result<Event, Rejection> {
        self.sites.add(domain, self.clock.now_utc())
    }

    pub fn remove_blocked_site(&mut self, domain: &str) -> Result<Event, Rejection> {
        self.sites.remove(domain, self.clock.now_utc())
    }

    // ── Snapshot ─────────────────────────────────────────────────────

    pub fn snapshot(&mut self) -> DashboardSnapshot {
        self.refresh_day();
        let daily = self.focus.daily_total();
        DashboardSnapshot {
            tip: self.daily_tip().map(String::from),
            tasks: self.tasks().into_iter().cloned().collect(),
            summary: self.task_summary(),
            focus: FocusSnapshot {
                state: self.focus.state(),
                elapsed_secs: self.focus.elapsed_secs(),
                date: daily.date,
                total_today_secs: daily.total_secs,
                total_today: format_hms(daily.total_secs),
            },
            blocked_sites: self.sites.sites().to_vec(),
        }
    }
}
