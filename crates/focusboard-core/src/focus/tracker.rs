//! Focus session state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --stop--> Idle
//! ```
//!
//! While `Running`, each matching [`Tick`] adds one second. `stop` cancels
//! the ticker, applies the day-boundary rule, then folds the elapsed seconds
//! into the day's total and persists it. A session that crosses midnight is
//! credited in full to the day it is stopped on.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use super::{DailyFocusTotal, FocusSession, FocusTicker, Tick};
use crate::error::FocusError;
use crate::events::Event;
use crate::storage::{read_or_absent, write_through, KeyValueStore, LAST_DATE_KEY, TOTAL_FOCUS_KEY};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusState {
    Idle,
    Running,
}

pub struct FocusSessionTracker<S> {
    store: S,
    daily: DailyFocusTotal,
    session: Option<FocusSession>,
    ticker: Option<FocusTicker>,
    next_session_id: u64,
}

impl<S: KeyValueStore> FocusSessionTracker<S> {
    /// Load today's total, resetting it when the stored day is not `today`.
    ///
    /// Returns the reset event when a rollover happened.
    pub fn load(store: S, today: NaiveDate, now: DateTime<Utc>) -> (Self, Option<Event>) {
        let stored_date = read_or_absent(&store, LAST_DATE_KEY)
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok());
        let stored_total = read_or_absent(&store, TOTAL_FOCUS_KEY)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);

        // An unknown day is treated like a stale one: start from zero.
        let daily = DailyFocusTotal {
            date: stored_date.unwrap_or(NaiveDate::MIN),
            total_secs: stored_total,
        };

        let mut tracker = Self {
            store,
            daily,
            session: None,
            ticker: None,
            next_session_id: 1,
        };
        let reset = tracker.roll_over(today, now);
        (tracker, reset)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> FocusState {
        if self.session.is_some() {
            FocusState::Running
        } else {
            FocusState::Idle
        }
    }

    pub fn session(&self) -> Option<&FocusSession> {
        self.session.as_ref()
    }

    /// Seconds counted in the running session, 0 when idle.
    pub fn elapsed_secs(&self) -> u64 {
        self.session.as_ref().map(|s| s.elapsed_secs).unwrap_or(0)
    }

    pub fn daily_total(&self) -> DailyFocusTotal {
        self.daily
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a session. The caller drives it with [`tick`](Self::tick).
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<Event, FocusError> {
        if self.session.is_some() {
            return Err(FocusError::AlreadyRunning);
        }
        let id = self.next_session_id;
        self.next_session_id += 1;
        self.session = Some(FocusSession {
            id,
            started_at: now,
            elapsed_secs: 0,
        });
        info!(session = id, "focus session started");
        Ok(Event::FocusStarted {
            session: id,
            at: now,
        })
    }

    /// Begin a session and spawn a [`FocusTicker`] feeding `tx`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_ticking(
        &mut self,
        now: DateTime<Utc>,
        period: Duration,
        tx: UnboundedSender<Tick>,
    ) -> Result<Event, FocusError> {
        let event = self.start(now)?;
        if let Some(session) = &self.session {
            self.ticker = Some(FocusTicker::spawn(session.id, period, tx));
        }
        Ok(event)
    }

    /// Count one second. Ticks for another session, or while idle, are ignored.
    ///
    /// Returns the new elapsed count when the tick was applied.
    pub fn tick(&mut self, tick: Tick) -> Option<u64> {
        match self.session.as_mut() {
            Some(session) if session.id == tick.session => {
                session.elapsed_secs = session.elapsed_secs.saturating_add(1);
                Some(session.elapsed_secs)
            }
            _ => {
                debug!(session = tick.session, "ignoring stale tick");
                None
            }
        }
    }

    /// Reset the total when `today` is not the recorded day. Both keys are
    /// written on reset.
    pub fn roll_over(&mut self, today: NaiveDate, now: DateTime<Utc>) -> Option<Event> {
        if self.daily.is_for(today) {
            return None;
        }
        let discarded_secs = self.daily.total_secs;
        self.daily = DailyFocusTotal::new(today);
        write_through(&self.store, LAST_DATE_KEY, &today.format(DATE_FORMAT).to_string());
        write_through(&self.store, TOTAL_FOCUS_KEY, "0");
        info!(%today, discarded_secs, "focus total reset for new day");
        Some(Event::FocusTotalReset {
            date: today,
            discarded_secs,
            at: now,
        })
    }

    /// End the running session and fold it into today's total.
    ///
    /// Returns no events when idle. Otherwise the rollover event (if the day
    /// changed) comes before the stop event.
    pub fn stop(&mut self, today: NaiveDate, now: DateTime<Utc>) -> Vec<Event> {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        let Some(session) = self.session.take() else {
            return Vec::new();
        };

        let mut events = Vec::with_capacity(2);
        events.extend(self.roll_over(today, now));

        self.daily.total_secs = self.daily.total_secs.saturating_add(session.elapsed_secs);
        write_through(
            &self.store,
            TOTAL_FOCUS_KEY,
            &self.daily.total_secs.to_string(),
        );
        info!(
            session = session.id,
            elapsed_secs = session.elapsed_secs,
            total_secs = self.daily.total_secs,
            "focus session stopped"
        );
        events.push(Event::FocusStopped {
            session: session.id,
            elapsed_secs: session.elapsed_secs,
            total_today_secs: self.daily.total_secs,
            at: now,
        });
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn seeded(date: &str, total: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.set(LAST_DATE_KEY, date).unwrap();
        store.set(TOTAL_FOCUS_KEY, total).unwrap();
        store
    }

    fn run_for(tracker: &mut FocusSessionTracker<MemoryStore>, secs: u64) {
        let id = tracker.session().unwrap().id;
        for _ in 0..secs {
            tracker.tick(Tick { session: id });
        }
    }

    #[test]
    fn load_keeps_total_for_same_day() {
        let (tracker, reset) = FocusSessionTracker::load(seeded("2026-10-18", "500"), day(18), Utc::now());
        assert!(reset.is_none());
        assert_eq!(tracker.daily_total().total_secs, 500);
        assert_eq!(tracker.state(), FocusState::Idle);
    }

    #[test]
    fn load_resets_stale_day() {
        let store = seeded("2026-10-17", "500");
        let (tracker, reset) = FocusSessionTracker::load(store.clone(), day(18), Utc::now());

        assert_eq!(tracker.daily_total(), DailyFocusTotal::new(day(18)));
        assert!(matches!(
            reset,
            Some(Event::FocusTotalReset { discarded_secs: 500, .. })
        ));
        assert_eq!(store.get(TOTAL_FOCUS_KEY).unwrap().as_deref(), Some("0"));
        assert_eq!(store.get(LAST_DATE_KEY).unwrap().as_deref(), Some("2026-10-18"));
    }

    #[test]
    fn first_run_records_today() {
        let store = MemoryStore::new();
        let (tracker, _) = FocusSessionTracker::load(store.clone(), day(18), Utc::now());
        assert_eq!(tracker.daily_total().total_secs, 0);
        assert_eq!(store.get(LAST_DATE_KEY).unwrap().as_deref(), Some("2026-10-18"));
    }

    #[test]
    fn garbage_total_counts_as_zero() {
        let (tracker, _) = FocusSessionTracker::load(seeded("2026-10-18", "lots"), day(18), Utc::now());
        assert_eq!(tracker.daily_total().total_secs, 0);
    }

    #[test]
    fn session_accounting_adds_exact_elapsed() {
        let store = seeded("2026-10-18", "40");
        let (mut tracker, _) = FocusSessionTracker::load(store.clone(), day(18), Utc::now());

        tracker.start(Utc::now()).unwrap();
        run_for(&mut tracker, 125);
        assert_eq!(tracker.elapsed_secs(), 125);

        let events = tracker.stop(day(18), Utc::now());
        assert_eq!(events.len(), 1);
        assert_eq!(tracker.daily_total().total_secs, 165);
        assert_eq!(tracker.elapsed_secs(), 0);
        assert_eq!(tracker.state(), FocusState::Idle);
        assert_eq!(store.get(TOTAL_FOCUS_KEY).unwrap().as_deref(), Some("165"));
    }

    #[test]
    fn start_while_running_is_rejected() {
        let (mut tracker, _) = FocusSessionTracker::load(MemoryStore::new(), day(18), Utc::now());
        tracker.start(Utc::now()).unwrap();
        run_for(&mut tracker, 3);

        assert_eq!(tracker.start(Utc::now()), Err(FocusError::AlreadyRunning));
        assert_eq!(tracker.elapsed_secs(), 3);
    }

    #[test]
    fn stop_while_idle_is_a_no_op() {
        let store = seeded("2026-10-18", "12");
        let (mut tracker, _) = FocusSessionTracker::load(store.clone(), day(18), Utc::now());
        assert!(tracker.stop(day(18), Utc::now()).is_empty());
        assert_eq!(tracker.daily_total().total_secs, 12);
    }

    #[test]
    fn stale_ticks_are_ignored() {
        let (mut tracker, _) = FocusSessionTracker::load(MemoryStore::new(), day(18), Utc::now());
        tracker.start(Utc::now()).unwrap();
        let first = tracker.session().unwrap().id;
        run_for(&mut tracker, 2);
        tracker.stop(day(18), Utc::now());

        // late tick for the finished session, while idle
        assert_eq!(tracker.tick(Tick { session: first }), None);

        tracker.start(Utc::now()).unwrap();
        assert_eq!(tracker.tick(Tick { session: first }), None);
        assert_eq!(tracker.elapsed_secs(), 0);
        assert_eq!(tracker.daily_total().total_secs, 2);
    }

    #[test]
    fn cross_midnight_session_credits_the_new_day() {
        let store = seeded("2026-10-18", "300");
        let (mut tracker, _) = FocusSessionTracker::load(store.clone(), day(18), Utc::now());

        tracker.start(Utc::now()).unwrap();
        run_for(&mut tracker, 90);
        let events = tracker.stop(day(19), Utc::now());

        assert!(matches!(events[0], Event::FocusTotalReset { discarded_secs: 300, .. }));
        assert!(matches!(
            events[1],
            Event::FocusStopped { elapsed_secs: 90, total_today_secs: 90, .. }
        ));
        assert_eq!(tracker.daily_total(), DailyFocusTotal { date: day(19), total_secs: 90 });
        assert_eq!(store.get(LAST_DATE_KEY).unwrap().as_deref(), Some("2026-10-19"));
        assert_eq!(store.get(TOTAL_FOCUS_KEY).unwrap().as_deref(), Some("90"));
    }

    #[tokio::test]
    async fn ticker_drives_session_and_stops_with_it() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let (mut tracker, _) = FocusSessionTracker::load(MemoryStore::new(), day(18), Utc::now());
        tracker
            .start_ticking(Utc::now(), Duration::from_millis(5), tx)
            .unwrap();
        assert!(tracker.is_ticking());

        while tracker.elapsed_secs() < 3 {
            let tick = rx.recv().await.unwrap();
            tracker.tick(tick);
        }
        tracker.stop(day(18), Utc::now());
        assert!(!tracker.is_ticking());
        let total = tracker.daily_total().total_secs;
        assert_eq!(total, 3);

        // anything still buffered must not move the total
        while let Some(tick) = rx.recv().await {
            tracker.tick(tick);
        }
        assert_eq!(tracker.daily_total().total_secs, total);
    }
}
