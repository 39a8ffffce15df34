//! The persisted task collection.
//!
//! Every successful mutation rewrites the whole collection under
//! [`TASKS_KEY`] with a single `set`. Rejected mutations write nothing.

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{order_tasks, Priority, Task, TaskSummary};
use crate::error::Rejection;
use crate::events::Event;
use crate::storage::{read_json, write_json, KeyValueStore, TASKS_KEY};

pub struct TaskStore<S> {
    store: S,
    tasks: Vec<Task>,
    /// Highest millisecond id handed out or loaded so far.
    last_issued_ms: i64,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the collection from `store`. Missing or unreadable data starts empty.
    pub fn load(store: S) -> Self {
        let tasks: Vec<Task> = read_json(&store, TASKS_KEY).unwrap_or_default();
        let last_issued_ms = tasks
            .iter()
            .filter_map(|t| t.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        debug!(count = tasks.len(), "loaded tasks");
        Self {
            store,
            tasks,
            last_issued_ms,
        }
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tasks in display order.
    pub fn ordered(&self) -> Vec<&Task> {
        order_tasks(&self.tasks)
    }

    pub fn summary(&self) -> TaskSummary {
        TaskSummary::from_tasks(&self.tasks)
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn add(
        &mut self,
        text: &str,
        priority: Priority,
        time_estimate: u32,
        now: DateTime<Utc>,
    ) -> Result<Event, Rejection> {
        let text = text.trim();
        if text.is_empty() {
            debug!("rejected task with empty text");
            return Err(Rejection::EmptyText);
        }

        let task = Task {
            id: self.next_id(now),
            text: text.to_string(),
            priority,
            completed: false,
            time_estimate,
        };
        self.tasks.push(task.clone());
        self.persist();
        debug!(id = %task.id, %priority, "task added");
        Ok(Event::TaskAdded { task, at: now })
    }

    pub fn toggle(&mut self, id: &str, now: DateTime<Utc>) -> Result<Event, Rejection> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Rejection::TaskNotFound(id.to_string()))?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.persist();
        debug!(id, completed, "task toggled");
        Ok(Event::TaskToggled {
            id: id.to_string(),
            completed,
            at: now,
        })
    }

    pub fn delete(&mut self, id: &str, now: DateTime<Utc>) -> Result<Event, Rejection> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| Rejection::TaskNotFound(id.to_string()))?;
        self.tasks.remove(index);
        self.persist();
        debug!(id, "task deleted");
        Ok(Event::TaskDeleted {
            id: id.to_string(),
            at: now,
        })
    }

    /// Millisecond timestamp id, bumped past anything already issued.
    ///
    /// When the id space above is exhausted the search continues downward.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let start = now
            .timestamp_millis()
            .max(self.last_issued_ms.saturating_add(1));
        let taken = |candidate: i64| {
            let candidate = candidate.to_string();
            self.tasks.iter().any(|t| t.id == candidate)
        };
        let id = (start..=i64::MAX)
            .find(|c| !taken(*c))
            .or_else(|| (0..start).rev().find(|c| !taken(*c)))
            .unwrap_or(start);
        self.last_issued_ms = self.last_issued_ms.max(id);
        id.to_string()
    }

    fn persist(&self) {
        write_json(&self.store, TASKS_KEY, &self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn at_ms(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn add_appends_incomplete_task() {
        let mut store = TaskStore::load(MemoryStore::new());
        let event = store
            .add("Write report", Priority::High, 45, at_ms(1_000))
            .unwrap();

        let Event::TaskAdded { task, .. } = event else {
            panic!("expected TaskAdded");
        };
        assert_eq!(task.id, "1000");
        assert_eq!(task.text, "Write report");
        assert!(!task.completed);
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn add_trims_and_rejects_blank_text() {
        let backing = MemoryStore::new();
        let mut store = TaskStore::load(backing.clone());

        assert_eq!(
            store.add("   ", Priority::Low, 10, at_ms(1)),
            Err(Rejection::EmptyText)
        );
        assert!(store.tasks().is_empty());
        assert!(backing.get(TASKS_KEY).unwrap().is_none());

        store.add("  padded  ", Priority::Low, 10, at_ms(2)).unwrap();
        assert_eq!(store.tasks()[0].text, "padded");
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut store = TaskStore::load(MemoryStore::new());
        let now = at_ms(5_000);
        store.add("one", Priority::Medium, 0, now).unwrap();
        store.add("two", Priority::Medium, 0, now).unwrap();
        store.add("three", Priority::Medium, 0, at_ms(4_000)).unwrap();

        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["5000", "5001", "5002"]);
    }

    #[test]
    fn ids_continue_past_loaded_tasks() {
        let backing = MemoryStore::new();
        {
            let mut first = TaskStore::load(backing.clone());
            first.add("old", Priority::Medium, 0, at_ms(9_000)).unwrap();
        }
        let mut reloaded = TaskStore::load(backing);
        reloaded.add("new", Priority::Medium, 0, at_ms(9_000)).unwrap();
        assert_eq!(reloaded.tasks()[1].id, "9001");
    }

    #[test]
    fn ids_do_not_overflow_after_the_largest_id() {
        let backing = MemoryStore::new();
        let max_id = Task {
            id: i64::MAX.to_string(),
            text: "imported".into(),
            priority: Priority::Low,
            completed: false,
            time_estimate: 5,
        };
        backing
            .set(TASKS_KEY, &serde_json::to_string(&vec![max_id]).unwrap())
            .unwrap();

        let mut store = TaskStore::load(backing);
        store.add("next", Priority::Medium, 0, at_ms(1_000)).unwrap();
        store.add("after", Priority::Medium, 0, at_ms(1_000)).unwrap();

        let mut ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3, "ids must stay unique");
    }

    #[test]
    fn toggle_flips_and_persists() {
        let backing = MemoryStore::new();
        let mut store = TaskStore::load(backing.clone());
        store.add("task", Priority::Medium, 5, at_ms(1)).unwrap();

        store.toggle("1", at_ms(2)).unwrap();
        assert!(store.get("1").unwrap().completed);
        assert!(TaskStore::load(backing.clone()).get("1").unwrap().completed);

        store.toggle("1", at_ms(3)).unwrap();
        assert!(!TaskStore::load(backing).get("1").unwrap().completed);
    }

    #[test]
    fn toggle_unknown_id_is_rejected() {
        let mut store = TaskStore::load(MemoryStore::new());
        assert_eq!(
            store.toggle("nope", at_ms(1)),
            Err(Rejection::TaskNotFound("nope".into()))
        );
    }

    #[test]
    fn delete_removes_only_the_match() {
        let mut store = TaskStore::load(MemoryStore::new());
        store.add("keep", Priority::Medium, 0, at_ms(1)).unwrap();
        store.add("drop", Priority::Medium, 0, at_ms(2)).unwrap();

        store.delete("2", at_ms(3)).unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].text, "keep");
        assert!(store.delete("2", at_ms(4)).is_err());
    }

    #[test]
    fn unreadable_collection_loads_empty() {
        let backing = MemoryStore::new();
        backing.set(TASKS_KEY, "not json").unwrap();
        assert!(TaskStore::load(backing).tasks().is_empty());
    }
}
