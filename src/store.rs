//! In-memory task store with canonical priority ordering.
//!
//! The store owns the ordered collection of [`TaskRecord`]s. Every mutation
//! re-establishes the canonical order (priority descending, importance
//! descending, creation time ascending), so readers never observe a stale
//! ordering. Persistence is layered on top by [`crate::persist`].

use chrono::NaiveDateTime;

use crate::error::StoreError;
use crate::task::{TaskId, TaskRecord};

/// Inclusive bounds for importance and cost scores.
///
/// The midpoint (`split`) is only used by presentation surfaces to draw
/// quadrant boundaries; it never affects ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Create a range. `min` must be below `max`.
    pub fn new(min: f64, max: f64) -> Self {
        debug_assert!(min < max, "value range must be non-empty");
        Self { min, max }
    }

    /// Midpoint of the range, the quadrant boundary for plots.
    pub fn split(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Width of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether `value` lies within the range (inclusive).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ValueRange {
    /// The classic 1–4 scale.
    fn default() -> Self {
        Self::new(1.0, 4.0)
    }
}

/// Ordered collection of tasks, keyed by [`TaskId`].
///
/// Enumeration order always equals the canonical sort order after any
/// mutation. Ids are allocated sequentially and survive re-sorts; they are
/// never reused within a store instance.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<TaskRecord>,
    range: ValueRange,
    next_id: u64,
}

impl TaskStore {
    /// Create an empty store with the given score range.
    pub fn new(range: ValueRange) -> Self {
        Self {
            tasks: Vec::new(),
            range,
            next_id: 1,
        }
    }

    /// Build a store from already-constructed records (the load path).
    ///
    /// The id counter resumes past the highest id present, and the canonical
    /// order is established immediately.
    pub fn from_records(records: Vec<TaskRecord>, range: ValueRange) -> Self {
        let next_id = records.iter().map(|t| t.id().get()).max().unwrap_or(0) + 1;
        let mut store = Self {
            tasks: records,
            range,
            next_id,
        };
        store.sort();
        store
    }

    /// Add a new task. Returns its id.
    ///
    /// Validates that cost is non-zero and that both scores lie within the
    /// configured range, then computes priority, inserts, and re-sorts.
    pub fn add(
        &mut self,
        description: impl Into<String>,
        importance: f64,
        cost: f64,
        now: NaiveDateTime,
    ) -> Result<TaskId, StoreError> {
        let id = TaskId::new(self.next_id).ok_or(StoreError::IdsExhausted)?;
        let task = TaskRecord::new(id, description, importance, cost, &self.range, now)?;
        self.next_id += 1;
        self.tasks.push(task);
        self.sort();
        Ok(id)
    }

    /// Mark a task completed at `now`. Returns the completion instant.
    ///
    /// A task that is already complete keeps its original completion time and
    /// signals [`StoreError::AlreadyCompleted`] so the caller can surface it
    /// (informational, not necessarily fatal).
    pub fn mark_complete(
        &mut self,
        id: TaskId,
        now: NaiveDateTime,
    ) -> Result<NaiveDateTime, StoreError> {
        let task = self.get_mut(id)?;
        if let Some(completed_at) = task.completion().timestamp() {
            return Err(StoreError::AlreadyCompleted { id, completed_at });
        }
        task.set_completed(now);
        // Ordering ignores completion state, so no re-sort is needed here.
        Ok(now)
    }

    /// Revert a task to incomplete (the checklist "uncheck" interaction).
    pub fn unmark_complete(&mut self, id: TaskId) -> Result<(), StoreError> {
        self.get_mut(id)?.clear_completed();
        Ok(())
    }

    /// Remove a task and return it.
    pub fn remove(&mut self, id: TaskId) -> Result<TaskRecord, StoreError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id() == id)
            .ok_or(StoreError::NotFound { id })?;
        let task = self.tasks.remove(pos);
        self.sort();
        Ok(task)
    }

    /// Look up a task by id.
    pub fn get(&self, id: TaskId) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// All tasks in canonical order.
    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The configured score range.
    pub fn value_range(&self) -> ValueRange {
        self.range
    }

    fn get_mut(&mut self, id: TaskId) -> Result<&mut TaskRecord, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(StoreError::NotFound { id })
    }

    /// Re-establish the canonical order: priority descending, ties broken by
    /// importance descending, then creation time ascending. The sort is
    /// stable, so fully tied records keep their insertion order.
    fn sort(&mut self) {
        self.tasks.sort_by(|a, b| {
            b.priority()
                .total_cmp(&a.priority())
                .then_with(|| b.importance().total_cmp(&a.importance()))
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::task::TIMESTAMP_FORMAT;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    fn store_with(tasks: &[(&str, f64, f64, &str)]) -> TaskStore {
        let mut store = TaskStore::new(ValueRange::default());
        for (desc, importance, cost, created) in tasks {
            store.add(*desc, *importance, *cost, ts(created)).unwrap();
        }
        store
    }

    #[test]
    fn add_assigns_sequential_ids_and_computes_priority() {
        let mut store = TaskStore::new(ValueRange::default());
        let id = store
            .add("write spec", 4.0, 1.0, ts("2024-03-01 09:00:00"))
            .unwrap();
        assert_eq!(id.get(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().priority(), 4.0);

        let id2 = store
            .add("sharpen pencils", 1.0, 1.0, ts("2024-03-01 09:01:00"))
            .unwrap();
        assert_eq!(id2.get(), 2);
    }

    #[test]
    fn add_rejects_invalid_scores() {
        let mut store = TaskStore::new(ValueRange::default());
        let now = ts("2024-03-01 09:00:00");
        assert!(matches!(
            store.add("too big", 5.0, 1.0, now),
            Err(StoreError::Task(TaskError::OutOfRange { .. }))
        ));
        assert!(matches!(
            store.add("too small", 2.0, 0.5, now),
            Err(StoreError::Task(TaskError::OutOfRange { .. }))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn zero_cost_is_rejected_with_a_permissive_range() {
        // Even if the range admits 0, priority would be undefined.
        let mut store = TaskStore::new(ValueRange::new(0.0, 4.0));
        let err = store
            .add("free lunch", 2.0, 0.0, ts("2024-03-01 09:00:00"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Task(TaskError::ZeroCost)));
    }

    #[test]
    fn canonical_order_is_priority_then_importance_then_age() {
        let store = store_with(&[
            ("low", 2.0, 1.0, "2024-03-01 09:00:00"),       // priority 2.0
            ("high", 4.0, 1.0, "2024-03-02 09:00:00"),      // priority 4.0
            ("tie-newer", 2.0, 1.0, "2024-03-03 09:00:00"), // priority 2.0, newer
            ("tie-heavier", 4.0, 2.0, "2024-03-01 10:00:00"), // priority 2.0, importance 4
        ]);
        let order: Vec<&str> = store.tasks().iter().map(|t| t.description()).collect();
        // Highest priority first; among the 2.0 ties the higher importance
        // wins, then the older creation time.
        assert_eq!(order, vec!["high", "tie-heavier", "low", "tie-newer"]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut store = store_with(&[
            ("a", 4.0, 1.0, "2024-03-01 09:00:00"),
            ("b", 2.0, 1.0, "2024-03-01 09:30:00"),
            ("c", 3.0, 2.0, "2024-03-01 10:00:00"),
        ]);
        let before: Vec<TaskId> = store.tasks().iter().map(|t| t.id()).collect();
        store.sort();
        let after: Vec<TaskId> = store.tasks().iter().map(|t| t.id()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn ids_are_stable_across_resorts_and_removals() {
        let mut store = store_with(&[
            ("a", 1.0, 1.0, "2024-03-01 09:00:00"),
            ("b", 2.0, 1.0, "2024-03-01 09:01:00"),
            ("c", 3.0, 1.0, "2024-03-01 09:02:00"),
        ]);
        let b = store
            .tasks()
            .iter()
            .find(|t| t.description() == "b")
            .unwrap()
            .id();
        store.remove(b).unwrap();
        // Remaining ids are unchanged and the freed id is not reused.
        assert!(store.get(b).is_none());
        let id4 = store
            .add("d", 1.0, 1.0, ts("2024-03-01 09:03:00"))
            .unwrap();
        assert_eq!(id4.get(), 4);
    }

    #[test]
    fn mark_complete_is_set_once() {
        let mut store = store_with(&[("a", 2.0, 1.0, "2024-03-01 09:00:00")]);
        let id = store.tasks()[0].id();
        let first = store.mark_complete(id, ts("2024-03-01 12:00:00")).unwrap();
        assert!(first >= store.get(id).unwrap().created_at());

        let err = store
            .mark_complete(id, ts("2024-03-01 13:00:00"))
            .unwrap_err();
        match err {
            StoreError::AlreadyCompleted { completed_at, .. } => {
                assert_eq!(completed_at, first);
            }
            other => panic!("expected AlreadyCompleted, got {other:?}"),
        }
        // The original completion time is untouched.
        assert_eq!(
            store.get(id).unwrap().completion().timestamp(),
            Some(first)
        );
    }

    #[test]
    fn unmark_complete_reverts_and_allows_recompletion() {
        let mut store = store_with(&[("a", 2.0, 1.0, "2024-03-01 09:00:00")]);
        let id = store.tasks()[0].id();
        store.mark_complete(id, ts("2024-03-01 12:00:00")).unwrap();
        store.unmark_complete(id).unwrap();
        assert!(!store.get(id).unwrap().is_complete());

        let again = store.mark_complete(id, ts("2024-03-01 14:00:00")).unwrap();
        assert_eq!(again, ts("2024-03-01 14:00:00"));
    }

    #[test]
    fn remove_twice_signals_not_found() {
        let mut store = store_with(&[("a", 2.0, 1.0, "2024-03-01 09:00:00")]);
        let id = store.tasks()[0].id();
        store.remove(id).unwrap();
        assert!(matches!(
            store.remove(id),
            Err(StoreError::NotFound { id: missing }) if missing == id
        ));
    }

    #[test]
    fn unknown_ids_signal_not_found() {
        let mut store = TaskStore::new(ValueRange::default());
        let ghost = TaskId::new(99).unwrap();
        assert!(matches!(
            store.mark_complete(ghost, ts("2024-03-01 12:00:00")),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.unmark_complete(ghost),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn from_records_resumes_id_allocation() {
        let range = ValueRange::default();
        let records = vec![
            TaskRecord::from_parts(
                TaskId::new(3).unwrap(),
                ts("2024-03-01 09:00:00"),
                "old",
                2.0,
                1.0,
                crate::task::Completion::Incomplete,
            )
            .unwrap(),
        ];
        let mut store = TaskStore::from_records(records, range);
        let id = store
            .add("new", 2.0, 1.0, ts("2024-03-01 10:00:00"))
            .unwrap();
        assert_eq!(id.get(), 4);
    }
}
