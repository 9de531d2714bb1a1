//! Core task types for yatl.
//!
//! A todo list is a flat collection of [`TaskRecord`]s. Every task is addressed
//! by a [`TaskId`] and carries a [`Completion`] state. The record's `priority`
//! is derived from importance and cost at construction and is never settable
//! on its own.

use std::num::NonZeroU64;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::store::ValueRange;

/// Textual timestamp form used everywhere: sortable and locale-independent.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unique, niche-optimized identifier for a task.
///
/// Uses `NonZeroU64` so that `Option<TaskId>` is the same size as `TaskId`
/// (the niche optimization lets the compiler use 0 as the `None` discriminant).
///
/// Ids are assigned when a task enters a store (at creation or load) and are
/// stable across re-sorts for the life of that store instance. They are *not*
/// written to the list file; positional row indices are never used to address
/// tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TaskId(NonZeroU64);

impl TaskId {
    /// Create a `TaskId` from a raw `u64`.
    ///
    /// Returns `None` if `raw` is zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(TaskId)
    }

    /// Get the underlying `u64` value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .parse()
            .map_err(|_| format!("\"{s}\" is not a task id (expected a positive integer)"))?;
        TaskId::new(raw).ok_or_else(|| "task ids start at 1".to_string())
    }
}

/// Completion state of a task: either still open, or done at a known instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The task has not been completed.
    Incomplete,
    /// The task was completed at the given instant.
    CompletedAt(NaiveDateTime),
}

impl Completion {
    /// Whether the task has been completed.
    pub fn is_complete(&self) -> bool {
        matches!(self, Completion::CompletedAt(_))
    }

    /// The completion instant, if any.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Completion::Incomplete => None,
            Completion::CompletedAt(at) => Some(*at),
        }
    }
}

/// One task: description, scores, derived priority, and completion state.
///
/// Everything except the completion state is immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    id: TaskId,
    created_at: NaiveDateTime,
    description: String,
    importance: f64,
    cost: f64,
    priority: f64,
    completion: Completion,
}

impl TaskRecord {
    /// Create a new (incomplete) task, validating scores against the range.
    ///
    /// Fails if importance or cost fall outside `range`, or if cost is zero.
    pub fn new(
        id: TaskId,
        description: impl Into<String>,
        importance: f64,
        cost: f64,
        range: &ValueRange,
        created_at: NaiveDateTime,
    ) -> Result<Self, TaskError> {
        if !range.contains(importance) {
            return Err(TaskError::OutOfRange {
                field: "importance",
                value: importance,
                min: range.min,
                max: range.max,
            });
        }
        if !range.contains(cost) {
            return Err(TaskError::OutOfRange {
                field: "cost",
                value: cost,
                min: range.min,
                max: range.max,
            });
        }
        Self::from_parts(
            id,
            created_at,
            description,
            importance,
            cost,
            Completion::Incomplete,
        )
    }

    /// Rebuild a task from stored fields, recomputing priority.
    ///
    /// Used when loading a list file: range limits are not re-checked here so
    /// lists written under a different range configuration stay loadable, but
    /// a zero cost is still rejected (priority would be undefined).
    pub fn from_parts(
        id: TaskId,
        created_at: NaiveDateTime,
        description: impl Into<String>,
        importance: f64,
        cost: f64,
        completion: Completion,
    ) -> Result<Self, TaskError> {
        if cost == 0.0 {
            return Err(TaskError::ZeroCost);
        }
        Ok(Self {
            id,
            created_at,
            description: description.into(),
            importance,
            cost,
            priority: importance / cost,
            completion,
        })
    }

    /// Stable identifier within the owning store.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Creation instant; set once, never mutated.
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// User-supplied description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Importance score (higher = more important).
    pub fn importance(&self) -> f64 {
        self.importance
    }

    /// Cost score (higher = more time-consuming).
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Derived ranking value: importance / cost.
    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// Completion state.
    pub fn completion(&self) -> Completion {
        self.completion
    }

    /// Whether the task has been completed.
    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }

    pub(crate) fn set_completed(&mut self, at: NaiveDateTime) {
        self.completion = Completion::CompletedAt(at);
    }

    pub(crate) fn clear_completed(&mut self) {
        self.completion = Completion::Incomplete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn task_id_niche_optimization() {
        assert_eq!(
            std::mem::size_of::<Option<TaskId>>(),
            std::mem::size_of::<TaskId>()
        );
    }

    #[test]
    fn task_id_zero_is_none() {
        assert!(TaskId::new(0).is_none());
        assert_eq!(TaskId::new(42).unwrap().get(), 42);
        assert_eq!("3".parse::<TaskId>().unwrap().get(), 3);
        assert!("0".parse::<TaskId>().is_err());
        assert!("x".parse::<TaskId>().is_err());
    }

    #[test]
    fn priority_is_importance_over_cost() {
        let range = ValueRange::default();
        let task = TaskRecord::new(
            TaskId::new(1).unwrap(),
            "write spec",
            4.0,
            1.0,
            &range,
            ts("2024-03-01 09:00:00"),
        )
        .unwrap();
        assert_eq!(task.priority(), 4.0);
        assert!(!task.is_complete());

        let task = TaskRecord::new(
            TaskId::new(2).unwrap(),
            "file taxes",
            3.0,
            2.0,
            &range,
            ts("2024-03-01 09:00:00"),
        )
        .unwrap();
        assert_eq!(task.priority(), 1.5);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let range = ValueRange::default();
        let now = ts("2024-03-01 09:00:00");
        let err = TaskRecord::new(TaskId::new(1).unwrap(), "x", 9.0, 1.0, &range, now)
            .unwrap_err();
        assert!(matches!(
            err,
            TaskError::OutOfRange {
                field: "importance",
                ..
            }
        ));

        let err = TaskRecord::new(TaskId::new(1).unwrap(), "x", 2.0, 0.5, &range, now)
            .unwrap_err();
        assert!(matches!(err, TaskError::OutOfRange { field: "cost", .. }));
    }

    #[test]
    fn zero_cost_is_rejected_even_without_range_check() {
        let err = TaskRecord::from_parts(
            TaskId::new(1).unwrap(),
            ts("2024-03-01 09:00:00"),
            "x",
            2.0,
            0.0,
            Completion::Incomplete,
        )
        .unwrap_err();
        assert!(matches!(err, TaskError::ZeroCost));
    }

    #[test]
    fn from_parts_tolerates_out_of_range_values() {
        // A list written under a wider range must stay loadable.
        let task = TaskRecord::from_parts(
            TaskId::new(1).unwrap(),
            ts("2024-03-01 09:00:00"),
            "legacy",
            10.0,
            5.0,
            Completion::Incomplete,
        )
        .unwrap();
        assert_eq!(task.priority(), 2.0);
    }

    #[test]
    fn completion_round_trip() {
        let done = NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        let c = Completion::CompletedAt(done);
        assert!(c.is_complete());
        assert_eq!(c.timestamp(), Some(done));
        assert_eq!(Completion::Incomplete.timestamp(), None);
    }
}
