//! Export types for serializing the task list.
//!
//! Flat, timestamp-resolved representations of tasks suitable for JSON
//! export and for piping into other tools.

use serde::{Deserialize, Serialize};

use crate::store::TaskStore;
use crate::task::TIMESTAMP_FORMAT;

/// Exported task with resolved timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskExport {
    /// Task id within this store instance.
    pub id: u64,
    /// Creation timestamp (`YYYY-MM-DD HH:MM:SS`).
    pub created_at: String,
    /// Task description.
    pub description: String,
    /// Importance score.
    pub importance: f64,
    /// Cost score.
    pub cost: f64,
    /// Derived priority (importance / cost).
    pub priority: f64,
    /// Completion timestamp, if completed.
    pub completed_at: Option<String>,
}

/// Export all tasks in canonical order.
pub fn tasks(store: &TaskStore) -> Vec<TaskExport> {
    store
        .tasks()
        .iter()
        .map(|task| TaskExport {
            id: task.id().get(),
            created_at: task.created_at().format(TIMESTAMP_FORMAT).to_string(),
            description: task.description().to_string(),
            importance: task.importance(),
            cost: task.cost(),
            priority: task.priority(),
            completed_at: task
                .completion()
                .timestamp()
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
        })
        .collect()
}
