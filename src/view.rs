//! Read-only projections of the store for external display surfaces.
//!
//! The checklist surface consumes [`checklist_rows`]; the quadrant plot
//! consumes [`plot_points`]. Both are snapshots: mutating a projection (or
//! applying jitter to it) never touches the stored records.

use rand::Rng;

use crate::store::TaskStore;
use crate::task::{Completion, TaskId, TaskRecord};

/// Glyph for a completed task.
pub const COMPLETE_MARK: char = '✔';
/// Glyph for an incomplete task.
pub const INCOMPLETE_MARK: char = '✘';

/// Short timestamp form used in review/checklist lines.
pub const REVIEW_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One checklist line: id, text, completion state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistRow {
    pub id: TaskId,
    pub description: String,
    pub completion: Completion,
}

/// One scatter point: cost on x, importance on y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    pub id: TaskId,
    pub x: f64,
    pub y: f64,
    pub completed: bool,
}

/// Jitter configuration for the plot projection.
///
/// Coincident tasks (same importance and cost) would otherwise render on top
/// of each other; each point is displaced by an independent uniform offset in
/// `±frac × range-span` on both axes. Presentation-only: the stored scores
/// are never modified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    /// Maximum displacement as a fraction of the value-range span.
    pub frac: f64,
}

impl Default for Jitter {
    fn default() -> Self {
        Self { frac: 0.025 }
    }
}

impl Jitter {
    /// No displacement at all (deterministic plots).
    pub const NONE: Jitter = Jitter { frac: 0.0 };

    fn offset<R: Rng>(&self, span: f64, rng: &mut R) -> f64 {
        let max_disp = self.frac * span;
        if max_disp == 0.0 {
            return 0.0;
        }
        rng.gen_range(-max_disp..=max_disp)
    }
}

/// Rows for a checklist surface, in canonical order.
pub fn checklist_rows(store: &TaskStore) -> Vec<ChecklistRow> {
    store
        .tasks()
        .iter()
        .map(|task| ChecklistRow {
            id: task.id(),
            description: task.description().to_string(),
            completion: task.completion(),
        })
        .collect()
}

/// Points for a quadrant plot, in canonical order, with jitter applied to
/// the projected copies only.
pub fn plot_points<R: Rng>(store: &TaskStore, jitter: Jitter, rng: &mut R) -> Vec<PlotPoint> {
    let span = store.value_range().span();
    store
        .tasks()
        .iter()
        .map(|task| PlotPoint {
            id: task.id(),
            x: task.cost() + jitter.offset(span, rng),
            y: task.importance() + jitter.offset(span, rng),
            completed: task.is_complete(),
        })
        .collect()
}

/// Format one task as a textual review line.
///
/// Incomplete: `[ ] 3 : water plants`
/// Complete:   `[✔] 3 : water plants, completed 2024-03-02 18:00`
pub fn review_line(task: &TaskRecord) -> String {
    match task.completion().timestamp() {
        None => format!("[ ] {} : {}", task.id(), task.description()),
        Some(at) => format!(
            "[{COMPLETE_MARK}] {} : {}, completed {}",
            task.id(),
            task.description(),
            at.format(REVIEW_TIME_FORMAT)
        ),
    }
}
