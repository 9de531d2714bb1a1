//! Rich diagnostic error types for yatl.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know exactly what went wrong and
//! how to fix it.

use chrono::NaiveDateTime;
use miette::Diagnostic;
use thiserror::Error;

use crate::task::TaskId;

/// Top-level error type for yatl.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source chains) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum YatlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Storage(#[from] StorageError),
}

/// Result type used throughout the crate.
pub type YatlResult<T> = std::result::Result<T, YatlError>;

// ---------------------------------------------------------------------------
// Task errors
// ---------------------------------------------------------------------------

/// Errors from constructing a task record.
#[derive(Debug, Error, Diagnostic)]
pub enum TaskError {
    #[error("cost must not be zero")]
    #[diagnostic(
        code(yatl::task::zero_cost),
        help(
            "Priority is derived as importance / cost, so a zero cost is undefined. \
             Give the task the smallest cost on your scale instead."
        )
    )]
    ZeroCost,

    #[error("{field} {value} is outside the configured range [{min}, {max}]")]
    #[diagnostic(
        code(yatl::task::out_of_range),
        help("Importance and cost must both lie within the list's value range.")
    )]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from task store operations.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("no task with id {id}")]
    #[diagnostic(
        code(yatl::store::not_found),
        help("List the current tasks with `yatl` to see valid ids.")
    )]
    NotFound { id: TaskId },

    #[error("task {id} was already completed on {completed_at}")]
    #[diagnostic(
        code(yatl::store::already_completed),
        help(
            "The existing completion time is kept. Use `yatl undo <ID>` first \
             if you want to complete the task again."
        )
    )]
    AlreadyCompleted {
        id: TaskId,
        completed_at: NaiveDateTime,
    },

    #[error("task id space exhausted")]
    #[diagnostic(code(yatl::store::ids_exhausted))]
    IdsExhausted,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Task(#[from] TaskError),
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from reading or writing the list file.
#[derive(Debug, Error, Diagnostic)]
pub enum StorageError {
    #[error("unsaved changes from an earlier session: {shadow}")]
    #[diagnostic(
        code(yatl::persist::unclosed_session),
        help(
            "A previous session left an autosave file behind (the process was \
             probably killed before it could finish). Run `yatl recover` to adopt \
             those edits, or `yatl discard` to drop them."
        )
    )]
    UnclosedSession { shadow: String },

    #[error("no autosave file to recover: {shadow}")]
    #[diagnostic(
        code(yatl::persist::no_shadow),
        help("There are no unsaved changes at this path; nothing to recover or discard.")
    )]
    NoShadow { shadow: String },

    #[error("I/O error on {path}")]
    #[diagnostic(
        code(yatl::persist::io),
        help(
            "A filesystem operation failed. Check that the directory exists, has \
             correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed list file {path}")]
    #[diagnostic(
        code(yatl::persist::csv),
        help(
            "The list file could not be parsed as CSV with the expected columns \
             (datetime, description, importance, cost, priority, completed)."
        )
    )]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("unparseable timestamp {value:?} in {path}")]
    #[diagnostic(
        code(yatl::persist::bad_timestamp),
        help("Timestamps in the list file must use the form YYYY-MM-DD HH:MM:SS.")
    )]
    BadTimestamp { path: String, value: String },
}
