//! Session facade: a loaded task store bound to its list file.
//!
//! A [`Session`] owns the in-memory [`TaskStore`] and the [`ListFile`] it was
//! loaded from. Every mutation writes the whole store through to the shadow
//! file, so a crash at any point leaves the edits recoverable on disk;
//! [`Session::commit`] finalizes them into the canonical file.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime, Timelike};

use crate::error::YatlResult;
use crate::persist::ListFile;
use crate::store::{TaskStore, ValueRange};
use crate::task::{TaskId, TaskRecord};

/// Configuration for opening a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Path to the list file.
    pub path: PathBuf,
    /// Score bounds for importance and cost.
    pub value_range: ValueRange,
}

impl SessionConfig {
    /// Config for `path` with the default 1–4 score range.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            value_range: ValueRange::default(),
        }
    }
}

/// An editing session over one todo list.
#[derive(Debug)]
pub struct Session {
    store: TaskStore,
    file: ListFile,
}

impl Session {
    /// Load the list at the configured path.
    ///
    /// Fails with an unclosed-session diagnostic if an orphaned autosave file
    /// exists; that situation needs an explicit `recover`/`discard` decision.
    pub fn open(config: SessionConfig) -> YatlResult<Self> {
        let file = ListFile::new(config.path);
        let store = file.load(config.value_range)?;
        tracing::debug!(
            path = %file.path().display(),
            tasks = store.len(),
            "opened todo list"
        );
        Ok(Self { store, file })
    }

    /// The underlying store, for read-only views.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Canonical list path.
    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    /// Whether autosaved edits have not yet been committed.
    pub fn has_unsaved_changes(&self) -> bool {
        self.file.has_unsaved_changes()
    }

    /// Add a task created now. Autosaves.
    pub fn add(&mut self, description: &str, importance: f64, cost: f64) -> YatlResult<TaskId> {
        let id = self.store.add(description, importance, cost, now())?;
        tracing::debug!(%id, importance, cost, "added task");
        self.autosave()?;
        Ok(id)
    }

    /// Mark a task completed now. Autosaves. Returns the completion instant.
    pub fn mark_complete(&mut self, id: TaskId) -> YatlResult<NaiveDateTime> {
        let at = self.store.mark_complete(id, now())?;
        tracing::debug!(%id, %at, "completed task");
        self.autosave()?;
        Ok(at)
    }

    /// Revert a task to incomplete. Autosaves.
    pub fn unmark_complete(&mut self, id: TaskId) -> YatlResult<()> {
        self.store.unmark_complete(id)?;
        tracing::debug!(%id, "reopened task");
        self.autosave()
    }

    /// Remove a task. Autosaves. Returns the removed record.
    ///
    /// Confirmation before destroying an incomplete task is the caller's
    /// responsibility; the session never blocks on user interaction.
    pub fn remove(&mut self, id: TaskId) -> YatlResult<TaskRecord> {
        let task = self.store.remove(id)?;
        tracing::debug!(%id, description = task.description(), "removed task");
        self.autosave()?;
        Ok(task)
    }

    /// Write the canonical file and drop the shadow.
    pub fn commit(&mut self) -> YatlResult<()> {
        self.file.save(&self.store, true)?;
        tracing::info!(path = %self.file.path().display(), tasks = self.store.len(), "committed todo list");
        Ok(())
    }

    /// End the session without updating the canonical file.
    ///
    /// Every mutation already reached the shadow file, so this only decides
    /// that those edits are not kept.
    pub fn close_discard(&mut self) -> YatlResult<()> {
        self.file.discard_shadow()
    }

    fn autosave(&mut self) -> YatlResult<()> {
        self.file.save(&self.store, false)
    }
}

/// Current wall-clock time at second precision (the list file stores whole
/// seconds; truncating here keeps in-memory and reloaded timestamps equal).
fn now() -> NaiveDateTime {
    let t = Local::now().naive_local();
    t.with_nanosecond(0).unwrap_or(t)
}
