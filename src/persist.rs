//! CSV persistence for the task store, with crash-safe autosaves.
//!
//! The list lives in a flat CSV file. During an editing session every mutation
//! is written in full to a *shadow* file (a hidden `.autosave` sibling of the
//! canonical path); committing writes the canonical file and removes the
//! shadow. A shadow file found at load time therefore means a previous session
//! never finished, and the load refuses to proceed until the operator either
//! adopts or discards those edits. Data loss is bounded to "this session's
//! edits are only in the shadow copy", never "edits exist only in memory".

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StoreError, YatlResult};
use crate::store::{TaskStore, ValueRange};
use crate::task::{Completion, TaskId, TaskRecord, TIMESTAMP_FORMAT};

/// Derive the shadow (autosave) path for a canonical list path: a hidden
/// `.autosave`-suffixed sibling in the same directory.
pub fn shadow_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "todo.list".to_string());
    path.with_file_name(format!(".{name}.autosave"))
}

/// One CSV row. Field order here fixes the column order written to disk;
/// reads are header-driven, so any column order is accepted and normalized
/// on the next write.
#[derive(Debug, Serialize, Deserialize)]
struct RawRow {
    datetime: String,
    description: String,
    importance: f64,
    cost: f64,
    priority: f64,
    completed: Option<String>,
}

impl RawRow {
    fn from_task(task: &TaskRecord) -> Self {
        Self {
            datetime: task.created_at().format(TIMESTAMP_FORMAT).to_string(),
            description: task.description().to_string(),
            importance: task.importance(),
            cost: task.cost(),
            priority: task.priority(),
            completed: task
                .completion()
                .timestamp()
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string()),
        }
    }

    fn into_task(self, id: TaskId, path: &Path) -> YatlResult<TaskRecord> {
        let created_at = parse_timestamp(&self.datetime, path)?;
        let completion = match self.completed.as_deref().map(str::trim) {
            // Older lists store the literal `False` for incomplete rows.
            None | Some("") | Some("False") => Completion::Incomplete,
            Some(text) => Completion::CompletedAt(parse_timestamp(text, path)?),
        };
        // Priority is derived state; the stored column is ignored and
        // recomputed so the invariant holds even for hand-edited files.
        let task = TaskRecord::from_parts(
            id,
            created_at,
            self.description,
            self.importance,
            self.cost,
            completion,
        )?;
        Ok(task)
    }
}

fn parse_timestamp(text: &str, path: &Path) -> YatlResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|_| {
        StorageError::BadTimestamp {
            path: path.display().to_string(),
            value: text.to_string(),
        }
        .into()
    })
}

/// Handle on a list file: canonical path, derived shadow path, and the
/// unsaved-changes flag.
#[derive(Debug)]
pub struct ListFile {
    path: PathBuf,
    shadow: PathBuf,
    dirty: bool,
}

impl ListFile {
    /// Create a handle for the list at `path`. No I/O happens here.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let shadow = shadow_path(&path);
        Self {
            path,
            shadow,
            dirty: false,
        }
    }

    /// Canonical list path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Shadow (autosave) path.
    pub fn shadow(&self) -> &Path {
        &self.shadow
    }

    /// Whether a shadow file currently exists on disk.
    pub fn has_shadow(&self) -> bool {
        self.shadow.exists()
    }

    /// Whether this session has autosaved edits not yet committed.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Load the store from the canonical file.
    ///
    /// An existing shadow file signals an unclosed prior session and fails
    /// the load; recovery is an explicit operator decision, never automatic.
    /// A missing canonical file yields an empty store. Ids are re-derived in
    /// row order.
    pub fn load(&self, range: ValueRange) -> YatlResult<TaskStore> {
        if self.has_shadow() {
            return Err(StorageError::UnclosedSession {
                shadow: self.shadow.display().to_string(),
            }
            .into());
        }
        if !self.path.exists() {
            return Ok(TaskStore::new(range));
        }

        let mut reader =
            csv::Reader::from_path(&self.path).map_err(|e| self.csv_error(e))?;
        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<RawRow>().enumerate() {
            let row = row.map_err(|e| self.csv_error(e))?;
            let id = TaskId::new(index as u64 + 1).ok_or(StoreError::IdsExhausted)?;
            records.push(row.into_task(id, &self.path)?);
        }
        Ok(TaskStore::from_records(records, range))
    }

    /// Write the full store to disk.
    ///
    /// `commit = false` is the autosave path: the store goes to the shadow
    /// file and the unsaved-changes flag is raised. `commit = true` writes
    /// the canonical file, removes the shadow, and clears the flag.
    pub fn save(&mut self, store: &TaskStore, commit: bool) -> YatlResult<()> {
        if commit {
            self.write_rows(&self.path, store)?;
            if self.has_shadow() {
                std::fs::remove_file(&self.shadow).map_err(|e| self.io_error(&self.shadow, e))?;
            }
            self.dirty = false;
        } else {
            self.write_rows(&self.shadow, store)?;
            self.dirty = true;
        }
        Ok(())
    }

    /// Remove the shadow file, if any, without touching the canonical file.
    pub fn discard_shadow(&mut self) -> YatlResult<()> {
        if self.has_shadow() {
            std::fs::remove_file(&self.shadow).map_err(|e| self.io_error(&self.shadow, e))?;
        }
        self.dirty = false;
        Ok(())
    }

    /// Promote an orphaned shadow file to the canonical path.
    ///
    /// After this a normal [`ListFile::load`] succeeds with the recovered
    /// edits. Fails with [`StorageError::NoShadow`] if there is nothing to
    /// recover.
    pub fn adopt_shadow(&mut self) -> YatlResult<()> {
        if !self.has_shadow() {
            return Err(StorageError::NoShadow {
                shadow: self.shadow.display().to_string(),
            }
            .into());
        }
        std::fs::rename(&self.shadow, &self.path).map_err(|e| self.io_error(&self.shadow, e))?;
        self.dirty = false;
        Ok(())
    }

    fn write_rows(&self, target: &Path, store: &TaskStore) -> YatlResult<()> {
        let mut writer = csv::Writer::from_path(target).map_err(|e| StorageError::Csv {
            path: target.display().to_string(),
            source: e,
        })?;
        for task in store.tasks() {
            writer
                .serialize(RawRow::from_task(task))
                .map_err(|e| StorageError::Csv {
                    path: target.display().to_string(),
                    source: e,
                })?;
        }
        writer
            .flush()
            .map_err(|e| self.io_error(target, e))
            .map_err(Into::into)
    }

    fn csv_error(&self, source: csv::Error) -> StorageError {
        StorageError::Csv {
            path: self.path.display().to_string(),
            source,
        }
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
