//! # yatl
//!
//! Yet another todo list: tasks scored by importance and cost, ranked by the
//! derived priority (importance / cost), stored in a flat CSV file with
//! crash-safe autosaves.
//!
//! ## Architecture
//!
//! - **Tasks** (`task`): the record type, stable ids, and the completion sum type
//! - **Store** (`store`): ordered in-memory collection with the canonical sort
//! - **Persistence** (`persist`): CSV list file plus the shadow-autosave protocol
//! - **Session** (`session`): a loaded store bound to its file, write-through autosave
//! - **Views** (`view`): read-only checklist and quadrant-plot projections
//! - **TUI** (`tui`): ratatui checklist and plot surfaces over the views
//!
//! ## Library usage
//!
//! ```no_run
//! use yatl::session::{Session, SessionConfig};
//!
//! let mut session = Session::open(SessionConfig::new("/tmp/todo.list")).unwrap();
//! let id = session.add("write spec", 4.0, 1.0).unwrap();
//! session.mark_complete(id).unwrap();
//! session.commit().unwrap();
//! ```

pub mod error;
pub mod export;
pub mod paths;
pub mod persist;
pub mod session;
pub mod store;
pub mod task;
pub mod tui;
pub mod view;
