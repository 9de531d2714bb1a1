//! End-to-end session scenarios.

use rand::rngs::StdRng;
use rand::SeedableRng;

use yatl::error::{StoreError, YatlError};
use yatl::session::{Session, SessionConfig};
use yatl::view::{self, Jitter};

fn open(path: &std::path::Path) -> Session {
    Session::open(SessionConfig::new(path)).unwrap()
}

#[test]
fn add_one_task_to_a_fresh_list() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("todo.list");

    let mut session = open(&path);
    assert!(session.store().is_empty());

    session.add("write spec", 4.0, 1.0).unwrap();
    let tasks = session.store().tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].priority(), 4.0);

    session.commit().unwrap();
    let reopened = open(&path);
    let task = &reopened.store().tasks()[0];
    assert_eq!(task.description(), "write spec");
    assert_eq!(task.importance(), 4.0);
    assert_eq!(task.cost(), 1.0);
    assert_eq!(task.priority(), 4.0);
}

#[test]
fn higher_priority_lists_first() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut session = open(&dir.path().join("todo.list"));
    session.add("background reading", 2.0, 1.0).unwrap();
    session.add("fix the leak", 4.0, 1.0).unwrap();

    let tasks = session.store().tasks();
    assert_eq!(tasks[0].description(), "fix the leak");
    assert_eq!(tasks[0].priority(), 4.0);
    assert_eq!(tasks[1].priority(), 2.0);
    session.close_discard().unwrap();
}

#[test]
fn completing_twice_reports_the_first_completion() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut session = open(&dir.path().join("todo.list"));
    let id = session.add("one-shot", 2.0, 1.0).unwrap();

    let first = session.mark_complete(id).unwrap();
    let err = session.mark_complete(id).unwrap_err();
    match err {
        YatlError::Store(StoreError::AlreadyCompleted { completed_at, .. }) => {
            assert_eq!(completed_at, first);
        }
        other => panic!("expected AlreadyCompleted, got {other:?}"),
    }
    session.close_discard().unwrap();
}

#[test]
fn checklist_uncheck_reopens_a_task() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut session = open(&dir.path().join("todo.list"));
    let id = session.add("flaky chore", 2.0, 1.0).unwrap();

    session.mark_complete(id).unwrap();
    session.unmark_complete(id).unwrap();
    assert!(!session.store().get(id).unwrap().is_complete());

    // Completing again works and gets a fresh timestamp.
    session.mark_complete(id).unwrap();
    assert!(session.store().get(id).unwrap().is_complete());
    session.close_discard().unwrap();
}

#[test]
fn deleting_twice_signals_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut session = open(&dir.path().join("todo.list"));
    let id = session.add("doomed", 2.0, 1.0).unwrap();

    session.remove(id).unwrap();
    let err = session.remove(id).unwrap_err();
    assert!(matches!(
        err,
        YatlError::Store(StoreError::NotFound { id: missing }) if missing == id
    ));
    session.close_discard().unwrap();
}

#[test]
fn invalid_scores_are_rejected_up_front() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut session = open(&dir.path().join("todo.list"));

    assert!(session.add("overeager", 11.0, 1.0).is_err());
    assert!(session.store().is_empty());
    // Nothing was autosaved for the failed add.
    assert!(!session.has_unsaved_changes());
}

#[test]
fn projections_jitter_without_touching_the_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("todo.list");

    let mut session = open(&path);
    session.add("hold still", 3.0, 2.0).unwrap();
    session.commit().unwrap();

    let mut rng = StdRng::seed_from_u64(99);
    let first = view::plot_points(session.store(), Jitter::default(), &mut rng);
    let second = view::plot_points(session.store(), Jitter::default(), &mut rng);
    assert_ne!(first, second);

    // The file still holds the exact stored scores.
    let reopened = open(&path);
    let task = &reopened.store().tasks()[0];
    assert_eq!(task.importance(), 3.0);
    assert_eq!(task.cost(), 2.0);
    assert_eq!(task.priority(), 1.5);
}

#[test]
fn review_lines_render_in_canonical_order() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut session = open(&dir.path().join("todo.list"));
    session.add("low", 1.0, 4.0).unwrap();
    let id = session.add("high", 4.0, 1.0).unwrap();
    session.mark_complete(id).unwrap();

    let lines: Vec<String> = session.store().tasks().iter().map(view::review_line).collect();
    assert!(lines[0].starts_with("[✔]"));
    assert!(lines[0].contains("high"));
    assert!(lines[1].starts_with("[ ]"));
    assert!(lines[1].contains("low"));
    session.close_discard().unwrap();
}
