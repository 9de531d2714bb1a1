//! Ratatui-based terminal surfaces: the checklist and the quadrant plot.
//!
//! Both views sit on top of the read-only projections in [`crate::view`];
//! every mutation goes through the [`Session`], so edits are autosaved to the
//! shadow file as they happen. Quitting with `q` commits, quitting with `Q`
//! discards the session's edits.

pub mod widgets;

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use miette::IntoDiagnostic;
use rand::rngs::ThreadRng;

use crate::session::Session;
use crate::task::TaskId;
use crate::view::{self, ChecklistRow, Jitter, PlotPoint};

/// Which surface is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Checklist,
    Plot,
}

/// TUI application state.
pub struct TodoTui {
    session: Session,
    view: View,
    rows: Vec<ChecklistRow>,
    points: Vec<PlotPoint>,
    selected: usize,
    /// Incomplete task awaiting a second `d` before deletion.
    pending_delete: Option<TaskId>,
    /// Input buffer for the add-task prompt, when open.
    input: Option<String>,
    status: Option<String>,
    rng: ThreadRng,
    should_quit: bool,
    keep_edits: bool,
}

impl TodoTui {
    /// Create a TUI over an open session, starting on the given view.
    pub fn new(session: Session, view: View) -> Self {
        let mut tui = Self {
            session,
            view,
            rows: Vec::new(),
            points: Vec::new(),
            selected: 0,
            pending_delete: None,
            input: None,
            status: None,
            rng: rand::thread_rng(),
            should_quit: false,
            keep_edits: true,
        };
        tui.refresh();
        tui
    }

    /// Run the event loop until the user quits.
    pub fn run(&mut self) -> miette::Result<()> {
        let mut terminal = ratatui::init();

        loop {
            terminal
                .draw(|frame| {
                    widgets::render(
                        frame,
                        self.view,
                        &self.rows,
                        self.selected,
                        self.pending_delete,
                        &self.points,
                        self.session.store().value_range(),
                        self.input.as_deref(),
                        self.status.as_deref(),
                        &self.session.path().display().to_string(),
                        self.session.has_unsaved_changes(),
                    );
                })
                .into_diagnostic()?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(100)).into_diagnostic()? {
                if let Event::Key(key) = event::read().into_diagnostic()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    self.handle_key(key.code);
                }
            }
        }

        self.on_exit()?;
        ratatui::restore();
        Ok(())
    }

    /// Re-project rows and plot points after any mutation. Jitter is drawn
    /// fresh each time; the stored scores never move.
    fn refresh(&mut self) {
        self.rows = view::checklist_rows(self.session.store());
        self.points = view::plot_points(self.session.store(), Jitter::default(), &mut self.rng);
        if !self.rows.is_empty() && self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        self.status = None;

        // Add-task prompt swallows all keys while open.
        if self.input.is_some() {
            self.handle_input_key(code);
            return;
        }

        // A pending delete only survives an immediate second `d`.
        let pending = self.pending_delete.take();

        match code {
            KeyCode::Char('q') => {
                self.keep_edits = true;
                self.should_quit = true;
            }
            KeyCode::Char('Q') => {
                self.keep_edits = false;
                self.should_quit = true;
            }
            KeyCode::Char('p') => self.view = View::Plot,
            KeyCode::Char('c') => self.view = View::Checklist,
            KeyCode::Char('a') => self.input = Some(String::new()),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.rows.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('d') => self.delete_selected(pending),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.input = None,
            KeyCode::Enter => {
                if let Some(line) = self.input.take() {
                    self.submit_new_task(&line);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.input.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.input.as_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn selected_row(&self) -> Option<&ChecklistRow> {
        self.rows.get(self.selected)
    }

    /// Space: complete an open task, reopen a completed one.
    fn toggle_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let id = row.id;
        let complete = row.completion.is_complete();
        let result = if complete {
            self.session.unmark_complete(id)
        } else {
            self.session.mark_complete(id).map(|_| ())
        };
        match result {
            Ok(()) => self.refresh(),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    /// First `d` on an incomplete task arms the confirmation; the second one
    /// (or any `d` on a completed task) deletes.
    fn delete_selected(&mut self, pending: Option<TaskId>) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let id = row.id;
        let complete = row.completion.is_complete();
        let description = row.description.clone();
        if !complete && pending != Some(id) {
            self.pending_delete = Some(id);
            self.status = Some(format!("press d again to delete \"{description}\""));
            return;
        }
        match self.session.remove(id) {
            Ok(task) => {
                self.status = Some(format!("deleted \"{}\"", task.description()));
                self.refresh();
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn submit_new_task(&mut self, line: &str) {
        match parse_new_task(line) {
            Ok((description, importance, cost)) => {
                match self.session.add(&description, importance, cost) {
                    Ok(_) => {
                        self.status = Some(format!("added \"{description}\""));
                        self.refresh();
                    }
                    Err(err) => self.status = Some(err.to_string()),
                }
            }
            Err(message) => self.status = Some(message),
        }
    }

    /// Commit or discard, depending on how the user quit.
    fn on_exit(&mut self) -> miette::Result<()> {
        if self.keep_edits {
            self.session.commit()?;
        } else {
            self.session.close_discard()?;
        }
        Ok(())
    }
}

/// Parse the add-task prompt: `description / importance / cost`.
fn parse_new_task(line: &str) -> Result<(String, f64, f64), String> {
    let mut parts = line.rsplitn(3, '/');
    let (Some(cost), Some(importance), Some(description)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return Err("expected: description / importance / cost".to_string());
    };

    let description = description.trim();
    if description.is_empty() {
        return Err("description is empty".to_string());
    }
    let importance: f64 = importance
        .trim()
        .parse()
        .map_err(|_| format!("importance {:?} is not a number", importance.trim()))?;
    let cost: f64 = cost
        .trim()
        .parse()
        .map_err(|_| format!("cost {:?} is not a number", cost.trim()))?;
    Ok((description.to_string(), importance, cost))
}
