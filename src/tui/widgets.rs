//! TUI widget rendering: header, checklist, quadrant plot, status bar.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::store::ValueRange;
use crate::task::TaskId;
use crate::tui::View;
use crate::view::{ChecklistRow, PlotPoint, COMPLETE_MARK, INCOMPLETE_MARK, REVIEW_TIME_FORMAT};

/// Render one full frame.
#[allow(clippy::too_many_arguments)]
pub fn render(
    frame: &mut Frame,
    view: View,
    rows: &[ChecklistRow],
    selected: usize,
    pending_delete: Option<TaskId>,
    points: &[PlotPoint],
    range: ValueRange,
    input: Option<&str>,
    status: Option<&str>,
    path: &str,
    unsaved: bool,
) {
    let [header_area, body_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    // Header.
    let unsaved_mark = if unsaved { " *" } else { "" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " yatl ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {path}{unsaved_mark}")),
    ]));
    frame.render_widget(header, header_area);

    match view {
        View::Checklist => {
            render_checklist(frame, body_area, rows, selected, pending_delete, input)
        }
        View::Plot => render_plot(frame, body_area, points, range),
    }

    // Status bar: transient message on the left, key help on the right.
    let done = rows.iter().filter(|r| r.completion.is_complete()).count();
    let help = match view {
        View::Checklist => "space toggle | a add | d delete | p plot | q save+quit | Q discard",
        View::Plot => "c checklist | q save+quit | Q discard",
    };
    let status_line = Line::from(vec![
        Span::styled(
            format!(" {}/{} done ", done, rows.len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            status.map(|s| format!("| {s} ")).unwrap_or_default(),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(format!("| {help}"), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), status_area);
}

/// Render one checklist row as a styled line.
fn row_to_line(row: &ChecklistRow, selected: bool) -> Line<'static> {
    let line = match row.completion.timestamp() {
        Some(at) => Line::from(vec![
            Span::styled(
                format!("[{COMPLETE_MARK}] "),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!(
                    "{} : {} (completed {})",
                    row.id,
                    row.description,
                    at.format(REVIEW_TIME_FORMAT)
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        None => Line::from(vec![
            Span::raw("[ ] "),
            Span::raw(format!("{} : {}", row.id, row.description)),
        ]),
    };
    if selected {
        line.style(Style::default().bg(Color::Indexed(237)))
    } else {
        line
    }
}

fn render_checklist(
    frame: &mut Frame,
    area: Rect,
    rows: &[ChecklistRow],
    selected: usize,
    pending_delete: Option<TaskId>,
    input: Option<&str>,
) {
    let (list_area, input_area) = if input.is_some() {
        let [list, input] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);
        (list, Some(input))
    } else {
        (area, None)
    };

    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::styled(
            "nothing to do (press a to add a task)",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let mut line = row_to_line(row, i == selected);
                if pending_delete == Some(row.id) {
                    line.push_span(Span::styled(
                        "  [d again to delete]",
                        Style::default().fg(Color::Red),
                    ));
                }
                line
            })
            .collect()
    };
    let list = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" tasks "));
    frame.render_widget(list, list_area);

    if let (Some(area), Some(buffer)) = (input_area, input) {
        let prompt = Paragraph::new(buffer)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" new task: description / importance / cost "),
            )
            .style(Style::default().fg(Color::White));
        frame.render_widget(prompt, area);
    }
}

/// Scatter of cost (x) against importance (y), split into quadrants at the
/// range midpoint. Axis bounds are padded a quarter step past the range so
/// jittered edge points stay visible.
fn render_plot(frame: &mut Frame, area: Rect, points: &[PlotPoint], range: ValueRange) {
    let lo = range.min - 0.25;
    let hi = range.max + 0.25;
    let width = hi - lo;
    let split = range.split();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" x: time commitment, y: importance "),
        )
        .x_bounds([lo, hi])
        .y_bounds([lo, hi])
        .paint(move |ctx| {
            // Quadrant boundaries.
            ctx.draw(&CanvasLine {
                x1: split,
                y1: lo,
                x2: split,
                y2: hi,
                color: Color::Gray,
            });
            ctx.draw(&CanvasLine {
                x1: lo,
                y1: split,
                x2: hi,
                y2: split,
                color: Color::Gray,
            });

            // Quadrant numerals, upper-left of each region.
            let numeral = Style::default().fg(Color::DarkGray);
            ctx.print(lo + 0.05 * width, lo + 0.95 * width, Line::styled("1", numeral));
            ctx.print(lo + 0.55 * width, lo + 0.95 * width, Line::styled("2", numeral));
            ctx.print(lo + 0.05 * width, lo + 0.45 * width, Line::styled("3", numeral));
            ctx.print(lo + 0.55 * width, lo + 0.45 * width, Line::styled("4", numeral));

            // Axis extremes, - to + on both axes.
            ctx.print(range.min, lo, Line::styled("-", numeral));
            ctx.print(range.max, lo, Line::styled("+", numeral));
            ctx.print(lo, range.min, Line::styled("-", numeral));
            ctx.print(lo, range.max, Line::styled("+", numeral));

            for point in points {
                let (mark, color) = if point.completed {
                    (COMPLETE_MARK, Color::Green)
                } else {
                    (INCOMPLETE_MARK, Color::Red)
                };
                ctx.print(
                    point.x,
                    point.y,
                    Line::styled(mark.to_string(), Style::default().fg(color)),
                );
            }
        });
    frame.render_widget(canvas, area);
}
