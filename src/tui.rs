// tui.rs

use crate::app::{App, InputMode};
use crate::board::TaskView;
use crate::notify::Level;
use crate::poll::TickTimer;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Terminal,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io;
use std::time::{Duration, Instant};
use textwrap::wrap;
use tracing::info;

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs the event loop until the user quits. The poll tick shares this loop:
/// input is awaited only until the next tick deadline.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick_interval: Duration,
) -> io::Result<()>
where
    std::io::Error: From<<B as Backend>::Error>,
{
    let mut timer = TickTimer::new(tick_interval, Instant::now());
    info!(?tick_interval, "event loop started");

    loop {
        if timer.is_due(Instant::now()) {
            app.on_tick();
            timer.reschedule(Instant::now());
        }
        terminal.draw(|f| ui(f, app))?;

        if event::poll(timer.timeout(Instant::now()))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key(app, key) == Flow::Quit {
                    info!("event loop stopped");
                    return Ok(());
                }
            }
        }
    }
}

/// Runs `setup`; if it fails, `restore` runs before the error is returned,
/// so a half-initialised terminal is not left in raw mode.
pub fn setup_or_restore<T, E>(
    setup: impl FnOnce() -> Result<T, E>,
    restore: impl FnOnce(),
) -> Result<T, E> {
    setup().inspect_err(|_| restore())
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    // popups are modal
    if !app.popups.is_empty() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            app.popups.dismiss();
        }
        return Flow::Continue;
    }

    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('a') => app.begin_input(),
            KeyCode::Char('d') => app.complete_selected(),
            // Delete selected task (Shift+R only)
            KeyCode::Char('r') | KeyCode::Char('R')
                if key.modifiers.contains(KeyModifiers::SHIFT) =>
            {
                app.delete_selected();
            }
            KeyCode::Down => app.select_next(),
            KeyCode::Up => app.select_prev(),
            _ => {}
        },
        InputMode::EditingDescription | InputMode::EditingDate | InputMode::EditingTime => {
            match key.code {
                KeyCode::Enter => {
                    // errors become popups; inputs stay for correction
                    let _ = app.submit();
                }
                KeyCode::Esc => app.input_mode = InputMode::Normal,
                KeyCode::Tab => app.input_mode = app.input_mode.next_field(),
                KeyCode::Char(c) => {
                    if let Some(field) = app.active_input_mut() {
                        field.push(c);
                    }
                }
                KeyCode::Backspace => {
                    if let Some(field) = app.active_input_mut() {
                        field.pop();
                    }
                }
                _ => {}
            }
        }
    }
    Flow::Continue
}

pub fn ui(f: &mut ratatui::Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(2), // help
            Constraint::Length(3), // inputs
            Constraint::Min(5),    // incomplete
            Constraint::Length(7), // completed
            Constraint::Length(7), // failed
        ])
        .split(f.area());

    let title = Paragraph::new(Line::from(Span::styled(
        format!("Day Planner (Reminder)  {}", app.board().now.format("%Y-%m-%d %H:%M:%S")),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let b = Style::default().add_modifier(Modifier::BOLD);
    let help = if app.input_mode == InputMode::Normal {
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("a", b),
            Span::raw(" add, "),
            Span::styled("d", b),
            Span::raw(" complete, "),
            Span::raw("Shift+"),
            Span::styled("R", b),
            Span::raw(" delete, "),
            Span::styled("↑/↓", b),
            Span::raw(" select, "),
            Span::styled("q", b),
            Span::raw(" quit"),
        ])
    } else {
        Line::from(vec![
            Span::styled("Tab", b),
            Span::raw(" next field, "),
            Span::styled("Enter", b),
            Span::raw(" add task, "),
            Span::styled("Esc", b),
            Span::raw(" cancel"),
        ])
    };
    let reminder_note = Line::from(Span::styled(
        format!("Reminders appear {} minutes before a task is due", app.reminder_window_minutes()),
        Style::default().fg(Color::Gray),
    ));
    f.render_widget(
        Paragraph::new(vec![help, reminder_note]).alignment(Alignment::Center),
        chunks[1],
    );

    render_inputs(f, app, chunks[2]);

    let board = app.board();
    let pending: Vec<String> = board.pending.iter().map(TaskView::pending_label).collect();
    let mut pending_state = ListState::default();
    if !pending.is_empty() {
        pending_state.select(Some(app.selected.min(pending.len() - 1)));
    }
    let pending_list = List::new(items(&pending, chunks[3], Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Incomplete Tasks"))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    f.render_stateful_widget(pending_list, chunks[3], &mut pending_state);

    let completed: Vec<String> = board.completed.iter().map(TaskView::completed_label).collect();
    f.render_widget(
        List::new(items(&completed, chunks[4], Color::Green))
            .block(Block::default().borders(Borders::ALL).title("Completed Tasks")),
        chunks[4],
    );

    let failed: Vec<String> = board.failed.iter().map(TaskView::failed_label).collect();
    f.render_widget(
        List::new(items(&failed, chunks[5], Color::Red))
            .block(Block::default().borders(Borders::ALL).title("Failed Tasks")),
        chunks[5],
    );

    render_popup(f, app);
}

fn render_inputs(f: &mut ratatui::Frame<'_>, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let fields = [
        (InputMode::EditingDescription, "Task Description", &app.input_description),
        (InputMode::EditingDate, "Task Date (YYYY-MM-DD)", &app.input_date),
        (InputMode::EditingTime, "Task Time (HH:MM)", &app.input_time),
    ];
    for (col, (mode, title, value)) in fields.into_iter().enumerate() {
        let focused = app.input_mode == mode;
        let (text, style) = if focused {
            (
                format!("{}|", value),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else {
            (value.to_string(), Style::default())
        };
        let widget = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title(title))
            .style(style);
        f.render_widget(widget, cols[col]);
    }
}

fn items(labels: &[String], area: Rect, color: Color) -> Vec<ListItem<'static>> {
    // minus borders and highlight symbol
    let width = (area.width.saturating_sub(5) as usize).max(1);
    labels
        .iter()
        .map(|label| {
            let lines: Vec<Line> = wrap(label, width)
                .iter()
                .map(|w| Line::from(Span::styled(w.to_string(), Style::default().fg(color))))
                .collect();
            ListItem::new(lines)
        })
        .collect()
}

fn render_popup(f: &mut ratatui::Frame<'_>, app: &App) {
    let Some(popup) = app.popups.current() else {
        return;
    };
    let area = centered(f.area(), 60, 7);
    let color = match popup.level {
        Level::Info => Color::Cyan,
        Level::Error => Color::Red,
    };
    let mut title = format!(" {} ", popup.title);
    if app.popups.len() > 1 {
        title.push_str(&format!("(+{}) ", app.popups.len() - 1));
    }
    let body = Paragraph::new(vec![
        Line::from(popup.message.as_str()),
        Line::from(""),
        Line::from(Span::styled("[Enter] OK", Style::default().add_modifier(Modifier::BOLD))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(color)),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
