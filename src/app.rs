// app.rs
use crate::board::Board;
use crate::clock::Clock;
use crate::error::TaskError;
use crate::notify::{NotificationSink, PopupQueue};
use crate::poll::{ReminderEngine, TickReport};
use crate::store::TaskStore;
use crate::task::{TaskId, TaskState};
use chrono::NaiveDateTime;
use tracing::warn;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingDescription,
    EditingDate,
    EditingTime,
}

impl InputMode {
    pub fn next_field(self) -> Self {
        match self {
            InputMode::EditingDescription => InputMode::EditingDate,
            InputMode::EditingDate => InputMode::EditingTime,
            InputMode::EditingTime | InputMode::Normal => InputMode::EditingDescription,
        }
    }
}

pub struct App {
    store: TaskStore,
    engine: ReminderEngine,
    clock: Box<dyn Clock>,
    pub popups: PopupQueue,
    board: Board,

    pub input_mode: InputMode,
    pub input_description: String,
    pub input_date: String,
    pub input_time: String,
    /// Index into the pending list.
    pub selected: usize,
}

impl App {
    pub fn new(engine: ReminderEngine, clock: Box<dyn Clock>) -> Self {
        let store = TaskStore::new();
        let board = Board::build(&store, clock.now());
        Self {
            store,
            engine,
            clock,
            popups: PopupQueue::new(),
            board,
            input_mode: InputMode::Normal,
            input_description: String::new(),
            input_date: String::new(),
            input_time: String::new(),
            selected: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn reminder_window_minutes(&self) -> i64 {
        self.engine.window_minutes()
    }

    pub fn refresh(&mut self, now: NaiveDateTime) {
        self.board = Board::build(&self.store, now);
        self.selected = self.selected.min(self.board.pending.len().saturating_sub(1));
    }

    /// One poll tick: a single clock read drives both the engine and the
    /// refreshed board.
    pub fn on_tick(&mut self) -> TickReport {
        let now = self.clock.now();
        let report = self.engine.tick(&mut self.store, now, &mut self.popups);
        self.refresh(report.now);
        report
    }

    /// Adds a task from the three input fields. On error the inputs are kept
    /// so the user can fix them.
    pub fn submit(&mut self) -> Result<TaskId, TaskError> {
        let now = self.clock.now();
        let result = self.store.add(
            &self.input_description,
            &self.input_date,
            &self.input_time,
            now,
        );
        match &result {
            Ok(_) => {
                self.input_description.clear();
                self.input_date.clear();
                self.input_time.clear();
                self.input_mode = InputMode::Normal;
            }
            Err(e) => self.report(e),
        }
        self.refresh(now);
        result
    }

    pub fn complete(&mut self, id: TaskId) -> Result<(), TaskError> {
        let result = self.store.mark_completed(id).map(|task| {
            format!("Task '{}' marked as completed.", task.description)
        });
        match &result {
            Ok(message) => self.popups.show_info("Task Completed", message),
            Err(e) => self.report(e),
        }
        self.refresh(self.clock.now());
        result.map(|_| ())
    }

    pub fn delete(&mut self, id: TaskId) -> Result<(), TaskError> {
        let result = self.store.delete(id).map(|_| ());
        match &result {
            Ok(()) => self.popups.show_info("Task Deleted", "The task has been deleted."),
            Err(e) => self.report(e),
        }
        self.refresh(self.clock.now());
        result
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.board.pending.get(self.selected).map(|view| view.id)
    }

    pub fn complete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            // already surfaced as a popup
            let _ = self.complete(id);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            let _ = self.delete(id);
        }
    }

    pub fn select_next(&mut self) {
        if self.selected < self.board.pending.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn begin_input(&mut self) {
        self.input_mode = InputMode::EditingDescription;
    }

    pub fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.input_mode {
            InputMode::EditingDescription => Some(&mut self.input_description),
            InputMode::EditingDate => Some(&mut self.input_date),
            InputMode::EditingTime => Some(&mut self.input_time),
            InputMode::Normal => None,
        }
    }

    fn report(&mut self, error: &TaskError) {
        warn!(%error, "task operation rejected");
        let (title, message) = match error {
            TaskError::Validation { .. } => (
                "Invalid Input",
                "Invalid date or time format. Please try again.".to_string(),
            ),
            TaskError::PastDue { .. } => (
                "Invalid Task Time",
                "Cannot add a task with a past date/time.".to_string(),
            ),
            TaskError::NotFound(_) => ("Task Not Found", "That task no longer exists.".to_string()),
            TaskError::InvalidTransition { from, .. } => (
                "Task Unchanged",
                match from {
                    TaskState::Failed => {
                        "This task has already failed and cannot be completed.".to_string()
                    }
                    TaskState::Completed => "This task is already completed.".to_string(),
                    TaskState::Pending | TaskState::ReminderSent => {
                        "This task cannot be changed right now.".to_string()
                    }
                },
            ),
        };
        self.popups.show_error(title, &message);
    }
}
