// task.rs

use crate::error::TaskError;
use chrono::NaiveDateTime;
use std::fmt;

/// Store key for a task. Orders by due time first, then by insertion order,
/// so two tasks due in the same minute never overwrite each other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId {
    due_at: NaiveDateTime,
    seq: u64,
}

impl TaskId {
    pub(crate) fn new(due_at: NaiveDateTime, seq: u64) -> Self {
        Self { due_at, seq }
    }

    pub fn due_at(&self) -> NaiveDateTime {
        self.due_at
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.due_at.format("%Y-%m-%d %H:%M"), self.seq)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    ReminderSent,
    Completed,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed)
    }
}

/// The list a task is shown in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bucket {
    Pending,
    Completed,
    Failed,
}

impl Bucket {
    pub fn contains(self, task: &Task) -> bool {
        match self {
            Bucket::Pending => task.is_pending(),
            Bucket::Completed => task.is_completed(),
            Bucket::Failed => task.is_failed(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    pub description: String,
    pub due_at: NaiveDateTime,
    state: TaskState,
}

impl Task {
    pub fn new(description: String, due_at: NaiveDateTime) -> Self {
        Self {
            description,
            due_at,
            state: TaskState::Pending,
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        !self.state.is_terminal()
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    pub fn is_failed(&self) -> bool {
        self.state == TaskState::Failed
    }

    pub fn reminder_shown(&self) -> bool {
        self.state == TaskState::ReminderSent
    }

    /// Moves the task to `to` if the transition is allowed.
    ///
    /// Pending -> ReminderSent -> Failed, Pending -> Failed,
    /// Pending -> Completed and ReminderSent -> Completed are the only edges.
    /// Completed -> Completed is accepted and changes nothing.
    pub fn transition(&mut self, to: TaskState) -> Result<(), TaskError> {
        use TaskState::*;
        let allowed = matches!(
            (self.state, to),
            (Pending, ReminderSent)
                | (Pending, Failed)
                | (ReminderSent, Failed)
                | (Pending, Completed)
                | (ReminderSent, Completed)
                | (Completed, Completed)
        );
        if !allowed {
            return Err(TaskError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
