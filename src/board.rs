// board.rs

use crate::store::TaskStore;
use crate::task::{Bucket, Task, TaskId};
use chrono::{Duration, NaiveDateTime};
use std::fmt;

pub const PASSED: &str = "Task already passed";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeLeft {
    Remaining(Duration),
    Passed,
}

impl TimeLeft {
    pub fn until(due_at: NaiveDateTime, now: NaiveDateTime) -> Self {
        let diff = due_at - now;
        if diff > Duration::zero() {
            TimeLeft::Remaining(diff)
        } else {
            TimeLeft::Passed
        }
    }
}

impl fmt::Display for TimeLeft {
    /// `H:MM:SS`, whole seconds only. Hours are not folded into days.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLeft::Remaining(d) => {
                let secs = d.num_seconds();
                write!(f, "{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
            }
            TimeLeft::Passed => f.write_str(PASSED),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskView {
    pub id: TaskId,
    pub description: String,
    pub due_at: NaiveDateTime,
    pub time_left: TimeLeft,
}

impl TaskView {
    fn new(id: TaskId, task: &Task, now: NaiveDateTime) -> Self {
        Self {
            id,
            description: task.description.clone(),
            due_at: task.due_at,
            time_left: TimeLeft::until(task.due_at, now),
        }
    }

    fn due_label(&self) -> String {
        self.due_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn pending_label(&self) -> String {
        format!(
            "{} at {} (Time left: {})",
            self.description,
            self.due_label(),
            self.time_left
        )
    }

    pub fn completed_label(&self) -> String {
        format!("{} at {} (Completed)", self.description, self.due_label())
    }

    pub fn failed_label(&self) -> String {
        format!("{} at {} (Failed)", self.description, self.due_label())
    }
}

/// Snapshot of the three lists, all computed against one `now`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub now: NaiveDateTime,
    pub pending: Vec<TaskView>,
    pub completed: Vec<TaskView>,
    pub failed: Vec<TaskView>,
}

impl Board {
    pub fn build(store: &TaskStore, now: NaiveDateTime) -> Self {
        let views = |bucket| {
            store
                .list_by_state(bucket)
                .map(|(id, task)| TaskView::new(id, task, now))
                .collect::<Vec<_>>()
        };
        Self {
            now,
            pending: views(Bucket::Pending),
            completed: views(Bucket::Completed),
            failed: views(Bucket::Failed),
        }
    }
}
