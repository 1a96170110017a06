// store.rs

use crate::error::TaskError;
use crate::task::{Bucket, Task, TaskId, TaskState};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::info;

pub const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses the date (`YYYY-MM-DD`) and time (`HH:MM`) input fields as one
/// local date-time with seconds set to zero.
pub fn parse_due(date: &str, time: &str) -> Result<NaiveDateTime, TaskError> {
    let input = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&input, DUE_FORMAT)
        .map_err(|_| TaskError::Validation { input })
}

/// In-memory tasks, kept in due order.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: BTreeMap<TaskId, Task>,
    next_seq: u64,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        description: &str,
        date: &str,
        time: &str,
        now: NaiveDateTime,
    ) -> Result<TaskId, TaskError> {
        let due_at = parse_due(date, time)?;
        self.insert(description, due_at, now)
    }

    pub fn insert(
        &mut self,
        description: &str,
        due_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<TaskId, TaskError> {
        if due_at <= now {
            return Err(TaskError::PastDue { due_at });
        }
        let id = TaskId::new(due_at, self.next_seq);
        self.next_seq += 1;
        self.tasks
            .insert(id, Task::new(description.to_string(), due_at));
        info!(%id, description, "task added");
        Ok(id)
    }

    pub fn mark_completed(&mut self, id: TaskId) -> Result<&Task, TaskError> {
        let task = self.tasks.get_mut(&id).ok_or(TaskError::NotFound(id))?;
        task.transition(TaskState::Completed)?;
        info!(%id, "task completed");
        Ok(task)
    }

    pub fn delete(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let task = self.tasks.remove(&id).ok_or(TaskError::NotFound(id))?;
        info!(%id, "task deleted");
        Ok(task)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Tasks in `bucket`, ascending by due time. Call again to restart.
    pub fn list_by_state(
        &self,
        bucket: Bucket,
    ) -> impl Iterator<Item = (TaskId, &Task)> + Clone + '_ {
        self.tasks
            .iter()
            .filter(move |(_, task)| bucket.contains(task))
            .map(|(id, task)| (*id, task))
    }

    pub(crate) fn pending_mut(&mut self) -> impl Iterator<Item = (TaskId, &mut Task)> + '_ {
        self.tasks
            .iter_mut()
            .filter(|(_, task)| task.is_pending())
            .map(|(id, task)| (*id, task))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
