// poll.rs

use crate::notify::NotificationSink;
use crate::store::TaskStore;
use crate::task::{TaskId, TaskState};
use chrono::{Duration, NaiveDateTime};
use std::time::{Duration as StdDuration, Instant};
use tracing::{debug, info, warn};

pub const DEFAULT_REMINDER_WINDOW_SECS: u64 = 1800;

/// What a single tick changed.
#[derive(Debug, PartialEq, Eq)]
pub struct TickReport {
    pub now: NaiveDateTime,
    pub reminded: Vec<TaskId>,
    pub failed: Vec<TaskId>,
}

/// Fires the one-time reminder and flips overdue tasks to failed.
#[derive(Debug, Clone)]
pub struct ReminderEngine {
    window: Duration,
}

impl Default for ReminderEngine {
    fn default() -> Self {
        Self::new(DEFAULT_REMINDER_WINDOW_SECS)
    }
}

impl ReminderEngine {
    /// Windows too large for a `Duration` saturate to `Duration::MAX`.
    pub fn new(window_secs: u64) -> Self {
        let window = i64::try_from(window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// The window in whole minutes, rounded up.
    pub fn window_minutes(&self) -> i64 {
        let secs = self.window.num_seconds();
        secs / 60 + i64::from(secs % 60 != 0)
    }

    fn reminder_message(&self, description: &str) -> String {
        let minutes = self.window_minutes();
        format!(
            "Task '{}' has {} {} or less remaining!",
            description,
            minutes,
            if minutes == 1 { "minute" } else { "minutes" }
        )
    }

    /// Examines every pending task against `now`. Completed and failed tasks
    /// are skipped.
    pub fn tick(
        &self,
        store: &mut TaskStore,
        now: NaiveDateTime,
        sink: &mut dyn NotificationSink,
    ) -> TickReport {
        let mut report = TickReport {
            now,
            reminded: Vec::new(),
            failed: Vec::new(),
        };

        for (id, task) in store.pending_mut() {
            let remaining = task.due_at - now;

            if remaining > Duration::zero()
                && remaining <= self.window
                && !task.reminder_shown()
            {
                match task.transition(TaskState::ReminderSent) {
                    Ok(()) => {
                        sink.show_info("Reminder", &self.reminder_message(&task.description));
                        report.reminded.push(id);
                    }
                    Err(e) => warn!(%id, error = %e, "reminder skipped"),
                }
            }

            if remaining <= Duration::zero() {
                match task.transition(TaskState::Failed) {
                    Ok(()) => {
                        info!(%id, description = %task.description, "task missed its deadline");
                        report.failed.push(id);
                    }
                    Err(e) => warn!(%id, error = %e, "expiry skipped"),
                }
            }
        }

        debug!(
            %now,
            reminded = report.reminded.len(),
            failed = report.failed.len(),
            "tick"
        );
        report
    }
}

/// Fixed-period deadline for the poll tick, driven from the event loop.
/// The next deadline is set only after the current tick's work is done.
#[derive(Debug, Clone)]
pub struct TickTimer {
    period: StdDuration,
    next_at: Instant,
}

impl TickTimer {
    /// The first tick is due immediately.
    pub fn new(period: StdDuration, now: Instant) -> Self {
        Self {
            period,
            next_at: now,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_at
    }

    /// How long the event loop may block waiting for input.
    pub fn timeout(&self, now: Instant) -> StdDuration {
        self.next_at.saturating_duration_since(now)
    }

    pub fn reschedule(&mut self, now: Instant) {
        self.next_at = now + self.period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Level, PopupQueue};
    use crate::task::Bucket;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 14)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn standup_scenario() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::default();
        let id = store
            .insert("Standup", t0() + Duration::minutes(10), t0())
            .unwrap();

        // created inside the window: first tick reminds
        let report = engine.tick(&mut store, t0() + Duration::seconds(571), &mut popups);
        assert_eq!(report.reminded, vec![id]);
        assert!(report.failed.is_empty());
        assert_eq!(popups.len(), 1);
        let popup = popups.current().unwrap();
        assert_eq!(popup.level, Level::Info);
        assert_eq!(popup.title, "Reminder");
        assert_eq!(
            popup.message,
            "Task 'Standup' has 30 minutes or less remaining!"
        );
        assert!(store.get(id).unwrap().reminder_shown());

        let report = engine.tick(&mut store, t0() + Duration::minutes(10), &mut popups);
        assert_eq!(report.failed, vec![id]);
        assert!(report.reminded.is_empty());
        assert_eq!(store.list_by_state(Bucket::Pending).count(), 0);
        assert_eq!(store.list_by_state(Bucket::Failed).count(), 1);

        for secs in [601, 900, 3600] {
            let report = engine.tick(&mut store, t0() + Duration::seconds(secs), &mut popups);
            assert!(report.reminded.is_empty());
            assert!(report.failed.is_empty());
        }
        assert_eq!(popups.len(), 1);
        assert!(store.get(id).unwrap().is_failed());
    }

    #[test]
    fn reminder_fires_once_across_the_window() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::default();
        let due = t0() + Duration::hours(1);
        let id = store.insert("Call", due, t0()).unwrap();

        let mut now = due - Duration::seconds(1805);
        let mut fired = Vec::new();
        while now < due {
            fired.extend(engine.tick(&mut store, now, &mut popups).reminded);
            now += Duration::seconds(1);
        }
        assert_eq!(fired, vec![id]);
        assert_eq!(popups.len(), 1);
        assert!(store.get(id).unwrap().is_pending());
    }

    #[test]
    fn reminder_boundary_is_inclusive() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::default();
        let due = t0() + Duration::hours(1);
        store.insert("Edge", due, t0()).unwrap();

        let report = engine.tick(&mut store, due - Duration::seconds(1801), &mut popups);
        assert!(report.reminded.is_empty());
        let report = engine.tick(&mut store, due - Duration::seconds(1800), &mut popups);
        assert_eq!(report.reminded.len(), 1);
    }

    #[test]
    fn overdue_without_reminder_fails_silently() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::default();
        let id = store.insert("Missed", t0() + Duration::hours(2), t0()).unwrap();

        let report = engine.tick(&mut store, t0() + Duration::hours(3), &mut popups);
        assert_eq!(report.failed, vec![id]);
        assert!(report.reminded.is_empty());
        assert!(popups.is_empty());
    }

    #[test]
    fn completed_tasks_are_never_reminded_or_failed() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::default();
        let id = store.insert("Early bird", t0() + Duration::hours(1), t0()).unwrap();
        store.mark_completed(id).unwrap();

        engine.tick(&mut store, t0() + Duration::minutes(45), &mut popups);
        engine.tick(&mut store, t0() + Duration::hours(2), &mut popups);
        assert!(popups.is_empty());
        assert!(store.get(id).unwrap().is_completed());
    }

    #[test]
    fn deleted_task_is_not_recreated() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::default();
        let id = store.insert("Dentist", t0() + Duration::hours(2), t0()).unwrap();
        store.delete(id).unwrap();

        let later = t0() + Duration::hours(2) + Duration::seconds(1);
        let report = engine.tick(&mut store, later, &mut popups);
        assert!(report.failed.is_empty());
        assert!(store.is_empty());
        for bucket in [Bucket::Pending, Bucket::Completed, Bucket::Failed] {
            assert_eq!(store.list_by_state(bucket).count(), 0);
        }
    }

    #[test]
    fn one_task_expiring_does_not_stop_the_others() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::default();
        let a = store.insert("a", t0() + Duration::minutes(5), t0()).unwrap();
        let b = store.insert("b", t0() + Duration::minutes(20), t0()).unwrap();
        let c = store.insert("c", t0() + Duration::hours(4), t0()).unwrap();

        let report = engine.tick(&mut store, t0() + Duration::minutes(6), &mut popups);
        assert_eq!(report.failed, vec![a]);
        assert_eq!(report.reminded, vec![b]);
        assert_eq!(store.get(c).unwrap().state(), TaskState::Pending);
    }

    #[test]
    fn custom_window_changes_message() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::new(600);
        store.insert("Tea", t0() + Duration::minutes(15), t0()).unwrap();

        engine.tick(&mut store, t0(), &mut popups);
        assert!(popups.is_empty());
        engine.tick(&mut store, t0() + Duration::minutes(5), &mut popups);
        assert_eq!(
            popups.current().unwrap().message,
            "Task 'Tea' has 10 minutes or less remaining!"
        );
    }

    #[test]
    fn short_windows_round_up_to_a_minute() {
        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        let engine = ReminderEngine::new(45);
        assert_eq!(engine.window_minutes(), 1);
        store.insert("x", t0() + Duration::seconds(30), t0()).unwrap();

        engine.tick(&mut store, t0(), &mut popups);
        assert_eq!(
            popups.current().unwrap().message,
            "Task 'x' has 1 minute or less remaining!"
        );
        assert_eq!(ReminderEngine::new(90).window_minutes(), 2);
        assert_eq!(ReminderEngine::new(1800).window_minutes(), 30);
    }

    #[test]
    fn huge_windows_saturate() {
        let engine = ReminderEngine::new(100_000_000_000_000_000);
        assert_eq!(engine.window(), Duration::MAX);
        let engine = ReminderEngine::new(u64::MAX);
        assert_eq!(engine.window(), Duration::MAX);

        let mut store = TaskStore::new();
        let mut popups = PopupQueue::new();
        store.insert("far", t0() + Duration::days(400), t0()).unwrap();
        let report = engine.tick(&mut store, t0(), &mut popups);
        assert_eq!(report.reminded.len(), 1);
    }

    #[test]
    fn timer_reschedules_from_completion() {
        let start = Instant::now();
        let mut timer = TickTimer::new(StdDuration::from_secs(1), start);
        assert!(timer.is_due(start));
        assert_eq!(timer.timeout(start), StdDuration::ZERO);

        let finished = start + StdDuration::from_millis(30);
        timer.reschedule(finished);
        assert!(!timer.is_due(finished + StdDuration::from_millis(999)));
        assert_eq!(
            timer.timeout(start + StdDuration::from_millis(530)),
            StdDuration::from_millis(500)
        );
        assert!(timer.is_due(finished + StdDuration::from_secs(1)));
        assert_eq!(timer.timeout(finished + StdDuration::from_secs(5)), StdDuration::ZERO);
    }
}
