// notify.rs

use std::collections::VecDeque;
use tracing::{info, warn};

/// Where the core reports reminders, confirmations and input errors.
pub trait NotificationSink {
    fn show_error(&mut self, title: &str, message: &str);
    fn show_info(&mut self, title: &str, message: &str);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Popup {
    pub level: Level,
    pub title: String,
    pub message: String,
}

/// Popups waiting to be acknowledged, oldest first. The TUI draws the front
/// one as a modal.
#[derive(Debug, Default)]
pub struct PopupQueue {
    queue: VecDeque<Popup>,
}

impl PopupQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Popup> {
        self.queue.front()
    }

    pub fn dismiss(&mut self) -> Option<Popup> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, level: Level, title: &str, message: &str) {
        self.queue.push_back(Popup {
            level,
            title: title.to_string(),
            message: message.to_string(),
        });
    }
}

impl NotificationSink for PopupQueue {
    fn show_error(&mut self, title: &str, message: &str) {
        warn!(title, body = message, "error popup");
        self.push(Level::Error, title, message);
    }

    fn show_info(&mut self, title: &str, message: &str) {
        info!(title, body = message, "info popup");
        self.push(Level::Info, title, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popups_are_shown_in_order() {
        let mut popups = PopupQueue::new();
        popups.show_info("Reminder", "first");
        popups.show_error("Invalid Input", "second");
        assert_eq!(popups.len(), 2);

        let front = popups.current().unwrap();
        assert_eq!(front.level, Level::Info);
        assert_eq!(front.message, "first");

        popups.dismiss();
        let front = popups.current().unwrap();
        assert_eq!(front.level, Level::Error);
        assert_eq!(front.title, "Invalid Input");

        popups.dismiss();
        assert!(popups.is_empty());
        assert!(popups.dismiss().is_none());
    }
}
