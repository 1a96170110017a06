// lib.rs

pub mod app;
pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod poll;
pub mod store;
pub mod task;
pub mod tui;
