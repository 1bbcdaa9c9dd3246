//! Canonical domain types: UTC instants, calendar dates and query windows.

mod date_window;
mod timestamp;

pub use date_window::{DateWindow, UtcDate};
pub use timestamp::UtcDateTime;
