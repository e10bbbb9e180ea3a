//! Date-window and time-grid computation for the agenda views.
//!
//! Everything in here is pure: the handlers feed it parsed dates and
//! appointment occurrences and serialize whatever comes back.

pub mod grid;
pub mod range;

pub use grid::{GridConfig, GridEvent, LayoutBlock, clip_to_day, layout_day};
pub use range::{ViewMode, fetch_window, window_days};
