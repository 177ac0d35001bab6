//! SnapDrag Demo Application
//!
//! Windowing shell that feeds winit input into a drag engine and drives
//! its frame timer from the event loop.

mod app;
mod timer;

pub use app::{App, AppConfig, AppError};
pub use timer::DeadlineTimer;
