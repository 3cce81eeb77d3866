//! TUI (Text User Interface) module for imgrot
//!
//! Terminal setup, the event thread and the interactive viewer, built on
//! ratatui/crossterm.

pub mod app;
pub mod event;
pub mod viewer;

pub use app::App;
pub use event::{Event, EventHandler};
pub use viewer::Viewer;
