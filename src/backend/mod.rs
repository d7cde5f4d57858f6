//! Host implementations
//!
//! - [`terminal`]: renders into a ratatui [`Buffer`](ratatui::buffer::Buffer),
//!   one terminal cell per host pixel, with crossterm events as input

pub mod terminal;

pub use terminal::TerminalHost;
