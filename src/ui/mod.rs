//! The error explorer drawn through the host [`Canvas`](crate::host::Canvas).
//!
//! The UI is organized into these layers:
//!
//! - **[`app`]**: the explorer session, per-tick input handling and frame selection
//! - **[`navigation`]**: selection, hover and smoothed scroll state
//! - **[`layout`]**: panel rectangles derived from screen size and font metrics
//! - **[`panes`]**: stateless render functions for each panel (header, stack,
//!   variables, source, status line)
//! - **[`theme`]**: palette indices used by all panes
//!
//! The entry point is [`ExplorerSession`], normally owned and driven by the
//! [`Interceptor`](crate::shim::Interceptor).

pub mod app;
pub mod layout;
pub mod navigation;
pub mod panes;
pub mod theme;

pub use app::ExplorerSession;
