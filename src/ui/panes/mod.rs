//! Explorer pane rendering
//!
//! Each pane is a stateless function that turns one model into drawing calls
//! on a [`Canvas`](crate::host::Canvas), clipped to its own area.
//!
//! # Pane Modules
//!
//! - [`header`]: failure location and message
//! - [`stack`]: captured call frames, selection and hover
//! - [`variables`]: expandable variable tree of the selected frame
//! - [`source`]: source lines around the selected frame's current line
//! - [`status`]: key hints and frame position
//! - `utils`: colors and panel helpers shared by the panes

mod utils;

pub mod header;
pub mod source;
pub mod stack;
pub mod status;
pub mod variables;

pub use header::render_header;
pub use source::render_source_pane;
pub use stack::{render_stack_pane, StackRenderData};
pub use status::{render_status_bar, StatusRenderData};
pub use variables::{render_variables_pane, VariablesRenderData};
