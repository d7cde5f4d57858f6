//! Introspection models
//!
//! This module provides the data the explorer shows for a captured failure:
//! - [`value`]: tagged runtime values with safe display and key ordering
//! - [`stack`]: the frame sequence walked from the failing context
//! - [`variables`]: the lazily expanded variable tree of the selected frame
//! - [`source`]: the source lines around the selected frame's current line
//!
//! Selecting another frame rebuilds [`variables::VariableTree`] and
//! [`source::SourceView`]; the frame sequence itself never changes.

pub mod source;
pub mod stack;
pub mod value;
pub mod variables;
