//! # Introduction
//!
//! crashlens is an embedded error explorer for tick-driven hosts. It wraps the
//! `init`/`update`/`draw` callbacks of a user program, and when one of them
//! fails it takes over the screen with an interactive view of the failure: the
//! captured call stack, the variables of each frame and the source around the
//! failing line. The host process never crashes and never exits because of
//! the failure.
//!
//! ## Failure pipeline
//!
//! ```text
//! Fault → Interceptor → ErrorSnapshot → ExplorerSession → panes → Canvas
//! ```
//!
//! 1. [`shim`]: runs user callbacks under supervision and switches into
//!    exploring mode on the first failure.
//! 2. [`snapshot`]: captures message, location, trace and execution context.
//! 3. [`model`]: stack frames, the lazily expanded variable tree, dynamic
//!    [`model::value::Value`]s and the cached source view.
//! 4. [`ui`]: session state, navigation, scrolling and rendering through the
//!    host traits in [`host`].
//! 5. [`backend`]: a terminal host built on ratatui and crossterm, used by
//!    the demo binary.
//!
//! Configuration lives in [`config`], failure types in [`errors`].

pub mod backend;
pub mod config;
pub mod errors;
pub mod host;
pub mod model;
pub mod shim;
pub mod snapshot;
pub mod ui;
