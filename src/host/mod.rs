//! Host collaborator interfaces
//!
//! The explorer never draws, polls input, reads files or logs on its own. It
//! talks to the host application through the narrow traits in this module:
//!
//! - [`Canvas`]: clear, clip, text drawing and font metrics
//! - [`Input`]: pointer state and discrete button edges for the current tick
//! - [`SourceReader`]: file contents keyed by path
//! - [`LogSink`]: the host console that receives failure traces
//! - [`Host`]: all of the above plus the presentation-state reset
//!
//! The failing execution context is described by [`Introspect`], which the
//! host's scripting runtime implements and attaches to a
//! [`Fault`](crate::errors::Fault).

use crate::model::value::Value;
use std::io;

/// Palette index used for all drawing calls
pub type Color = u8;

/// A screen rectangle in host pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlapping part of two rectangles, empty when they don't touch
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x).max(0), (bottom - y).max(0))
    }
}

/// Active glyph set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontMode {
    #[default]
    Large,
    Small,
}

impl FontMode {
    pub fn toggled(self) -> Self {
        match self {
            FontMode::Large => FontMode::Small,
            FontMode::Small => FontMode::Large,
        }
    }
}

/// Glyph metrics for one font mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontMetrics {
    pub glyph_width: i32,
    pub line_height: i32,
}

/// Drawing primitives
pub trait Canvas {
    fn clear(&mut self, color: Color);

    /// Restrict drawing to `rect`, or lift the restriction with `None`
    fn clip(&mut self, rect: Option<Rect>);

    /// Draw text and return the x coordinate just past it
    fn print(&mut self, text: &str, x: i32, y: i32, color: Color) -> i32;

    fn screen_size(&self) -> (i32, i32);

    fn metrics(&self, font: FontMode) -> FontMetrics;

    fn set_font(&mut self, font: FontMode);
}

/// Pointer state sampled for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerState {
    pub x: i32,
    pub y: i32,
    pub pressed: bool,
    /// Wheel notches this tick, positive = up
    pub wheel: i32,
}

/// Discrete buttons the explorer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    ToggleFont,
}

pub trait Input {
    fn pointer(&self) -> PointerState;

    /// True only on the tick the button went down
    fn just_pressed(&self, button: Button) -> bool;
}

pub trait SourceReader {
    fn read_source(&mut self, path: &str) -> io::Result<String>;
}

pub trait LogSink {
    fn log(&mut self, text: &str);
}

/// Everything the explorer needs from the host application
pub trait Host: Canvas + Input + SourceReader + LogSink {
    /// Restore default palette, clipping and draw state
    fn reset_presentation(&mut self);
}

/// Where a frame's code came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceId {
    /// Code loaded from a file at this path
    File(String),
    /// Code compiled from an in-memory chunk
    Inline(String),
}

impl SourceId {
    pub fn path(&self) -> Option<&str> {
        match self {
            SourceId::File(path) => Some(path),
            SourceId::Inline(_) => None,
        }
    }
}

/// Per-frame metadata reported by the host runtime
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInfo {
    pub source: Option<SourceId>,
    /// `None` for frames that are not executing source lines (native code)
    pub current_line: Option<u32>,
    pub line_defined: u32,
    pub name: Option<String>,
}

/// A named value visible in a frame
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub value: Value,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Binding {
            name: name.into(),
            value,
        }
    }
}

/// Introspection over a failed execution context
///
/// Depth 0 is the innermost frame.
pub trait Introspect {
    /// Metadata for the frame at `depth`, `None` past the outermost frame
    fn frame_info(&self, depth: usize) -> Option<FrameInfo>;

    /// Locals of the frame at `depth`, in declaration order
    fn locals(&self, depth: usize) -> Vec<Binding>;

    /// Captured variables of the frame at `depth`, in declaration order
    fn upvalues(&self, depth: usize) -> Vec<Binding>;

    /// Full textual trace of the failure
    fn traceback(&self, message: &str) -> String;
}
