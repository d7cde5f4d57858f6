//! Selection, hover and scroll state of the explorer
//!
//! Scrolling keeps two offsets per list: an integer target row, always within
//! `[0, max]`, and a smoothed offset that eases toward it every tick. Drawing
//! and hit-testing both use the smoothed offset so what the pointer hits is
//! what is on screen.

use super::layout::Panel;
use crate::host::{FontMode, Rect};
use crate::model::variables::NodePath;
use tracing::trace;

/// Distance under which the smoothed offset snaps onto the target
const SNAP_DISTANCE: f32 = 0.01;

/// Scroll state for one list pane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    target: usize,
    smoothed: f32,
    max: usize,
}

impl ScrollState {
    pub fn new() -> Self {
        ScrollState::default()
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Recompute the scroll range for the current content and viewport
    pub fn set_bounds(&mut self, content_rows: usize, visible_rows: usize) {
        self.max = content_rows.saturating_sub(visible_rows);
        self.target = self.target.min(self.max);
    }

    /// Move the target by `rows`, clamped to the range
    pub fn scroll_by(&mut self, rows: isize) {
        let target = (self.target as isize).saturating_add(rows).max(0) as usize;
        self.target = target.min(self.max);
        trace!(target = self.target, max = self.max, "scroll");
    }

    /// Scroll just enough for `row` to be inside a viewport of `visible_rows`
    pub fn ensure_visible(&mut self, row: usize, visible_rows: usize) {
        if visible_rows == 0 {
            return;
        }
        if row < self.target {
            self.target = row;
        } else if row >= self.target + visible_rows {
            self.target = row + 1 - visible_rows;
        }
        self.target = self.target.min(self.max);
    }

    /// Ease the smoothed offset toward the target by `factor` of the distance
    pub fn animate(&mut self, factor: f32) {
        let target = self.target as f32;
        self.smoothed += (target - self.smoothed) * factor.clamp(0.0, 1.0);
        if (target - self.smoothed).abs() < SNAP_DISTANCE {
            self.smoothed = target;
        }
    }

    /// Smoothed offset in pixels for rows of `line_height`
    pub fn pixel_offset(&self, line_height: i32) -> i32 {
        (self.smoothed * line_height as f32).round() as i32
    }
}

/// Screen rectangles of the rows of a scrolled list that touch `content`
///
/// Yields `(row index, unclipped row rect)`; rows partially scrolled out are
/// included and left for the caller to clip.
pub fn visible_rows(
    content: Rect,
    row_count: usize,
    scroll: &ScrollState,
    line_height: i32,
) -> impl Iterator<Item = (usize, Rect)> {
    let line_height = line_height.max(1);
    let offset = scroll.pixel_offset(line_height);
    let first = (offset / line_height).max(0) as usize;

    (first..row_count)
        .map(move |row| {
            let y = content.y + row as i32 * line_height - offset;
            (row, Rect::new(content.x, y, content.width, line_height))
        })
        .take_while(move |(_, rect)| rect.y < content.bottom())
}

/// Row of a scrolled list under the pointer, if any
pub fn hit_test(
    panel: &Panel,
    row_count: usize,
    scroll: &ScrollState,
    line_height: i32,
    x: i32,
    y: i32,
) -> Option<usize> {
    if !panel.content.contains(x, y) {
        return None;
    }
    visible_rows(panel.content, row_count, scroll, line_height)
        .find(|(_, rect)| rect.intersection(&panel.content).contains(x, y))
        .map(|(row, _)| row)
}

/// Interaction state of an explorer session
#[derive(Debug, Clone)]
pub struct NavigationState {
    pub selected: usize,
    /// Recomputed every tick from the pointer position
    pub hovered_frame: Option<usize>,
    pub hovered_variable: Option<NodePath>,
    pub stack_scroll: ScrollState,
    pub variable_scroll: ScrollState,
    pub font: FontMode,
    pointer_was_down: bool,
}

impl NavigationState {
    pub fn new(font: FontMode) -> Self {
        NavigationState {
            selected: 0,
            hovered_frame: None,
            hovered_variable: None,
            stack_scroll: ScrollState::new(),
            variable_scroll: ScrollState::new(),
            font,
            pointer_was_down: false,
        }
    }

    /// Record this tick's button state; true only on a press edge
    pub fn click_edge(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.pointer_was_down;
        self.pointer_was_down = pressed;
        edge
    }

    pub fn clear_hover(&mut self) {
        self.hovered_frame = None;
        self.hovered_variable = None;
    }

    /// Index `delta` frames away from the selection, clamped to `[0, count)`
    pub fn step_target(&self, delta: isize, count: usize) -> Option<usize> {
        if count == 0 {
            return None;
        }
        let index = (self.selected as isize).saturating_add(delta).max(0) as usize;
        Some(index.min(count - 1))
    }
}
