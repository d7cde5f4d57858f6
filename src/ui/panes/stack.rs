//! Stack pane rendering
//!
//! One row per captured frame, innermost first: a selection marker, the
//! function label and its `file:line` location.

use super::utils::{begin_panel, render_empty};
use crate::host::Canvas;
use crate::model::stack::StackFrame;
use crate::ui::layout::Panel;
use crate::ui::navigation::{visible_rows, ScrollState};
use crate::ui::theme::DEFAULT_THEME;

/// Data needed to render the stack pane
pub struct StackRenderData<'a> {
    pub frames: &'a [StackFrame],
    pub selected: usize,
    pub hovered: Option<usize>,
    /// False when the failure carried no execution context at all
    pub has_context: bool,
}

/// Render the stack pane
pub fn render_stack_pane<C: Canvas + ?Sized>(
    canvas: &mut C,
    panel: &Panel,
    data: StackRenderData,
    scroll: &ScrollState,
    line_height: i32,
) {
    begin_panel(canvas, panel, "stack");

    if data.frames.is_empty() {
        let text = if data.has_context {
            "(no frames)"
        } else {
            "(no stack information)"
        };
        render_empty(canvas, panel, text);
        return;
    }

    for (row, rect) in visible_rows(panel.content, data.frames.len(), scroll, line_height) {
        let frame = &data.frames[row];
        let selected = row == data.selected;

        let (marker, color) = if selected {
            ("> ", DEFAULT_THEME.function)
        } else if data.hovered == Some(row) {
            ("  ", DEFAULT_THEME.hovered)
        } else {
            ("  ", DEFAULT_THEME.fg)
        };

        let x = canvas.print(marker, rect.x, rect.y, DEFAULT_THEME.secondary);
        let x = canvas.print(&frame.function, x, rect.y, color);
        canvas.print(
            &format!(" {}", frame.location()),
            x,
            rect.y,
            DEFAULT_THEME.comment,
        );
    }
}
