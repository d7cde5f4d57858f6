//! Source pane rendering
//!
//! Shows a window of lines around the selected frame's current line, which is
//! kept on the middle row of the panel, marked and colored.

use super::utils::{begin_panel, render_empty};
use crate::host::Canvas;
use crate::model::source::SourceView;
use crate::ui::layout::Panel;
use crate::ui::theme::DEFAULT_THEME;

/// Render the source pane with `half` lines of context on each side
pub fn render_source_pane<C: Canvas + ?Sized>(
    canvas: &mut C,
    panel: &Panel,
    view: &SourceView,
    half: usize,
    line_height: i32,
) {
    let title = match view.path() {
        Some(path) => format!("source {}", path),
        None => "source".to_string(),
    };
    begin_panel(canvas, panel, &title);

    if let Some(error) = view.error() {
        canvas.print(error, panel.content.x, panel.content.y, DEFAULT_THEME.error);
        return;
    }

    let (Some(window), Some(current)) = (view.window(half), view.current_line()) else {
        render_empty(canvas, panel, "(source unavailable)");
        return;
    };

    // A line past the end of the file centres on the last line, unmarked
    let center = (current as usize).min(view.lines().len()) as i32;
    let middle = panel.visible_rows(line_height) as i32 / 2;
    let width = window.end().to_string().len();

    for number in window {
        let Some(text) = view.line(number) else {
            continue;
        };
        let y = panel.content.y + (middle + number as i32 - center) * line_height;
        let is_current = number as u32 == current;

        let (gutter, number_color, text_color) = if is_current {
            (">", DEFAULT_THEME.current_line, DEFAULT_THEME.hovered)
        } else {
            (" ", DEFAULT_THEME.comment, DEFAULT_THEME.fg)
        };
        let label = format!("{}{:>width$} ", gutter, number, width = width);
        let x = canvas.print(&label, panel.content.x, y, number_color);
        canvas.print(text, x, y, text_color);
    }
}
