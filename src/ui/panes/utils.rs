//! Shared helpers for pane rendering
//!
//! All functions in this module are `pub(super)`, making them accessible only
//! within the panes module.

use crate::host::{Canvas, Color};
use crate::model::value::{Category, Value};
use crate::ui::layout::Panel;
use crate::ui::theme::DEFAULT_THEME;

/// Color a value is drawn in, by category
pub(super) fn value_color(value: &Value) -> Color {
    match value.category() {
        Category::Nil => DEFAULT_THEME.comment,
        Category::Bool | Category::Number => DEFAULT_THEME.number,
        Category::Text => DEFAULT_THEME.string,
        Category::Function => DEFAULT_THEME.function,
        Category::Compound | Category::Other => DEFAULT_THEME.primary,
    }
}

/// Draw a panel title and restrict drawing to its content area
pub(super) fn begin_panel<C: Canvas + ?Sized>(canvas: &mut C, panel: &Panel, title: &str) {
    canvas.clip(Some(panel.frame));
    canvas.print(title, panel.content.x, panel.frame.y, DEFAULT_THEME.primary);
    canvas.clip(Some(panel.content));
}

/// Single dimmed line shown in an empty panel
pub(super) fn render_empty<C: Canvas + ?Sized>(canvas: &mut C, panel: &Panel, text: &str) {
    canvas.print(
        text,
        panel.content.x,
        panel.content.y,
        DEFAULT_THEME.comment,
    );
}
