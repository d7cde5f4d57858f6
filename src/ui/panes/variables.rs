//! Variable pane rendering
//!
//! Rows come from [`VariableTree::rows`], indented by tree depth. Expandable
//! rows carry a `+`/`-` marker; a row whose expansion was refused because it
//! refers back to an ancestor is tagged `(cycle)`.

use super::utils::{begin_panel, render_empty, value_color};
use crate::host::Canvas;
use crate::model::variables::{VarKind, VariableTree};
use crate::ui::layout::Panel;
use crate::ui::navigation::{visible_rows, ScrollState};
use crate::ui::theme::DEFAULT_THEME;

/// Data needed to render the variable pane
pub struct VariablesRenderData<'a> {
    pub tree: &'a VariableTree,
    pub hovered: Option<&'a [usize]>,
    pub glyph_width: i32,
}

/// Render the variable pane
pub fn render_variables_pane<C: Canvas + ?Sized>(
    canvas: &mut C,
    panel: &Panel,
    data: VariablesRenderData,
    scroll: &ScrollState,
    line_height: i32,
) {
    begin_panel(canvas, panel, "variables");

    let rows = data.tree.rows();
    if rows.is_empty() {
        render_empty(canvas, panel, "(no variables)");
        return;
    }

    for (index, rect) in visible_rows(panel.content, rows.len(), scroll, line_height) {
        let row = &rows[index];
        let variable = row.variable;
        let hovered = data.hovered == Some(row.path.as_slice());

        let indent = row.depth as i32 * 2 * data.glyph_width;
        let marker = if variable.is_expanded() {
            "- "
        } else if variable.is_expandable() {
            "+ "
        } else {
            "  "
        };
        let x = canvas.print(marker, rect.x + indent, rect.y, DEFAULT_THEME.secondary);

        if variable.kind == VarKind::Placeholder {
            canvas.print(&variable.name, x, rect.y, DEFAULT_THEME.error);
            continue;
        }

        let name_color = if hovered {
            DEFAULT_THEME.hovered
        } else {
            match variable.kind {
                VarKind::Upvalue => DEFAULT_THEME.upvalue,
                _ => DEFAULT_THEME.fg,
            }
        };
        let x = canvas.print(&variable.name, x, rect.y, name_color);
        let x = canvas.print(" = ", x, rect.y, DEFAULT_THEME.comment);
        let x = canvas.print(
            &variable.value_text(),
            x,
            rect.y,
            value_color(&variable.value),
        );
        if variable.is_cyclic() {
            canvas.print(" (cycle)", x, rect.y, DEFAULT_THEME.comment);
        }
    }
}
