//! Status line with key hints and the frame position

use crate::host::{Canvas, FontMode, Rect};
use crate::ui::theme::DEFAULT_THEME;

/// Data needed to render the status line
pub struct StatusRenderData {
    pub selected: usize,
    pub frame_count: usize,
    pub font: FontMode,
}

/// Render the status line at the bottom
pub fn render_status_bar<C: Canvas + ?Sized>(canvas: &mut C, area: Rect, data: StatusRenderData) {
    canvas.clip(Some(area));

    let position = if data.frame_count == 0 {
        "frame -/0".to_string()
    } else {
        format!("frame {}/{}", data.selected + 1, data.frame_count)
    };
    let font = match data.font {
        FontMode::Large => "large",
        FontMode::Small => "small",
    };

    let x = canvas.print(&position, area.x, area.y, DEFAULT_THEME.primary);
    canvas.print(
        &format!("  up/dn frame  click expand  f font ({})", font),
        x,
        area.y,
        DEFAULT_THEME.comment,
    );
}
