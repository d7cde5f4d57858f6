//! Header with the failure location and message

use crate::errors::FailureKind;
use crate::host::{Canvas, Rect};
use crate::snapshot::ErrorSnapshot;
use crate::ui::theme::DEFAULT_THEME;

/// Render the header
///
/// A message of the form `path:line: description` is shown as a location line
/// followed by the description; anything else is shown as a plain block.
pub fn render_header<C: Canvas + ?Sized>(
    canvas: &mut C,
    area: Rect,
    snapshot: &ErrorSnapshot,
    line_height: i32,
) {
    canvas.clip(Some(area));

    let title = match snapshot.kind() {
        FailureKind::Raised => "runtime error".to_string(),
        FailureKind::IllegalSuspension(entry) => format!("{} suspended", entry),
    };

    match snapshot.location() {
        Some(location) => {
            let x = canvas.print(&title, area.x, area.y, DEFAULT_THEME.error);
            let place = format!(" {}:{}", location.path, location.line);
            canvas.print(&place, x, area.y, DEFAULT_THEME.secondary);
            canvas.print(
                &location.description,
                area.x,
                area.y + line_height,
                DEFAULT_THEME.fg,
            );
        }
        None => {
            for (row, line) in snapshot.message().lines().take(2).enumerate() {
                let color = if row == 0 {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                };
                canvas.print(line, area.x, area.y + row as i32 * line_height, color);
            }
        }
    }
}
