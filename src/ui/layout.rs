//! Screen layout for the explorer
//!
//! ```text
//! +--------------------------------------+
//! | header: failure location + message   |
//! +--------------+-----------------------+
//! | stack        | variables             |
//! +--------------+-----------------------+
//! | source                               |
//! +--------------------------------------+
//! | status                               |
//! +--------------------------------------+
//! ```
//!
//! Everything is derived from the screen size and the active font metrics, so
//! a font toggle simply produces a new [`Layout`].

use crate::host::{FontMetrics, Rect};

/// A titled panel: one title row above a content area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panel {
    pub frame: Rect,
    pub content: Rect,
}

impl Panel {
    fn new(frame: Rect, metrics: FontMetrics) -> Self {
        let title = metrics.line_height.min(frame.height);
        let pad = (metrics.glyph_width / 2).max(1).min(frame.width);
        let content = Rect::new(
            frame.x + pad,
            frame.y + title,
            frame.width - pad,
            frame.height - title,
        );
        Panel { frame, content }
    }

    /// Whole rows that fit in the content area
    pub fn visible_rows(&self, line_height: i32) -> usize {
        if line_height <= 0 || self.content.height <= 0 {
            return 0;
        }
        (self.content.height / line_height) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub metrics: FontMetrics,
    pub header: Rect,
    pub stack: Panel,
    pub variables: Panel,
    pub source: Panel,
    pub status: Rect,
}

impl Layout {
    pub fn compute(screen: (i32, i32), metrics: FontMetrics) -> Self {
        let (width, height) = (screen.0.max(0), screen.1.max(0));
        let line = metrics.line_height.max(1);
        let metrics = FontMetrics {
            glyph_width: metrics.glyph_width.max(1),
            line_height: line,
        };

        let header_height = (2 * line).min(height);
        let status_height = line.min(height - header_height);
        let body_top = header_height;
        let body_height = height - header_height - status_height;

        let upper_height = body_height / 2;
        let stack_width = width * 2 / 5;

        let stack = Rect::new(0, body_top, stack_width, upper_height);
        let variables = Rect::new(stack_width, body_top, width - stack_width, upper_height);
        let source = Rect::new(
            0,
            body_top + upper_height,
            width,
            body_height - upper_height,
        );

        Layout {
            metrics,
            header: Rect::new(0, 0, width, header_height),
            stack: Panel::new(stack, metrics),
            variables: Panel::new(variables, metrics),
            source: Panel::new(source, metrics),
            status: Rect::new(0, height - status_height, width, status_height),
        }
    }

    pub fn line_height(&self) -> i32 {
        self.metrics.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_partitions_screen() {
        let metrics = FontMetrics {
            glyph_width: 4,
            line_height: 6,
        };
        let layout = Layout::compute((128, 128), metrics);

        assert_eq!(layout.header, Rect::new(0, 0, 128, 12));
        assert_eq!(layout.status, Rect::new(0, 122, 128, 6));
        assert_eq!(layout.stack.frame.y, 12);
        assert_eq!(layout.stack.frame.height, 55);
        assert_eq!(layout.source.frame.bottom(), 122);
        assert_eq!(layout.stack.frame.right(), layout.variables.frame.x);
        assert_eq!(layout.stack.visible_rows(6), 8);
    }
}
