//! Call stack captured from a failed context
//!
//! This module provides the frame sequence the stack panel shows:
//! - [`StackFrame`]: one resolved frame (file, line, function label)
//! - [`build_stack`]: walks an [`Introspect`] context innermost-first
//!
//! # Frame Walk
//!
//! The walk starts at depth 0 and stops at the frame cap or at the first frame
//! without a resolvable source, whichever comes first. The resulting sequence
//! does not change until the session ends.

use crate::host::{FrameInfo, Introspect, SourceId};

/// A resolved call frame
#[derive(Debug, Clone, PartialEq)]
pub struct StackFrame {
    /// 0 = innermost
    pub depth: usize,
    /// Final path segment, or a short label for inline sources
    pub file_name: String,
    pub source: SourceId,
    pub line: Option<u32>,
    /// Declared name, or `<file>:<line-defined>`
    pub function: String,
}

impl StackFrame {
    /// Resolve a frame from host metadata, `None` when it has no source
    pub fn resolve(depth: usize, info: FrameInfo) -> Option<Self> {
        let source = info.source?;
        let file_name = display_file_name(&source);
        let function = match info.name {
            Some(name) if !name.is_empty() => name,
            _ => format!("{}:{}", file_name, info.line_defined),
        };

        Some(StackFrame {
            depth,
            file_name,
            source,
            line: info.current_line,
            function,
        })
    }

    /// Whether this frame is executing `line` of `path`
    pub fn is_at(&self, path: &str, line: u32) -> bool {
        self.line == Some(line) && (self.source.path() == Some(path) || self.file_name == path)
    }

    /// `file:line`, or just the file for native frames
    pub fn location(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}", self.file_name, line),
            None => self.file_name.clone(),
        }
    }
}

/// Walk the frames of `context`, innermost first, at most `max_frames`
pub fn build_stack(context: &dyn Introspect, max_frames: usize) -> Vec<StackFrame> {
    let mut frames = Vec::new();

    for depth in 0..max_frames {
        let Some(info) = context.frame_info(depth) else {
            break;
        };
        let Some(frame) = StackFrame::resolve(depth, info) else {
            break;
        };
        frames.push(frame);
    }

    frames
}

/// Short name shown for a source: last path segment or `[string "..."]`
pub fn display_file_name(source: &SourceId) -> String {
    match source {
        SourceId::File(path) => path
            .rsplit(&['/', '\\'][..])
            .next()
            .unwrap_or(path)
            .to_string(),
        SourceId::Inline(chunk) => {
            let first_line = chunk.lines().next().unwrap_or("");
            let mut label: String = first_line.chars().take(16).collect();
            if label.len() < first_line.len() || chunk.lines().nth(1).is_some() {
                label.push_str("...");
            }
            format!("[string \"{}\"]", label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_file_name() {
        assert_eq!(
            display_file_name(&SourceId::File("game/src/main.lua".into())),
            "main.lua"
        );
        assert_eq!(
            display_file_name(&SourceId::File("C:\\carts\\boot.lua".into())),
            "boot.lua"
        );
        assert_eq!(
            display_file_name(&SourceId::Inline("return 1".into())),
            "[string \"return 1\"]"
        );
        assert_eq!(
            display_file_name(&SourceId::Inline("x = 1\ny = 2".into())),
            "[string \"x = 1...\"]"
        );
    }

    #[test]
    fn test_synthesized_label() {
        let info = FrameInfo {
            source: Some(SourceId::File("lib/util.lua".into())),
            current_line: Some(12),
            line_defined: 9,
            name: None,
        };
        let frame = StackFrame::resolve(3, info).unwrap();
        assert_eq!(frame.function, "util.lua:9");
        assert_eq!(frame.location(), "util.lua:12");
        assert!(frame.is_at("lib/util.lua", 12));
        assert!(frame.is_at("util.lua", 12));
        assert!(!frame.is_at("lib/util.lua", 13));
    }

    #[test]
    fn test_frame_without_source() {
        let info = FrameInfo {
            source: None,
            current_line: None,
            line_defined: 0,
            name: Some("pcall".into()),
        };
        assert!(StackFrame::resolve(0, info).is_none());
    }
}
