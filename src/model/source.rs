//! Source context for the selected frame
//!
//! File sources are fetched once per path through the host's
//! [`SourceReader`] and cached for the rest of the session. Inline sources use
//! the chunk text directly.

use super::stack::StackFrame;
use crate::host::{SourceId, SourceReader};
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::rc::Rc;
use tracing::warn;

/// Split text into lines, keeping an unterminated final line
///
/// A trailing newline ends the last line rather than starting an empty one,
/// and a `\r` before `\n` is dropped.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n')
        .map(|line| {
            let line = line.strip_suffix('\n').unwrap_or(line);
            line.strip_suffix('\r').unwrap_or(line).to_string()
        })
        .collect()
}

/// Per-session cache of file contents, keyed by path
#[derive(Debug, Default)]
pub struct SourceCache {
    files: FxHashMap<String, Rc<[String]>>,
}

impl SourceCache {
    pub fn new() -> Self {
        SourceCache::default()
    }

    /// Lines of `path`, reading through `reader` on first use
    pub fn load<R: SourceReader + ?Sized>(
        &mut self,
        path: &str,
        reader: &mut R,
    ) -> Result<Rc<[String]>, String> {
        if let Some(lines) = self.files.get(path) {
            return Ok(lines.clone());
        }

        match reader.read_source(path) {
            Ok(text) => {
                let lines: Rc<[String]> = split_lines(&text).into();
                self.files.insert(path.to_string(), lines.clone());
                Ok(lines)
            }
            Err(e) => {
                warn!(path, error = %e, "source read failed");
                Err(format!("cannot read {}: {}", path, e))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Lines around the selected frame's current line
#[derive(Debug, Clone)]
pub struct SourceView {
    /// File path, `None` for inline chunks
    path: Option<String>,
    lines: Rc<[String]>,
    current_line: Option<u32>,
    error: Option<String>,
}

impl SourceView {
    pub fn empty() -> Self {
        SourceView {
            path: None,
            lines: Rc::from(Vec::<String>::new()),
            current_line: None,
            error: None,
        }
    }

    pub fn for_frame<R: SourceReader + ?Sized>(
        frame: &StackFrame,
        cache: &mut SourceCache,
        reader: &mut R,
    ) -> Self {
        let (lines, error) = match &frame.source {
            SourceId::File(path) => match cache.load(path, reader) {
                Ok(lines) => (lines, None),
                Err(message) => (Rc::from(Vec::<String>::new()), Some(message)),
            },
            SourceId::Inline(chunk) => (split_lines(chunk).into(), None),
        };

        SourceView {
            path: frame.source.path().map(str::to_string),
            lines,
            current_line: frame.line,
            error,
        }
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 1-indexed line lookup
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    pub fn current_line(&self) -> Option<u32> {
        self.current_line
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 1-indexed line numbers within `half` lines of the current line
    pub fn window(&self, half: usize) -> Option<RangeInclusive<usize>> {
        let total = self.lines.len();
        let current = self.current_line? as usize;
        if total == 0 || current == 0 {
            return None;
        }

        let center = current.min(total);
        let start = center.saturating_sub(half).max(1);
        let end = (center + half).min(total);
        Some(start..=end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\n\nc"), vec!["a", "", "c"]);
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("\n"), vec![""]);
    }

    #[test]
    fn test_window_clamps() {
        let view = SourceView {
            path: None,
            lines: (1..=10).map(|n| n.to_string()).collect::<Vec<_>>().into(),
            current_line: Some(2),
            error: None,
        };
        assert_eq!(view.window(3), Some(1..=5));

        let view = SourceView {
            current_line: Some(9),
            ..view
        };
        assert_eq!(view.window(3), Some(6..=10));
        assert_eq!(view.line(10), Some("10"));
        assert_eq!(view.line(0), None);
    }

    #[test]
    fn test_window_without_line() {
        let view = SourceView {
            path: None,
            lines: vec!["x".to_string()].into(),
            current_line: None,
            error: None,
        };
        assert_eq!(view.window(4), None);
    }
}
