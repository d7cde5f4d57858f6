// Configuration for the crash explorer

use crate::errors::ConfigError;
use crate::host::FontMode;

/// Maximum number of frames captured from the failing context
pub const DEFAULT_MAX_FRAMES: usize = 20;

/// Fraction of the remaining distance the smoothed scroll offset covers per tick
pub const DEFAULT_SCROLL_SMOOTHING: f32 = 0.35;

/// Rows scrolled per wheel notch
pub const DEFAULT_WHEEL_STEP: usize = 1;

/// Source lines shown above and below the current line with the large font
pub const DEFAULT_SOURCE_CONTEXT_LARGE: usize = 4;

/// Source lines shown above and below the current line with the small font
pub const DEFAULT_SOURCE_CONTEXT_SMALL: usize = 8;

/// Tunables for an explorer session
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub max_frames: usize,
    pub scroll_smoothing: f32,
    pub wheel_step: usize,
    pub source_context_large: usize,
    pub source_context_small: usize,
    pub initial_font: FontMode,
}

impl ExplorerConfig {
    /// Check the values a session relies on
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_frames == 0 {
            return Err(ConfigError::ZeroMaxFrames);
        }
        if self.wheel_step == 0 {
            return Err(ConfigError::ZeroWheelStep);
        }
        if !(self.scroll_smoothing > 0.0 && self.scroll_smoothing < 1.0) {
            return Err(ConfigError::SmoothingOutOfRange {
                value: self.scroll_smoothing,
            });
        }
        Ok(self)
    }

    /// Half-window of source context for the given font
    pub fn source_context(&self, font: FontMode) -> usize {
        match font {
            FontMode::Large => self.source_context_large,
            FontMode::Small => self.source_context_small,
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            max_frames: DEFAULT_MAX_FRAMES,
            scroll_smoothing: DEFAULT_SCROLL_SMOOTHING,
            wheel_step: DEFAULT_WHEEL_STEP,
            source_context_large: DEFAULT_SOURCE_CONTEXT_LARGE,
            source_context_small: DEFAULT_SOURCE_CONTEXT_SMALL,
            initial_font: FontMode::Large,
        }
    }
}
