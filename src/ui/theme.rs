use crate::host::Color;

/// Palette indices used by the explorer panes
///
/// Indices follow the common 16-color fantasy-console palette; the host maps
/// them to whatever colors it actually draws with.
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Lavender
    pub error: Color,     // Red
    pub string: Color,
    pub number: Color,
    pub function: Color,
    pub upvalue: Color,
    pub hovered: Color,
    pub current_line: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    bg: 1,            // Dark blue
    fg: 6,            // Light grey
    primary: 12,      // Blue
    secondary: 9,     // Orange
    comment: 13,      // Lavender
    error: 8,         // Red
    string: 15,       // Peach
    number: 9,        // Orange
    function: 10,     // Yellow for the selected frame
    upvalue: 14,      // Pink for captured variables
    hovered: 7,       // White under the pointer
    current_line: 11, // Green for the executing line
};
