//! Terminal host over a ratatui buffer
//!
//! One host pixel is one terminal cell and both font modes use 1x1 glyphs.
//! Palette indices map to a 16-color RGB palette that user code may swap
//! entries of; [`Host::reset_presentation`] restores it.
//!
//! crossterm events are folded into per-tick input state with
//! [`TerminalHost::handle_event`] and cleared with
//! [`TerminalHost::begin_tick`].

use crate::host::{
    Button, Canvas, Color, FontMetrics, FontMode, Host, Input, LogSink, PointerState, Rect,
    SourceReader,
};
use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Color as Rgb, Style};
use ratatui::widgets::Widget;
use rustc_hash::FxHashSet;
use std::fs;
use std::io;
use tracing::info;

/// Number of palette entries
pub const PALETTE_SIZE: usize = 16;

/// The default 16-color palette as RGB triples
pub const DEFAULT_PALETTE: [(u8, u8, u8); PALETTE_SIZE] = [
    (0x00, 0x00, 0x00), // Black
    (0x1d, 0x2b, 0x53), // Dark blue
    (0x7e, 0x25, 0x53), // Dark purple
    (0x00, 0x87, 0x51), // Dark green
    (0xab, 0x52, 0x36), // Brown
    (0x5f, 0x57, 0x4f), // Dark grey
    (0xc2, 0xc3, 0xc7), // Light grey
    (0xff, 0xf1, 0xe8), // White
    (0xff, 0x00, 0x4d), // Red
    (0xff, 0xa3, 0x00), // Orange
    (0xff, 0xec, 0x27), // Yellow
    (0x00, 0xe4, 0x36), // Green
    (0x29, 0xad, 0xff), // Blue
    (0x83, 0x76, 0x9c), // Lavender
    (0xff, 0x77, 0xa8), // Pink
    (0xff, 0xcc, 0xaa), // Peach
];

/// A [`Host`] that draws into a ratatui [`Buffer`]
pub struct TerminalHost {
    buffer: Buffer,
    palette: [(u8, u8, u8); PALETTE_SIZE],
    clip: Option<Rect>,
    font: FontMode,
    pointer: PointerState,
    button_down: bool,
    clicked: bool,
    pressed: FxHashSet<Button>,
    quit: bool,
    console: Vec<String>,
}

impl TerminalHost {
    pub fn new(width: u16, height: u16) -> Self {
        TerminalHost {
            buffer: Buffer::empty(CellRect::new(0, 0, width, height)),
            palette: DEFAULT_PALETTE,
            clip: None,
            font: FontMode::Large,
            pointer: PointerState::default(),
            button_down: false,
            clicked: false,
            pressed: FxHashSet::default(),
            quit: false,
            console: Vec::new(),
        }
    }

    /// Follow a terminal resize; the drawing surface is cleared
    pub fn resize(&mut self, width: u16, height: u16) {
        let area = CellRect::new(0, 0, width, height);
        if self.buffer.area != area {
            self.buffer = Buffer::empty(area);
        }
    }

    /// Clear per-tick input edges; call once before polling the tick's events
    pub fn begin_tick(&mut self) {
        self.pressed.clear();
        self.pointer.wheel = 0;
        self.clicked = false;
    }

    /// Fold one crossterm event into this tick's input state
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.quit = true,
                KeyCode::Up => {
                    self.pressed.insert(Button::Up);
                }
                KeyCode::Down => {
                    self.pressed.insert(Button::Down);
                }
                KeyCode::Char('f') | KeyCode::Char('F') => {
                    self.pressed.insert(Button::ToggleFont);
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                self.pointer.x = mouse.column as i32;
                self.pointer.y = mouse.row as i32;
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.button_down = true;
                        self.clicked = true;
                    }
                    MouseEventKind::Up(MouseButton::Left) => self.button_down = false,
                    MouseEventKind::ScrollUp => self.pointer.wheel += 1,
                    MouseEventKind::ScrollDown => self.pointer.wheel -= 1,
                    _ => {}
                }
            }
            Event::Resize(width, height) => self.resize(*width, *height),
            _ => {}
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Replace one palette entry
    pub fn set_palette(&mut self, index: Color, rgb: (u8, u8, u8)) {
        if let Some(entry) = self.palette.get_mut(index as usize) {
            *entry = rgb;
        }
    }

    /// Everything written to the host console so far
    pub fn console(&self) -> &[String] {
        &self.console
    }

    fn rgb(&self, color: Color) -> Rgb {
        let (r, g, b) = self.palette[color as usize % PALETTE_SIZE];
        Rgb::Rgb(r, g, b)
    }

    fn screen(&self) -> Rect {
        let area = self.buffer.area;
        Rect::new(0, 0, area.width as i32, area.height as i32)
    }

    fn drawable(&self) -> Rect {
        match self.clip {
            Some(clip) => clip.intersection(&self.screen()),
            None => self.screen(),
        }
    }
}

impl Canvas for TerminalHost {
    fn clear(&mut self, color: Color) {
        let rgb = self.rgb(color);
        self.buffer.reset();
        let area = self.buffer.area;
        self.buffer.set_style(area, Style::default().bg(rgb).fg(rgb));
    }

    fn clip(&mut self, rect: Option<Rect>) {
        self.clip = rect;
    }

    fn print(&mut self, text: &str, x: i32, y: i32, color: Color) -> i32 {
        let style = Style::default().fg(self.rgb(color));
        let drawable = self.drawable();
        let mut cursor = x;
        let mut glyph = [0u8; 4];

        for ch in text.chars() {
            if drawable.contains(cursor, y) {
                let symbol = ch.encode_utf8(&mut glyph);
                self.buffer.set_string(cursor as u16, y as u16, &*symbol, style);
            }
            cursor += 1;
        }
        cursor
    }

    fn screen_size(&self) -> (i32, i32) {
        let area = self.buffer.area;
        (area.width as i32, area.height as i32)
    }

    fn metrics(&self, _font: FontMode) -> FontMetrics {
        FontMetrics {
            glyph_width: 1,
            line_height: 1,
        }
    }

    fn set_font(&mut self, font: FontMode) {
        self.font = font;
    }
}

impl Input for TerminalHost {
    fn pointer(&self) -> PointerState {
        PointerState {
            pressed: self.button_down || self.clicked,
            ..self.pointer
        }
    }

    fn just_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}

impl SourceReader for TerminalHost {
    fn read_source(&mut self, path: &str) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

impl LogSink for TerminalHost {
    fn log(&mut self, text: &str) {
        info!(target: "console", "{}", text);
        self.console.extend(text.lines().map(str::to_string));
    }
}

impl Host for TerminalHost {
    fn reset_presentation(&mut self) {
        self.palette = DEFAULT_PALETTE;
        self.clip = None;
        self.font = FontMode::Large;
    }
}

impl Widget for &TerminalHost {
    fn render(self, area: CellRect, buf: &mut Buffer) {
        let width = area.width.min(self.buffer.area.width);
        let height = area.height.min(self.buffer.area.height);
        for y in 0..height {
            for x in 0..width {
                if let (Some(from), Some(to)) = (
                    self.buffer.cell((x, y)),
                    buf.cell_mut((area.x + x, area.y + y)),
                ) {
                    *to = from.clone();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers, MouseEvent};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_print_respects_clip() {
        let mut host = TerminalHost::new(10, 2);
        host.clip(Some(Rect::new(2, 0, 3, 1)));
        let end = host.print("abcdef", 0, 0, 7);
        assert_eq!(end, 6);

        let row: String = (0..10u16)
            .filter_map(|x| host.buffer.cell((x, 0)))
            .map(|cell| cell.symbol())
            .collect();
        assert_eq!(row, "  cde     ");
    }

    #[test]
    fn test_input_folding() {
        let mut host = TerminalHost::new(20, 10);
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        host.handle_event(&Event::Key(down));
        host.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 4, 5));
        host.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 4, 5));
        host.handle_event(&mouse(MouseEventKind::ScrollUp, 4, 5));

        assert!(host.just_pressed(Button::Down));
        assert!(!host.just_pressed(Button::Up));
        let pointer = host.pointer();
        assert_eq!((pointer.x, pointer.y, pointer.wheel), (4, 5, 1));
        assert!(pointer.pressed);

        host.begin_tick();
        assert!(!host.just_pressed(Button::Down));
        assert!(!host.pointer().pressed);
        assert_eq!(host.pointer().wheel, 0);
    }

    #[test]
    fn test_reset_presentation_restores_palette() {
        let mut host = TerminalHost::new(4, 4);
        host.set_palette(8, (1, 2, 3));
        host.clip(Some(Rect::new(0, 0, 1, 1)));
        host.reset_presentation();
        assert_eq!(host.palette, DEFAULT_PALETTE);
        assert_eq!(host.clip, None);
    }
}
