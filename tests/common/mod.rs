// Shared fakes for the integration tests
#![allow(dead_code)]

use crashlens::errors::Fault;
use crashlens::host::{
    Binding, Button, Canvas, Color, FontMetrics, FontMode, FrameInfo, Host, Input, Introspect,
    LogSink, PointerState, Rect, SourceId, SourceReader,
};
use crashlens::model::value::{HostObject, Value};
use std::cell::Cell;
use std::collections::HashMap;
use std::io;
use std::rc::Rc;

pub const SCREEN: (i32, i32) = (128, 128);

pub const LARGE: FontMetrics = FontMetrics {
    glyph_width: 4,
    line_height: 6,
};

pub const SMALL: FontMetrics = FontMetrics {
    glyph_width: 3,
    line_height: 5,
};

/// Everything the explorer asked the host to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Log(String),
    Reset,
    Clear(Color),
    Clip(Option<Rect>),
    Print {
        text: String,
        x: i32,
        y: i32,
        color: Color,
    },
    SetFont(FontMode),
}

/// A recording host with in-memory files and scripted input
#[derive(Default)]
pub struct FakeHost {
    pub events: Vec<HostEvent>,
    pub files: HashMap<String, String>,
    pub reads: usize,
    pub pointer: PointerState,
    pub pressed: Vec<Button>,
    pub panic_on_print: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        FakeHost::default()
    }

    pub fn with_file(mut self, path: &str, text: &str) -> Self {
        self.files.insert(path.to_string(), text.to_string());
        self
    }

    pub fn press(&mut self, button: Button) {
        self.pressed.push(button);
    }

    pub fn point(&mut self, x: i32, y: i32, pressed: bool) {
        self.pointer.x = x;
        self.pointer.y = y;
        self.pointer.pressed = pressed;
    }

    pub fn wheel(&mut self, notches: i32) {
        self.pointer.wheel = notches;
    }

    /// Drop this tick's edges, keeping pointer position and button state
    pub fn end_tick(&mut self) {
        self.pressed.clear();
        self.pointer.wheel = 0;
    }

    pub fn logs(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Log(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn printed(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Print { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, event: &HostEvent) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }
}

impl Canvas for FakeHost {
    fn clear(&mut self, color: Color) {
        self.events.push(HostEvent::Clear(color));
    }

    fn clip(&mut self, rect: Option<Rect>) {
        self.events.push(HostEvent::Clip(rect));
    }

    fn print(&mut self, text: &str, x: i32, y: i32, color: Color) -> i32 {
        if self.panic_on_print {
            panic!("print failed");
        }
        self.events.push(HostEvent::Print {
            text: text.to_string(),
            x,
            y,
            color,
        });
        x + text.chars().count() as i32 * 4
    }

    fn screen_size(&self) -> (i32, i32) {
        SCREEN
    }

    fn metrics(&self, font: FontMode) -> FontMetrics {
        match font {
            FontMode::Large => LARGE,
            FontMode::Small => SMALL,
        }
    }

    fn set_font(&mut self, font: FontMode) {
        self.events.push(HostEvent::SetFont(font));
    }
}

impl Input for FakeHost {
    fn pointer(&self) -> PointerState {
        self.pointer
    }

    fn just_pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}

impl SourceReader for FakeHost {
    fn read_source(&mut self, path: &str) -> io::Result<String> {
        self.reads += 1;
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

impl LogSink for FakeHost {
    fn log(&mut self, text: &str) {
        self.events.push(HostEvent::Log(text.to_string()));
    }
}

impl Host for FakeHost {
    fn reset_presentation(&mut self) {
        self.events.push(HostEvent::Reset);
    }
}

/// One frame of a [`FakeContext`]
#[derive(Clone)]
pub struct FakeFrame {
    pub source: Option<SourceId>,
    pub line: Option<u32>,
    pub line_defined: u32,
    pub name: Option<String>,
    pub locals: Vec<Binding>,
    pub upvalues: Vec<Binding>,
}

impl FakeFrame {
    pub fn file(path: &str, line: u32) -> Self {
        FakeFrame {
            source: Some(SourceId::File(path.to_string())),
            line: Some(line),
            line_defined: 1,
            name: None,
            locals: Vec::new(),
            upvalues: Vec::new(),
        }
    }

    pub fn inline(chunk: &str, line: u32) -> Self {
        FakeFrame {
            source: Some(SourceId::Inline(chunk.to_string())),
            ..FakeFrame::file("", line)
        }
    }

    pub fn native() -> Self {
        FakeFrame {
            source: None,
            line: None,
            ..FakeFrame::file("", 0)
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn local(mut self, name: &str, value: Value) -> Self {
        self.locals.push(Binding::new(name, value));
        self
    }

    pub fn upvalue(mut self, name: &str, value: Value) -> Self {
        self.upvalues.push(Binding::new(name, value));
        self
    }
}

/// Scripted execution context, innermost frame first
#[derive(Clone, Default)]
pub struct FakeContext {
    pub frames: Vec<FakeFrame>,
    pub panic_on_frames: bool,
    pub panic_on_locals: Option<usize>,
}

impl FakeContext {
    pub fn new(frames: Vec<FakeFrame>) -> Self {
        FakeContext {
            frames,
            panic_on_frames: false,
            panic_on_locals: None,
        }
    }

    pub fn fault(self, message: &str) -> Fault {
        Fault::with_context(message, Box::new(self))
    }
}

impl Introspect for FakeContext {
    fn frame_info(&self, depth: usize) -> Option<FrameInfo> {
        if self.panic_on_frames {
            panic!("frame walk failed");
        }
        self.frames.get(depth).map(|frame| FrameInfo {
            source: frame.source.clone(),
            current_line: frame.line,
            line_defined: frame.line_defined,
            name: frame.name.clone(),
        })
    }

    fn locals(&self, depth: usize) -> Vec<Binding> {
        if self.panic_on_locals == Some(depth) {
            panic!("locals unavailable");
        }
        self.frames
            .get(depth)
            .map(|f| f.locals.clone())
            .unwrap_or_default()
    }

    fn upvalues(&self, depth: usize) -> Vec<Binding> {
        self.frames
            .get(depth)
            .map(|f| f.upvalues.clone())
            .unwrap_or_default()
    }

    fn traceback(&self, message: &str) -> String {
        format!("{}\nstack traceback:\n\t[fake]", message)
    }
}

/// A compound that counts how often it is enumerated
pub struct CountingTable {
    pub entries: Vec<(Value, Value)>,
    pub enumerations: Cell<usize>,
}

impl CountingTable {
    pub fn new(entries: Vec<(Value, Value)>) -> Rc<Self> {
        Rc::new(CountingTable {
            entries,
            enumerations: Cell::new(0),
        })
    }
}

impl HostObject for CountingTable {
    fn type_name(&self) -> &str {
        "table"
    }

    fn entries(&self) -> Result<Vec<(Value, Value)>, Fault> {
        self.enumerations.set(self.enumerations.get() + 1);
        Ok(self.entries.clone())
    }
}

/// A compound whose enumeration always fails
pub struct BrokenTable;

impl HostObject for BrokenTable {
    fn type_name(&self) -> &str {
        "table"
    }

    fn entries(&self) -> Result<Vec<(Value, Value)>, Fault> {
        Err(Fault::new("__pairs failed"))
    }
}

/// An object whose text conversion panics
pub struct ExplodingText;

impl HostObject for ExplodingText {
    fn type_name(&self) -> &str {
        "userdata"
    }

    fn to_text(&self) -> Result<Option<String>, Fault> {
        panic!("__tostring exploded")
    }
}
