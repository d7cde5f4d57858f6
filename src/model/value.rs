//! Runtime value representation
//!
//! This module defines the [`Value`] enum, a tagged view of the host runtime's
//! dynamically typed values. It decouples the variable tree from whatever value
//! system the host actually uses.
//!
//! # Value Types
//!
//! - [`Value::Nil`], [`Value::Bool`], [`Value::Number`]: plain scalars
//! - [`Value::Text`]: byte string, displayed quoted and escaped
//! - [`Value::Function`], [`Value::Compound`], [`Value::Other`]: opaque host
//!   objects behind [`HostObject`]
//!
//! # Safe Display
//!
//! [`Value::display_text`] never fails. Host conversions run behind a panic
//! boundary and any failure is replaced by a visible placeholder.

use crate::errors::Fault;
use crate::shim::catch_panic;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// An opaque object owned by the host runtime
pub trait HostObject {
    /// Runtime type name, e.g. `table` or `userdata`
    fn type_name(&self) -> &str;

    /// Custom text conversion; `Ok(None)` selects the default `type: 0x...` form
    fn to_text(&self) -> Result<Option<String>, Fault> {
        Ok(None)
    }

    /// Key/value entries of a compound object, in any order
    fn entries(&self) -> Result<Vec<(Value, Value)>, Fault> {
        Ok(Vec::new())
    }
}

/// Runtime values seen by the explorer
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(f64),
    Text(Rc<[u8]>),
    Function(Rc<dyn HostObject>),
    Compound(Rc<dyn HostObject>),
    Other(Rc<dyn HostObject>),
}

/// Type category used as the primary sort key for compound entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Nil,
    Bool,
    Number,
    Text,
    Function,
    Compound,
    Other,
}

impl Value {
    pub fn text(s: impl AsRef<[u8]>) -> Self {
        Value::Text(Rc::from(s.as_ref()))
    }

    pub fn compound(obj: Rc<dyn HostObject>) -> Self {
        Value::Compound(obj)
    }

    pub fn category(&self) -> Category {
        match self {
            Value::Nil => Category::Nil,
            Value::Bool(_) => Category::Bool,
            Value::Number(_) => Category::Number,
            Value::Text(_) => Category::Text,
            Value::Function(_) => Category::Function,
            Value::Compound(_) => Category::Compound,
            Value::Other(_) => Category::Other,
        }
    }

    /// Only compound values have children
    pub fn is_expandable(&self) -> bool {
        matches!(self, Value::Compound(_))
    }

    /// Address of the underlying host object, if any
    pub fn identity(&self) -> Option<usize> {
        self.object().map(object_identity)
    }

    pub fn object(&self) -> Option<&Rc<dyn HostObject>> {
        match self {
            Value::Function(obj) | Value::Compound(obj) | Value::Other(obj) => Some(obj),
            _ => None,
        }
    }

    /// Raw equality: scalars by value, objects by identity
    pub fn raw_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b && self.category() == other.category(),
                _ => false,
            },
        }
    }

    /// Text shown for this value in the variable tree
    pub fn display_text(&self) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(bytes) => escape_text(bytes),
            Value::Function(obj) | Value::Compound(obj) | Value::Other(obj) => object_text(obj),
        }
    }

    /// Label used when this value is a key in a compound
    ///
    /// Identifier-like text keys are shown bare; any other text key is quoted
    /// and escaped so it cannot pass for a non-text key.
    pub fn key_label(&self) -> String {
        match self {
            Value::Text(bytes) if is_identifier(bytes) => {
                String::from_utf8_lossy(bytes).into_owned()
            }
            Value::Text(bytes) => escape_text(bytes),
            other => format!("[{}]", other.display_text()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Number(n) => write!(f, "Number({})", n),
            Value::Text(bytes) => write!(f, "Text({})", escape_text(bytes)),
            Value::Function(obj) => write!(f, "Function(0x{:08x})", object_identity(obj)),
            Value::Compound(obj) => write!(f, "Compound(0x{:08x})", object_identity(obj)),
            Value::Other(obj) => write!(f, "Other(0x{:08x})", object_identity(obj)),
        }
    }
}

fn object_identity(obj: &Rc<dyn HostObject>) -> usize {
    Rc::as_ptr(obj) as *const () as usize
}

fn object_text(obj: &Rc<dyn HostObject>) -> String {
    let identity = object_identity(obj);
    let converted = catch_panic(|| match obj.to_text() {
        Ok(Some(text)) => Ok(text),
        Ok(None) => Ok(format!("{}: 0x{:08x}", obj.type_name(), identity)),
        Err(fault) => Err(fault.message().to_string()),
    });

    match converted {
        Ok(Ok(text)) => text,
        Ok(Err(message)) | Err(message) => conversion_placeholder(&message),
    }
}

/// Inline replacement for a value whose conversion failed
pub fn conversion_placeholder(message: &str) -> String {
    format!("<tostring failed: {}>", message)
}

/// Format a number the way scripts print it: integral values without a fraction
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn is_identifier(bytes: &[u8]) -> bool {
    match bytes.split_first() {
        Some((first, rest)) => {
            (first.is_ascii_alphabetic() || *first == b'_')
                && rest.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
        }
        None => false,
    }
}

/// Quote a byte string with control characters, quotes and invalid UTF-8 escaped
pub fn escape_text(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');

    let mut rest = bytes;
    while !rest.is_empty() {
        let (valid, invalid) = match std::str::from_utf8(rest) {
            Ok(s) => (s, &b""[..]),
            Err(e) => {
                let (head, tail) = rest.split_at(e.valid_up_to());
                let head = std::str::from_utf8(head).unwrap_or_default();
                let bad = e.error_len().unwrap_or(tail.len());
                (head, &tail[..bad])
            }
        };

        for c in valid.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() && (c as u32) < 0x100 => {
                    out.push_str(&format!("\\x{:02x}", c as u32))
                }
                c => out.push(c),
            }
        }
        for byte in invalid {
            out.push_str(&format!("\\x{:02x}", byte));
        }

        rest = &rest[valid.len() + invalid.len()..];
    }

    out.push('"');
    out
}

/// Precomputed ordering key for a compound entry key
///
/// Display strings are captured once, so sorting never calls back into the
/// host and the order stays consistent even if a conversion is not.
#[derive(Debug, Clone)]
pub struct SortKey {
    category: Category,
    order: KeyOrder,
}

#[derive(Debug, Clone)]
enum KeyOrder {
    Number(f64),
    Text(Rc<[u8]>),
    Display(String),
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| match (&self.order, &other.order) {
                (KeyOrder::Number(a), KeyOrder::Number(b)) => a.total_cmp(b),
                (KeyOrder::Text(a), KeyOrder::Text(b)) => a.cmp(b),
                (KeyOrder::Display(a), KeyOrder::Display(b)) => a.cmp(b),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

impl Value {
    /// Category first; numbers and text by natural order, the rest by display string
    pub fn sort_key(&self) -> SortKey {
        let order = match self {
            Value::Number(n) => KeyOrder::Number(*n),
            Value::Text(bytes) => KeyOrder::Text(bytes.clone()),
            other => KeyOrder::Display(other.display_text()),
        };
        SortKey {
            category: self.category(),
            order,
        }
    }
}

/// Total order over compound keys
pub fn compare_keys(a: &Value, b: &Value) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

/// A plain key/value compound for hosts without their own table type
#[derive(Default)]
pub struct Table {
    entries: RefCell<Vec<(Value, Value)>>,
}

impl Table {
    pub fn new() -> Rc<Self> {
        Rc::new(Table::default())
    }

    /// Insert or replace the entry for `key`
    pub fn set(&self, key: Value, value: Value) {
        let mut entries = self.entries.borrow_mut();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k.raw_eq(&key)) {
            slot.1 = value;
        } else {
            entries.push((key, value));
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl HostObject for Table {
    fn type_name(&self) -> &str {
        "table"
    }

    fn entries(&self) -> Result<Vec<(Value, Value)>, Fault> {
        Ok(self.entries.borrow().clone())
    }
}

/// A host object with nothing to show beyond its type and identity
pub struct Opaque {
    type_name: &'static str,
}

impl Opaque {
    pub fn new(type_name: &'static str) -> Rc<Self> {
        Rc::new(Opaque { type_name })
    }
}

impl HostObject for Opaque {
    fn type_name(&self) -> &str {
        self.type_name
    }
}
