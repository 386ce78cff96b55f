//! Value type tags and typed variable slots.
//!
//! A [`Slot`] is a shared handle to a caller-owned variable of one of the
//! supported scalar types. Subscriptions store slots instead of untyped
//! pointers, so the type tag can never disagree with the storage behind it.
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use xmlbind::access::value::{Slot, ValueType};
//!
//! let volume = Rc::new(Cell::new(0.5f32));
//! let slot = Slot::from(&volume);
//! assert_eq!(slot.value_type(), ValueType::Float);
//!
//! volume.set(0.75);
//! assert_eq!(slot.to_text(), "0.75");
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Element text or attribute value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    /// No value of its own, e.g. an element subscribed only for its attributes
    #[default]
    Undefined,
    Bool,
    /// Unsigned 8-bit value, 0 to 255
    Byte,
    Int,
    UInt,
    Float,
    Double,
    String,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Undefined => "undefined",
            ValueType::Bool => "bool",
            ValueType::Byte => "byte",
            ValueType::Int => "int",
            ValueType::UInt => "uint",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::String => "string",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bool" => Ok(ValueType::Bool),
            "byte" => Ok(ValueType::Byte),
            "int" => Ok(ValueType::Int),
            "uint" => Ok(ValueType::UInt),
            "float" => Ok(ValueType::Float),
            "double" => Ok(ValueType::Double),
            "string" => Ok(ValueType::String),
            other => Err(format!(
                "unknown value type '{}', expected one of bool, byte, int, uint, float, double, string",
                other
            )),
        }
    }
}

/// A scalar that can live in element text or an attribute value.
///
/// `parse` defines what text is accepted, `format` the canonical text
/// written back. `format` followed by `parse` reproduces the value.
pub trait XmlScalar: Sized {
    const TYPE: ValueType;

    fn parse(text: &str) -> Option<Self>;

    fn format(&self) -> String;
}

impl XmlScalar for bool {
    const TYPE: ValueType = ValueType::Bool;

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") || text == "1" {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") || text == "0" {
            Some(false)
        } else {
            None
        }
    }

    fn format(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }
}

impl XmlScalar for String {
    const TYPE: ValueType = ValueType::String;

    fn parse(text: &str) -> Option<Self> {
        Some(text.to_string())
    }

    fn format(&self) -> String {
        self.clone()
    }
}

macro_rules! numeric_scalar {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl XmlScalar for $ty {
                const TYPE: ValueType = ValueType::$tag;

                fn parse(text: &str) -> Option<Self> {
                    text.trim().parse().ok()
                }

                fn format(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

numeric_scalar! {
    u8 => Byte,
    i32 => Int,
    u32 => UInt,
    f32 => Float,
    f64 => Double,
}

/// A typed handle to a caller-owned variable.
///
/// Cloning a slot clones the handle, not the value: both refer to the same
/// variable.
#[derive(Debug, Clone)]
pub enum Slot {
    Bool(Rc<Cell<bool>>),
    Byte(Rc<Cell<u8>>),
    Int(Rc<Cell<i32>>),
    UInt(Rc<Cell<u32>>),
    Float(Rc<Cell<f32>>),
    Double(Rc<Cell<f64>>),
    String(Rc<RefCell<String>>),
}

impl Slot {
    /// Returns the type tag matching the slot's storage.
    pub fn value_type(&self) -> ValueType {
        match self {
            Slot::Bool(_) => ValueType::Bool,
            Slot::Byte(_) => ValueType::Byte,
            Slot::Int(_) => ValueType::Int,
            Slot::UInt(_) => ValueType::UInt,
            Slot::Float(_) => ValueType::Float,
            Slot::Double(_) => ValueType::Double,
            Slot::String(_) => ValueType::String,
        }
    }

    /// Renders the current value in canonical text form.
    pub fn to_text(&self) -> String {
        match self {
            Slot::Bool(v) => v.get().format(),
            Slot::Byte(v) => v.get().format(),
            Slot::Int(v) => v.get().format(),
            Slot::UInt(v) => v.get().format(),
            Slot::Float(v) => v.get().format(),
            Slot::Double(v) => v.get().format(),
            Slot::String(v) => v.borrow().clone(),
        }
    }

    /// Returns true if both slots refer to the same variable.
    pub fn same_variable(&self, other: &Slot) -> bool {
        match (self, other) {
            (Slot::Bool(a), Slot::Bool(b)) => Rc::ptr_eq(a, b),
            (Slot::Byte(a), Slot::Byte(b)) => Rc::ptr_eq(a, b),
            (Slot::Int(a), Slot::Int(b)) => Rc::ptr_eq(a, b),
            (Slot::UInt(a), Slot::UInt(b)) => Rc::ptr_eq(a, b),
            (Slot::Float(a), Slot::Float(b)) => Rc::ptr_eq(a, b),
            (Slot::Double(a), Slot::Double(b)) => Rc::ptr_eq(a, b),
            (Slot::String(a), Slot::String(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! slot_from {
    ($($variant:ident($storage:ty)),* $(,)?) => {
        $(
            impl From<Rc<$storage>> for Slot {
                fn from(value: Rc<$storage>) -> Self {
                    Slot::$variant(value)
                }
            }

            impl From<&Rc<$storage>> for Slot {
                fn from(value: &Rc<$storage>) -> Self {
                    Slot::$variant(Rc::clone(value))
                }
            }
        )*
    };
}

slot_from! {
    Bool(Cell<bool>),
    Byte(Cell<u8>),
    Int(Cell<i32>),
    UInt(Cell<u32>),
    Float(Cell<f32>),
    Double(Cell<f64>),
    String(RefCell<String>),
}
