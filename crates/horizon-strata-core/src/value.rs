//! Typed values carried by value-changed and message events.
//!
//! [`Value`] is a tagged union over the value types widgets exchange.
//! Application-specific payloads travel as [`Value::Bytes`] together with a
//! type tag that is checked on extraction.

use horizon_strata_render::{Area, Color, Point};

/// A value carried by an event.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value.
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Point(Point),
    Area(Area),
    Color(Color),
    /// Opaque bytes with a declared type tag.
    Bytes {
        type_tag: String,
        data: Vec<u8>,
    },
}

impl Value {
    /// Name of the carried type, for diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Point(_) => "point",
            Value::Area(_) => "area",
            Value::Color(_) => "color",
            Value::Bytes { type_tag, .. } => type_tag,
        }
    }

    /// Create a tagged byte payload.
    pub fn bytes(type_tag: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes {
            type_tag: type_tag.into(),
            data: data.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: floats as-is, integers widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Value::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_area(&self) -> Option<Area> {
        match self {
            Value::Area(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Value::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Extract a byte payload, checking its type tag.
    pub fn as_bytes(&self, expected_tag: &str) -> Option<&[u8]> {
        match self {
            Value::Bytes { type_tag, data } if type_tag == expected_tag => Some(data),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Point> for Value {
    fn from(v: Point) -> Self {
        Value::Point(v)
    }
}

impl From<Area> for Value {
    fn from(v: Area) -> Self {
        Value::Area(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}
