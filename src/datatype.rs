// used to print out readable forms of a data type
use std::fmt;
// used when sorting records by attribute
use std::cmp::Ordering;

use serde::Deserialize;

/// The closed set of scalar kinds an attribute may hold.
///
/// Every operation that depends on the kind matches exhaustively, so adding a
/// variant forces each parse, format and compare site to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    String,
    Integer,
    Float,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Integer => "integer",
            Kind::Float => "float",
        }
    }
    /// Casts a value into this kind, or `None` if it cannot be represented.
    pub fn coerce(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Kind::String, v) => Some(Value::Text(v.to_text())),
            (Kind::Integer, Value::Text(s)) => s.trim().parse::<i64>().ok().map(Value::Integer),
            (Kind::Integer, Value::Integer(i)) => Some(Value::Integer(*i)),
            (Kind::Integer, Value::Float(f)) => {
                if f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(Value::Integer(f.trunc() as i64))
                } else {
                    None
                }
            }
            (Kind::Float, Value::Text(s)) => s.trim().parse::<f64>().ok().map(Value::Float),
            (Kind::Float, Value::Integer(i)) => Some(Value::Float(*i as f64)),
            (Kind::Float, Value::Float(f)) => Some(Value::Float(*f)),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
/// A native scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl Value {
    /// The canonical string form, as rendered and as matched by wildcards.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                let s = f.to_string();
                // floats always carry a fractional part
                if f.is_finite() && !s.contains('.') { s + ".0" } else { s }
            }
        }
    }
    /// Total ordering between values of the same kind. Mixed kinds fall back
    /// to comparing their string forms.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.total_cmp(&(*b as f64)),
            (a, b) => a.to_text().cmp(&b.to_text()),
        }
    }
    /// Ordering of nullable values, absent values first.
    pub fn compare_nullable(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.compare(b),
        }
    }
}
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(s.to_string()) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(s) }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Integer(i) }
}
impl From<f64> for Value {
    fn from(f: f64) -> Self { Value::Float(f) }
}
