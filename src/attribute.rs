//! Typed, nullable scalar attributes and the criteria they can be matched with.

use regex::{Regex, RegexBuilder};

use crate::datatype::{Kind, Value};

/// The marker that turns a criteria value into a wildcard pattern.
pub const WILDCARD: char = '*';

/// True when `criteria` should be treated as a wildcard pattern.
pub fn is_basic_regex(criteria: &str) -> bool {
    criteria.contains(WILDCARD)
}

/// Compiles a wildcard pattern into an anchored regular expression where every
/// character is literal except `*`, which matches any sequence (newlines included).
pub fn wildcard_to_regex(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    RegexBuilder::new(&format!(r"\A(?:{})\z", body))
        .dot_matches_new_line(true)
        .build()
        .ok()
}

#[derive(Debug, Clone)]
pub struct Attribute {
    kind: Kind,
    value: Option<Value>,
    multiple: bool,
    required: bool,
}

impl Default for Attribute {
    fn default() -> Self {
        Self {
            kind: Kind::String,
            value: None,
            multiple: false,
            required: true,
        }
    }
}

impl Attribute {
    pub fn new() -> Self {
        Self::default()
    }
    /// A required, empty attribute of the given kind.
    pub fn of(kind: Kind) -> Self {
        Self { kind, ..Self::default() }
    }
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
    /// Sets a default value; a default that does not fit the kind is dropped.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.set_value(Some(value.into()));
        self
    }
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
    pub fn required(&self) -> bool {
        self.required
    }
    pub fn set_required(&mut self, required: bool) {
        self.required = required;
    }
    pub fn multiple_allowed(&self) -> bool {
        self.multiple
    }
    pub fn set_multiple_allowed(&mut self, multiple: bool) {
        self.multiple = multiple;
    }
    pub fn as_string(&self) -> Option<String> {
        self.value.as_ref().map(Value::to_text)
    }
    pub fn as_native(&self) -> Option<&Value> {
        self.value.as_ref()
    }
    /// Changes the kind, re-coercing the current value through its string form.
    /// A value that does not survive the change is cleared.
    pub fn set_type(&mut self, kind: Kind) {
        if self.kind == kind {
            return;
        }
        let current = self.as_string();
        self.kind = kind;
        if let Some(text) = current {
            self.set_value(Some(Value::Text(text)));
        }
    }
    /// Coerces and stores `value`. Returns false, leaving the attribute null,
    /// when the value cannot be represented in this attribute's kind.
    pub fn set_value(&mut self, value: Option<Value>) -> bool {
        match value {
            None => {
                self.value = None;
                true
            }
            Some(v) => {
                self.value = self.kind.coerce(&v);
                self.value.is_some()
            }
        }
    }
    pub fn matches_criteria(&self, criteria: Option<&str>) -> bool {
        self.matches_criteria_with(criteria, false)
    }
    /// With `force_raw` set, wildcard markers are compared literally.
    pub fn matches_criteria_with(&self, criteria: Option<&str>, force_raw: bool) -> bool {
        let Some(criteria) = criteria else {
            return true;
        };
        let Some(value) = &self.value else {
            return false;
        };
        if !force_raw && is_basic_regex(criteria) {
            match wildcard_to_regex(criteria) {
                Some(re) => re.is_match(&value.to_text()),
                None => false,
            }
        } else {
            match self.kind.coerce(&Value::Text(criteria.to_string())) {
                Some(wanted) => *value == wanted,
                None => false,
            }
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind || self.multiple != other.multiple {
            return false;
        }
        match (&self.value, &other.value) {
            (None, None) => true,
            (Some(a), Some(b)) => self.required == other.required && a == b,
            _ => false,
        }
    }
}
