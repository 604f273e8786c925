//! Schemas, the records instantiated from them, and the factories that build
//! both strict records and relaxed match records.

use std::fmt::Write;

use crate::attribute::Attribute;
use crate::datatype::{Kind, Value};
use crate::error::{Result, StockroomError};
use crate::parser::KvToken;

// ------------- Schema -------------
/// An ordered set of named template attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, Attribute)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }
    /// Inserts or replaces a template. A replaced name keeps its position.
    pub fn insert(&mut self, name: String, attribute: Attribute) {
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = attribute,
            None => self.fields.push((name, attribute)),
        }
    }
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, a)| a)
    }
    fn get_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.fields.iter_mut().find(|(n, _)| n == name).map(|(_, a)| a)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.fields.iter().map(|(n, a)| (n.as_str(), a))
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ------------- Record -------------
/// One instance of a schema. Attributes are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    attributes: Schema,
}

impl Record {
    /// Instantiates a record from a deep copy of `schema`.
    pub fn new(schema: &Schema) -> Result<Self> {
        if schema.is_empty() {
            return Err(StockroomError::EmptySchema);
        }
        Ok(Self { attributes: schema.clone() })
    }
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter()
    }
    /// The native value of `name`, or `None` when unknown or null.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).and_then(Attribute::as_native)
    }
    pub fn set_attribute(&mut self, name: &str, value: Option<Value>) -> bool {
        match self.attributes.get_mut(name) {
            Some(attribute) => attribute.set_value(value),
            None => false,
        }
    }
    /// Like [`Record::set_attribute`], but a value that fails coercion leaves
    /// the previous value in place.
    pub fn update_attribute(&mut self, name: &str, value: Option<Value>) -> bool {
        let Some(attribute) = self.attributes.get_mut(name) else {
            return false;
        };
        let mut candidate = attribute.clone();
        if candidate.set_value(value) {
            *attribute = candidate;
            true
        } else {
            false
        }
    }
    pub fn is_valid(&self) -> bool {
        self.attributes.iter().all(|(_, a)| !a.required() || !a.is_null())
    }
    /// Whether this record satisfies every non-null attribute of `criteria`.
    pub fn meets_criteria(&self, criteria: Option<&Record>) -> bool {
        let Some(criteria) = criteria else {
            return false;
        };
        criteria
            .attributes()
            .filter(|(_, c)| !c.is_null())
            .all(|(name, c)| match self.attribute(name) {
                Some(a) if !a.is_null() => a.matches_criteria(c.as_string().as_deref()),
                _ => false,
            })
    }
    /// Renders ` name="value"` for every non-null attribute in schema order.
    pub fn render(&self) -> Result<String> {
        if !self.is_valid() {
            let missing: Vec<&str> = self
                .attributes()
                .filter(|(_, a)| a.required() && a.is_null())
                .map(|(n, _)| n)
                .collect();
            return Err(StockroomError::InvalidRecord(format!(
                "required attributes without value: {}",
                missing.join(", ")
            )));
        }
        let mut rendered = String::new();
        for (name, attribute) in self.attributes() {
            if let Some(value) = attribute.as_string() {
                let _ = write!(rendered, " {}=\"{}\"", name, value);
            }
        }
        Ok(rendered)
    }
}

// ------------- RecordFactory -------------
/// Declares one record type and builds records and match records for it.
///
/// The match schema mirrors the record schema with every attribute forced to
/// [`Kind::String`], so criteria can carry wildcards whatever the field type.
/// Match templates start empty: defaults only apply to stored records.
#[derive(Debug, Clone, Default)]
pub struct RecordFactory {
    record_schema: Schema,
    match_schema: Schema,
}

impl RecordFactory {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add_attribute(&mut self, name: impl Into<String>, template: Attribute) {
        let name = name.into();
        let mut relaxed = template.clone();
        relaxed.set_type(Kind::String);
        relaxed.set_value(None);
        self.record_schema.insert(name.clone(), template);
        self.match_schema.insert(name, relaxed);
    }
    pub fn record_schema(&self) -> &Schema {
        &self.record_schema
    }
    pub fn match_schema(&self) -> &Schema {
        &self.match_schema
    }
    pub fn has_attribute(&self, name: &str) -> bool {
        self.record_schema.contains(name)
    }
    pub fn generate_record(&self, tokens: Option<&[KvToken]>) -> Result<Record> {
        self.generate(&self.record_schema, tokens)
    }
    pub fn generate_match_record(&self, tokens: Option<&[KvToken]>) -> Result<Record> {
        self.generate(&self.match_schema, tokens)
    }
    fn generate(&self, schema: &Schema, tokens: Option<&[KvToken]>) -> Result<Record> {
        let mut record = Record::new(schema)?;
        for token in tokens.unwrap_or_default() {
            // bare tags are reserved for later extensions
            let KvToken::Pair(key, value) = token else {
                continue;
            };
            if record.set_attribute(key, Some(Value::Text(value.clone()))) {
                continue;
            }
            return Err(match schema.get(key) {
                Some(template) => StockroomError::Coercion {
                    key: key.clone(),
                    value: value.clone(),
                    kind: template.kind().name(),
                },
                None => StockroomError::UnknownAttribute {
                    key: key.clone(),
                    value: value.clone(),
                    available: self.record_schema.names().collect::<Vec<_>>().join(" "),
                },
            });
        }
        Ok(record)
    }
}
