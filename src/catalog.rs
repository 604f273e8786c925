//! The named record factories a command body can refer to.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::attribute::Attribute;
use crate::datatype::Kind;
use crate::error::{Result, StockroomError};
use crate::record::RecordFactory;
use crate::settings::{FieldSettings, Settings};

lazy_static! {
    // names have to be addressable by the declaration grammar
    static ref IDENTIFIER: Regex = Regex::new(r"^\w+$").unwrap();
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    factories: BTreeMap<String, RecordFactory>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }
    /// The parts inventory: `Part` with a string id, description and footprint
    /// and an integer quantity, all required.
    pub fn inventory() -> Self {
        let mut part = RecordFactory::new();
        part.add_attribute("id", Attribute::of(Kind::String));
        part.add_attribute("description", Attribute::of(Kind::String));
        part.add_attribute("footprint", Attribute::of(Kind::String));
        part.add_attribute("quantity", Attribute::of(Kind::Integer));
        let mut catalog = Self::new();
        catalog.factories.insert("Part".to_string(), part);
        catalog
    }
    /// Builds the catalog declared in settings, or the inventory when none is declared.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if settings.types.is_empty() {
            return Ok(Self::inventory());
        }
        let mut catalog = Self::new();
        for (type_name, fields) in &settings.types {
            catalog.insert(type_name, factory_from_fields(type_name, fields)?)?;
        }
        Ok(catalog)
    }
    pub fn insert(&mut self, type_name: &str, factory: RecordFactory) -> Result<()> {
        if !IDENTIFIER.is_match(type_name) {
            return Err(StockroomError::Config(format!("'{}' is not a valid record type name", type_name)));
        }
        if factory.record_schema().is_empty() {
            return Err(StockroomError::EmptySchema);
        }
        self.factories.insert(type_name.to_string(), factory);
        Ok(())
    }
    pub fn get(&self, type_name: &str) -> Option<&RecordFactory> {
        self.factories.get(type_name)
    }
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.factories.len()
    }
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
    pub(crate) fn unknown_type(&self, type_name: &str) -> StockroomError {
        StockroomError::UnknownRecordType {
            type_name: type_name.to_string(),
            known: self.names().collect::<Vec<_>>().join(", "),
        }
    }
}

fn factory_from_fields(type_name: &str, fields: &[FieldSettings]) -> Result<RecordFactory> {
    let mut factory = RecordFactory::new();
    for field in fields {
        if !IDENTIFIER.is_match(&field.name) {
            return Err(StockroomError::Config(format!(
                "'{}' is not a valid attribute name for {}",
                field.name, type_name
            )));
        }
        let mut attribute = Attribute::of(field.kind);
        attribute.set_required(field.required);
        attribute.set_multiple_allowed(field.multiple);
        if let Some(default) = &field.default {
            if !attribute.set_value(Some(default.as_str().into())) {
                return Err(StockroomError::Config(format!(
                    "default '{}' of {}.{} is not a valid {}",
                    default, type_name, field.name, field.kind
                )));
            }
        }
        factory.add_attribute(field.name.clone(), attribute);
    }
    Ok(factory)
}
