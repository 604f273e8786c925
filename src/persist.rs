//! Line-oriented text form of a record collection (`Type: key="value" ...`)
//! and the file-backed persistor the driver uses.
//!
//! The core only ever consumes and produces strings; reading and writing the
//! file is left to [`Persistor`], which only the binary uses.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{Result, StockroomError};
use crate::parser::{self, Declaration};
use crate::protocol::Entry;

/// Renders every entry as `Type: key="value" ...\n`.
pub fn encode(records: &[Entry]) -> Result<String> {
    let mut text = String::new();
    for entry in records {
        text.push_str(&entry.render()?);
    }
    Ok(text)
}

/// Parses persisted text back into a collection. Unknown types and
/// incomplete records are errors, blank text is an empty collection.
pub fn decode(text: &str, catalog: &Catalog) -> Result<Vec<Entry>> {
    let Some(parsed) = parser::parse_text_block(text, catalog, false)? else {
        return Ok(Vec::new());
    };
    if let Some(line) = parsed.modifiers.first() {
        return Err(StockroomError::Persistence(format!("Unexpected line in records: '{}'", line)));
    }
    let mut records = Vec::with_capacity(parsed.declarations.len());
    for declaration in parsed.declarations {
        match declaration {
            Declaration::Record { type_name, record } => {
                if !record.is_valid() {
                    return Err(StockroomError::InvalidRecord(format!(
                        "incomplete {} record:{}",
                        type_name,
                        describe(&record)
                    )));
                }
                records.push(Entry::new(type_name, record));
            }
            Declaration::Unknown { type_name, .. } => return Err(catalog.unknown_type(&type_name)),
        }
    }
    Ok(records)
}

// the non-null part of a record, for messages about records that can't render
fn describe(record: &crate::record::Record) -> String {
    record
        .attributes()
        .filter_map(|(name, a)| a.as_string().map(|v| format!(" {}=\"{}\"", name, v)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct Persistor {
    path: PathBuf,
}

impl Persistor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Reads the collection from the file, which has to exist.
    pub fn restore(&self, catalog: &Catalog) -> Result<Vec<Entry>> {
        let text = fs::read_to_string(&self.path)?;
        let records = decode(&text, catalog)?;
        debug!(path=%self.path.display(), records=records.len(), "restored records");
        Ok(records)
    }
    /// Writes the collection back. Nothing is written if any entry can't be
    /// rendered.
    pub fn commit(&self, records: &[Entry]) -> Result<()> {
        fs::write(&self.path, encode(records)?)?;
        debug!(path=%self.path.display(), records=records.len(), "committed records");
        Ok(())
    }
}
