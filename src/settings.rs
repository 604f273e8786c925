//! Layered settings: an optional config file under `STOCKROOM_*` environment
//! variables.
//!
//! ```toml
//! records_file = "parts.txt"
//! log_filter = "debug"
//!
//! [[types.Part]]
//! name = "id"
//!
//! [[types.Part]]
//! name = "quantity"
//! kind = "integer"
//! default = "0"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::datatype::Kind;
use crate::error::Result;

pub const DEFAULT_CONFIG: &str = "stockroom.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub records_file: Option<PathBuf>,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Record type name to its ordered attribute declarations.
    #[serde(default)]
    pub types: BTreeMap<String, Vec<FieldSettings>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FieldSettings {
    pub name: String,
    #[serde(default)]
    pub kind: Kind,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub default: Option<String>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_required() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            records_file: None,
            log_filter: default_log_filter(),
            types: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Loads settings from `path` (or `stockroom.toml` if present) and the environment.
    /// An explicitly given file has to exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("STOCKROOM"))
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }
}
