//! The command protocol: a verb line followed by a body of declarations and
//! modifiers, dispatched through an immutable command table.
//!
//! ```text
//! update
//! Part: id="P1"
//! Part: quantity="9"
//! ```
//!
//! Every handler answers with an [`Outcome`]; failures never escape as errors.

use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::datatype::Value;
use crate::error::Result;
use crate::parser::{self, Declaration};
use crate::record::Record;

pub type CommandHasher = BuildHasherDefault<SeaHasher>;

/// A stored record together with the name of its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub type_name: String,
    pub record: Record,
}

impl Entry {
    pub fn new(type_name: impl Into<String>, record: Record) -> Self {
        Self { type_name: type_name.into(), record }
    }
    /// `Type: key="value" ...` terminated by a newline.
    pub fn render(&self) -> Result<String> {
        Ok(format!("{}:{}\n", self.type_name, self.record.render()?))
    }
}

/// The result of a command. A failure without a message is a silent failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub message: Option<String>,
}

impl Outcome {
    pub fn ok() -> Self {
        Self { success: true, message: None }
    }
    pub fn ok_with(message: impl Into<String>) -> Self {
        Self { success: true, message: Some(message.into()) }
    }
    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()) }
    }
    pub fn silent_failure() -> Self {
        Self { success: false, message: None }
    }
}

pub type Handler = fn(Option<&str>, &Catalog, &mut Vec<Entry>) -> Outcome;

/// Lower-cased verbs mapped to their handlers. Built once, read-only afterwards.
#[derive(Clone)]
pub struct CommandTable {
    handlers: HashMap<&'static str, Handler, CommandHasher>,
}

impl CommandTable {
    /// add|append, remove|rm|del, update|set and list|show.
    pub fn standard() -> Self {
        Self::builder()
            .register(&["add", "append"], add_entries)
            .register(&["remove", "rm", "del"], delete_entries)
            .register(&["update", "set"], update_entries)
            .register(&["list", "show"], list_entries)
            .build()
    }
    pub fn builder() -> CommandTableBuilder {
        CommandTableBuilder { handlers: HashMap::default() }
    }
    pub fn get(&self, verb: &str) -> Option<Handler> {
        self.handlers.get(verb.to_lowercase().as_str()).copied()
    }
    pub fn verbs(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}

pub struct CommandTableBuilder {
    handlers: HashMap<&'static str, Handler, CommandHasher>,
}

impl CommandTableBuilder {
    pub fn register(mut self, verbs: &[&'static str], handler: Handler) -> Self {
        for verb in verbs {
            self.handlers.insert(*verb, handler);
        }
        self
    }
    pub fn build(self) -> CommandTable {
        CommandTable { handlers: self.handlers }
    }
}

pub struct Interpreter {
    commands: CommandTable,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self { commands: CommandTable::standard() }
    }
    pub fn with_commands(commands: CommandTable) -> Self {
        Self { commands }
    }
    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }
    /// Runs one command against `records`. The first line selects the verb,
    /// the rest of the message is handed to its handler.
    pub fn interpret_message(&self, message: &str, catalog: &Catalog, records: &mut Vec<Entry>) -> Outcome {
        let (verb, body) = match message.split_once('\n') {
            Some((verb, body)) => (verb, Some(body)),
            None => (message, None),
        };
        let verb = verb.trim().to_lowercase();
        match self.commands.get(&verb) {
            Some(handler) => {
                debug!(%verb, records=records.len(), "dispatching command");
                handler(body, catalog, records)
            }
            None => {
                debug!(%verb, "unknown command");
                Outcome::failure(error_report(Some(message), None))
            }
        }
    }
}

/// The envelope used for messages that could not be interpreted at all.
pub fn error_report(message: Option<&str>, more_info: Option<&str>) -> String {
    let mut report = String::from("error\n");
    if let Some(info) = more_info {
        report.push_str(info);
        if !info.ends_with('\n') {
            report.push('\n');
        }
    }
    report.push_str(message.unwrap_or("(No message received)"));
    report
}

// Parses a body and keeps its typed declarations. Unknown record types are
// refused here rather than in the parser.
fn to_records(body: Option<&str>, catalog: &Catalog, for_match: bool) -> Result<(Vec<(String, Record)>, Vec<String>)> {
    let Some(parsed) = body.map(|b| parser::parse_text_block(b, catalog, for_match)).transpose()?.flatten() else {
        return Ok((Vec::new(), Vec::new()));
    };
    let mut typed = Vec::with_capacity(parsed.declarations.len());
    for declaration in parsed.declarations {
        match declaration {
            Declaration::Record { type_name, record } => typed.push((type_name, record)),
            Declaration::Unknown { type_name, .. } => return Err(catalog.unknown_type(&type_name)),
        }
    }
    Ok((typed, parsed.modifiers))
}

fn matches_any(entry: &Entry, matchers: &[(String, Record)]) -> bool {
    matchers
        .iter()
        .any(|(type_name, matcher)| *type_name == entry.type_name && entry.record.meets_criteria(Some(matcher)))
}

/// Appends every complete record in `body`. Incomplete ones are dropped.
pub fn add_entries(body: Option<&str>, catalog: &Catalog, records: &mut Vec<Entry>) -> Outcome {
    let parsed = match to_records(body, catalog, false) {
        Ok((parsed, _)) => parsed,
        Err(e) => return Outcome::failure(format!("One or more records had invalid data: {}", e)),
    };
    let total = parsed.len();
    let mut added = 0;
    for (type_name, record) in parsed {
        if record.is_valid() {
            records.push(Entry::new(type_name, record));
            added += 1;
        } else {
            warn!(%type_name, "dropping incomplete record");
        }
    }
    if added < total {
        Outcome::ok_with(format!("WARNING: {} of {} records were incomplete and not added", total - added, total))
    } else {
        Outcome::ok()
    }
}

/// Removes each stored record matching any matcher of its type, at most once.
pub fn delete_entries(body: Option<&str>, catalog: &Catalog, records: &mut Vec<Entry>) -> Outcome {
    let matchers = match to_records(body, catalog, true) {
        Ok((matchers, _)) => matchers,
        Err(e) => return Outcome::failure(e.to_string()),
    };
    if matchers.is_empty() {
        return Outcome::silent_failure();
    }
    let doomed: Vec<bool> = records.iter().map(|entry| matches_any(entry, &matchers)).collect();
    let mut index = 0;
    records.retain(|_| {
        let keep = !doomed[index];
        index += 1;
        keep
    });
    debug!(removed = doomed.iter().filter(|d| **d).count(), "deleted records");
    Outcome::ok()
}

/// Applies (matcher, setter) pairs. Field updates are best effort: failures
/// are reported in the message while the remaining fields still apply.
pub fn update_entries(body: Option<&str>, catalog: &Catalog, records: &mut Vec<Entry>) -> Outcome {
    let declared = match to_records(body, catalog, true) {
        Ok((declared, _)) => declared,
        Err(e) => return Outcome::failure(e.to_string()),
    };
    if declared.is_empty() {
        return Outcome::failure("Couldn't find match records");
    }
    let mut notes = Vec::new();
    let mut pairs = Vec::new();
    for chunk in declared.chunks(2) {
        match chunk {
            [matcher, setter] => {
                if matcher.0 != setter.0 {
                    return Outcome::failure("Can't update one record to another.");
                }
                pairs.push((matcher, setter));
            }
            _ => {
                warn!(type_name=%chunk[0].0, "discarding matcher without setter");
                notes.push("Discarded matcher for update.".to_string());
            }
        }
    }
    if pairs.is_empty() {
        return Outcome::silent_failure();
    }
    let mut failures = Vec::new();
    for ((type_name, matcher), (_, setter)) in pairs {
        for entry in records
            .iter_mut()
            .filter(|e| e.type_name == *type_name && e.record.meets_criteria(Some(matcher)))
        {
            for (field, attribute) in setter.attributes() {
                let Some(value) = attribute.as_string() else {
                    continue;
                };
                if !entry.record.update_attribute(field, Some(Value::Text(value.clone()))) {
                    warn!(%type_name, %field, %value, "field update failed");
                    failures.push(format!("Failed to update field {} to {}.", field, value));
                }
            }
        }
    }
    notes.extend(failures);
    if notes.is_empty() {
        Outcome::ok()
    } else {
        Outcome::ok_with(notes.join("\n"))
    }
}

/// Renders the records meeting the criteria in `body` (all of them without
/// criteria), applying any `sort <Type> by ...` modifiers.
pub fn list_entries(body: Option<&str>, catalog: &Catalog, records: &mut Vec<Entry>) -> Outcome {
    let (matchers, modifiers) = match to_records(body, catalog, true) {
        Ok(parsed) => parsed,
        Err(e) => return Outcome::failure(e.to_string()),
    };
    let mut listed: Vec<&Entry> = if matchers.is_empty() {
        records.iter().collect()
    } else {
        records.iter().filter(|entry| matches_any(entry, &matchers)).collect()
    };
    if listed.is_empty() {
        return Outcome::ok();
    }
    for modifier in &modifiers {
        let (type_name, fields) = match parser::parse_sort_directive(modifier) {
            Ok(directive) => directive,
            Err(e) => return Outcome::failure(format!("Could not interpret modifier '{}' ({})", modifier, e)),
        };
        let Some(factory) = catalog.get(&type_name) else {
            return Outcome::failure(format!("{} is not a valid record", type_name));
        };
        if let Some(field) = fields.iter().find(|f| !factory.has_attribute(f)) {
            return Outcome::failure(format!("asking to sort by invalid attribute {} from {}", field, type_name));
        }
        let (mut sorted, rest): (Vec<&Entry>, Vec<&Entry>) =
            listed.into_iter().partition(|entry| entry.type_name == type_name);
        // stable sorts from the least to the most significant field
        for field in fields.iter().rev() {
            sorted.sort_by(|a, b| Value::compare_nullable(a.record.value(field), b.record.value(field)));
        }
        listed = rest;
        listed.extend(sorted);
    }
    let mut rendered = String::new();
    for entry in listed {
        match entry.render() {
            Ok(line) => rendered.push_str(&line),
            Err(e) => return Outcome::failure(e.to_string()),
        }
    }
    Outcome::ok_with(rendered)
}
