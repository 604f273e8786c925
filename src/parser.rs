//! Turns command bodies into modifier lines and record declarations.
//!
//! The line-level grammar (declarations, key/value lists, sort directives)
//! lives in `grammar.pest`.

use pest::Parser;
use pest_derive::Parser;

use crate::catalog::Catalog;
use crate::error::{Result, StockroomError};
use crate::record::Record;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct DeclarationParser;

/// One token of a declaration body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvToken {
    /// `key="value"`
    Pair(String, String),
    /// A bare word, currently ignored by record generation.
    Tag(String),
}

/// A record line of a parsed block.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// A declaration of a known type, converted by its factory.
    Record { type_name: String, record: Record },
    /// A declaration of a type the catalog does not know, left unconverted.
    Unknown { type_name: String, tokens: Option<Vec<KvToken>> },
}

impl Declaration {
    pub fn type_name(&self) -> &str {
        match self {
            Declaration::Record { type_name, .. } => type_name,
            Declaration::Unknown { type_name, .. } => type_name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedBlock {
    pub modifiers: Vec<String>,
    pub declarations: Vec<Declaration>,
}

impl ParsedBlock {
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty() && self.declarations.is_empty()
    }
}

/// Splits `TypeName: rest` into the type name and the rest of the line.
/// The rest is `None` when nothing follows the colon.
pub fn extract_record_name(line: &str) -> Option<(String, Option<String>)> {
    let mut pairs = DeclarationParser::parse(Rule::declaration, line).ok()?;
    let mut inner = pairs.next()?.into_inner();
    let name = inner.next()?.as_str().to_string();
    let remainder = inner
        .next()
        .map(|p| p.as_str())
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    Some((name, remainder))
}

/// Tokenizes `key="value"` pairs and bare tags. Returns `None` when the text
/// contains neither.
pub fn get_kv_pairs(text: &str) -> Option<Vec<KvToken>> {
    if text.is_empty() {
        return None;
    }
    let list = DeclarationParser::parse(Rule::kv_list, text).ok()?.next()?;
    let mut tokens = Vec::new();
    for item in list.into_inner() {
        match item.as_rule() {
            Rule::pair => {
                let mut parts = item.into_inner();
                let key = parts.next()?.as_str().to_string();
                let value = parts.next()?.as_str().to_string();
                tokens.push(KvToken::Pair(key, value));
            }
            Rule::tag => {
                let word = item.into_inner().next()?.as_str().to_string();
                tokens.push(KvToken::Tag(word));
            }
            _ => (),
        }
    }
    if tokens.is_empty() { None } else { Some(tokens) }
}

/// Joins backslash-newline continuations.
pub fn process_total(block: &str) -> String {
    block.replace("\\\n", "")
}

/// Parses `sort <TypeName> by f1, f2, ...` into the type name and its fields.
pub fn parse_sort_directive(line: &str) -> Result<(String, Vec<String>)> {
    let mut pairs = DeclarationParser::parse(Rule::sort_directive, line)?;
    let mut inner = pairs
        .next()
        .ok_or_else(|| StockroomError::Grammar(format!("Could not interpret modifier '{}'", line)))?
        .into_inner();
    let type_name = inner.next().map(|p| p.as_str().to_string()).unwrap_or_default();
    let fields = inner
        .next()
        .map(|p| p.as_str().split(',').map(|f| f.trim().to_string()).collect())
        .unwrap_or_default();
    Ok((type_name, fields))
}

/// Splits a text block into modifier lines and record declarations.
///
/// Declarations of catalogued types are turned into records (or match records
/// when `for_match` is set); conversion errors abort the whole block.
/// Returns `None` when the block holds nothing.
pub fn parse_text_block(block: &str, catalog: &Catalog, for_match: bool) -> Result<Option<ParsedBlock>> {
    let block = process_total(block);
    let mut parsed = ParsedBlock::default();
    for line in block.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        let Some((type_name, remainder)) = extract_record_name(line) else {
            parsed.modifiers.push(line.to_string());
            continue;
        };
        let tokens = remainder.as_deref().and_then(get_kv_pairs);
        let declaration = match catalog.get(&type_name) {
            Some(factory) => {
                let record = if for_match {
                    factory.generate_match_record(tokens.as_deref())?
                } else {
                    factory.generate_record(tokens.as_deref())?
                };
                Declaration::Record { type_name, record }
            }
            None => Declaration::Unknown { type_name, tokens },
        };
        parsed.declarations.push(declaration);
    }
    if parsed.is_empty() { Ok(None) } else { Ok(Some(parsed)) }
}
