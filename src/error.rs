
use pest::error::LineColLocation;
use thiserror::Error;

use crate::parser::Rule;

#[derive(Error, Debug)]
pub enum StockroomError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Parse error: {message}")]
    Parse { message: String, line: Option<usize>, col: Option<usize> },
    #[error("{0}")]
    Grammar(String),
    #[error("Can't create a record with no attributes")]
    EmptySchema,
    #[error("Invalid key or value for record ({key} ;; {value}). Available keys are {available}")]
    UnknownAttribute { key: String, value: String, available: String },
    #[error("Invalid key or value for record ({key} ;; {value}). {key} holds {kind} values")]
    Coercion { key: String, value: String, kind: &'static str },
    #[error("Unknown record type {type_name}; known types are {known}")]
    UnknownRecordType { type_name: String, known: String },
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, StockroomError>;

// Helper conversions
impl From<std::io::Error> for StockroomError {
    fn from(e: std::io::Error) -> Self { Self::Persistence(e.to_string()) }
}
impl From<config::ConfigError> for StockroomError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<pest::error::Error<Rule>> for StockroomError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        let (line, col) = match e.line_col {
            LineColLocation::Pos((line, col)) | LineColLocation::Span((line, col), _) => (line, col),
        };
        Self::Parse { message: e.variant.message().into_owned(), line: Some(line), col: Some(col) }
    }
}
