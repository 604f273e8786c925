//! Stockroom – a small schema-typed record store driven by a textual command protocol.
//!
//! Record types are declared as ordered schemas of typed, nullable attributes:
//! * A [`datatype::Kind`] is one of the closed set of scalar kinds (string, integer, float).
//! * An [`attribute::Attribute`] holds one value of its kind, or nothing.
//! * A [`record::Record`] is one instance of a schema, deep-copied from its template.
//! * A [`record::RecordFactory`] builds strict records and relaxed, all-string
//!   match records used as criteria.
//! * A [`catalog::Catalog`] names the factories a command may refer to.
//!
//! ## Command Protocol
//! A command is a verb line followed by a body. Body lines of the form
//! `Type: key="value" ...` declare records, other lines are modifiers such as
//! `sort Part by quantity, id`. Criteria values containing `*` match as
//! anchored wildcards. The grammar lives in `grammar.pest`.
//!
//! ## Quick Start
//! ```
//! use stockroom::{catalog::Catalog, protocol::Interpreter};
//! let catalog = Catalog::inventory();
//! let interpreter = Interpreter::new();
//! let mut records = Vec::new();
//! let added = interpreter.interpret_message(
//!     "add\nPart: id=\"P1\" description=\"Widget\" footprint=\"0603\" quantity=\"5\"",
//!     &catalog,
//!     &mut records,
//! );
//! assert!(added.success);
//! let listed = interpreter.interpret_message("list", &catalog, &mut records);
//! assert_eq!(
//!     listed.message.as_deref(),
//!     Some("Part: id=\"P1\" description=\"Widget\" footprint=\"0603\" quantity=\"5\"\n")
//! );
//! ```
//!
//! ## Persistence
//! The core never touches files: [`persist::encode`] and [`persist::decode`]
//! turn a collection into `Type: key="value"` lines and back. The
//! [`persist::Persistor`] wraps a file for the `stockroom` binary.

pub mod attribute;
pub mod catalog;
pub mod datatype;
pub mod error;
pub mod parser;
pub mod persist;
pub mod protocol;
pub mod record;
pub mod settings;

pub use error::{Result, StockroomError};
