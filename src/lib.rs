//! Tokenizer, parser and compiler for OData-style filter and ordering
//! expressions over in-memory records.
//!
//! Two short expression languages are supported: a filter predicate
//! language (`Age gt 30 and startswith(FirstName, 'J')`) and an ordering
//! clause list (`Age asc, FirstName desc`). Both compile against a record
//! shape discovered by runtime introspection (see [`shape::Record`]) into a
//! reentrant, pure predicate or a composed stable ordering.
//!
//! ```
//! use odata_filter_sort::prelude::*;
//!
//! #[derive(Clone)]
//! struct Person {
//!     first_name: String,
//!     age: i32,
//! }
//!
//! record_shape! {
//!     Person : "Person" {
//!         field("FirstName", ValueType::String, false, |r: &Person| Value::String(r.first_name.clone())),
//!         field("Age", ValueType::I32, false, |r: &Person| Value::I32(r.age)),
//!     }
//! }
//!
//! # fn main() -> Result<(), FilterError> {
//! let people = vec![
//!     Person { first_name: "John".into(), age: 30 },
//!     Person { first_name: "Jane".into(), age: 25 },
//! ];
//!
//! let matched = people.filter(Some("Age gt 25 and startswith(FirstName, 'J')"))?;
//! assert_eq!(matched.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! The pipeline, leaf modules first: [`introspection`] resolves dotted
//! property paths against a shape and caches the result; [`coerce`] turns a
//! lexeme into a typed [`value::Value`]; [`tokenizer`]/[`parser`] turn a
//! filter string into an [`ast::Expression`] tree, [`ordering`] turns an
//! ordering string into a clause list; [`compiler::filter`] and
//! [`compiler::order`] turn those into executable form. [`query`] is the
//! public surface most callers want.

pub mod ast;
pub mod coerce;
pub mod compiler;
pub mod error;
pub mod introspection;
pub mod ordering;
pub mod parser;
pub mod query;
pub mod shape;
pub mod token;
pub mod tokenizer;
pub mod value;

/// Everything a typical caller needs: the two error-producing entry points
/// (`parser::parse`, `ordering::parse_ordering`), the extension trait, and
/// the pieces [`record_shape!`] expands to.
pub mod prelude {
    pub use crate::error::{FilterError, Result};
    pub use crate::query::RecordSliceExt;
    pub use crate::shape::{FieldAccess, FieldDescriptor, FieldKind, Record, RecordDyn};
    pub use crate::value::{Value, ValueType};
    pub use crate::record_shape;
}
