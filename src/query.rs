//! The public extension surface: `.filter(...)` / `.order_by(...)` on any
//! slice of records, composable in either order (`Filter` then `OrderBy` is
//! the canonical usage).
//!
//! Absent, empty, or whitespace-only input is deliberately not an error: it
//! is the explicit no-op form of both operations, matching the source
//! expression language's own treatment of a blank request. `None` is the
//! idiomatic Rust spelling of the expression language's `null` input.

use crate::compiler;
use crate::error::FilterError;
use crate::ordering;
use crate::parser;
use crate::shape::Record;

/// Extension trait implemented for any slice of a [`Record`] type.
pub trait RecordSliceExt<T: Record + Clone> {
    /// Parses and compiles `filter_expr` against `T`'s shape, then returns
    /// the subset of records (in original order) for which the compiled
    /// predicate holds. `None`, `Some("")`, and whitespace-only input all
    /// return every record unchanged.
    fn filter(&self, filter_expr: Option<&str>) -> Result<Vec<T>, FilterError>;

    /// Parses and compiles `ordering_expr` against `T`'s shape, then returns
    /// a stably sorted copy. `None`, `Some("")`, and whitespace-only input
    /// all return the records in their original order.
    fn order_by(&self, ordering_expr: Option<&str>) -> Result<Vec<T>, FilterError>;
}

impl<T: Record + Clone> RecordSliceExt<T> for [T] {
    fn filter(&self, filter_expr: Option<&str>) -> Result<Vec<T>, FilterError> {
        let Some(expr) = non_blank(filter_expr) else {
            return Ok(self.to_vec());
        };

        let tree = parser::parse(expr)?;
        let predicate = compiler::filter::compile::<T>(&tree)?;
        tracing::debug!(records = self.len(), "applying compiled filter predicate");
        Ok(self.iter().filter(|record| predicate(record)).cloned().collect())
    }

    fn order_by(&self, ordering_expr: Option<&str>) -> Result<Vec<T>, FilterError> {
        let Some(expr) = non_blank(ordering_expr) else {
            return Ok(self.to_vec());
        };

        let clauses = ordering::parse_ordering(expr)?;
        let compiled = compiler::order::compile::<T>(&clauses)?;
        tracing::debug!(records = self.len(), clauses = clauses.len(), "applying composed ordering");
        Ok(compiled.apply(self))
    }
}

fn non_blank(input: Option<&str>) -> Option<&str> {
    match input {
        Some(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}
