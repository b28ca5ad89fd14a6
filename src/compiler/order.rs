//! Composes an ordering clause list into a stable total order over a slice
//! of records.
//!
//! Mirrors "order by first clause, then by each subsequent clause": each
//! clause contributes one key; ties on an earlier clause are broken by the
//! next one, and ties on every clause preserve input order (`sort_by` is
//! stable).

use crate::error::FilterError;
use crate::introspection::{self, ResolvedPath};
use crate::ordering::OrderingClause;
use crate::shape::Record;
use crate::value::Value;

use super::filter::read_path;

/// One compiled ordering key: a resolved path plus the direction to sort
/// it by.
struct CompiledClause {
    resolved: std::sync::Arc<ResolvedPath>,
    descending: bool,
}

/// A composed ordering ready to apply to any slice of `T`.
pub struct OrderBy<T: Record> {
    clauses: Vec<CompiledClause>,
    _marker: std::marker::PhantomData<fn(&T)>,
}

impl<T: Record> OrderBy<T> {
    /// Applies the composed clauses to `records`, returning a new stably
    /// sorted vector. An empty clause list returns the input unchanged.
    pub fn apply(&self, records: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        let mut out: Vec<T> = records.to_vec();
        self.apply_in_place(&mut out);
        out
    }

    /// Same as [`Self::apply`] but sorts in place, avoiding a clone when the
    /// caller already owns the buffer.
    pub fn apply_in_place(&self, records: &mut [T]) {
        if self.clauses.is_empty() {
            return;
        }
        records.sort_by(|a, b| {
            for clause in &self.clauses {
                let key_a = read_path(a, &clause.resolved);
                let key_b = read_path(b, &clause.resolved);
                let ordering = compare_keys(&key_a, &key_b);
                if ordering != std::cmp::Ordering::Equal {
                    return if clause.descending {
                        ordering.reverse()
                    } else {
                        ordering
                    };
                }
            }
            std::cmp::Ordering::Equal
        });
    }
}

/// Nulls sort first regardless of direction's effect on the non-null
/// ordering, following the common "nulls first" convention for a total
/// order over an `Option`-shaped domain.
fn compare_keys(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        (false, false) => a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal),
    }
}

/// Compiles a parsed clause list into a composed [`OrderBy`], resolving
/// every property path against `T`'s record shape up front.
pub fn compile<T: Record>(clauses: &[OrderingClause]) -> Result<OrderBy<T>, FilterError> {
    let compiled = clauses
        .iter()
        .map(|clause| {
            let resolved = introspection::resolve_path::<T>(&clause.property_path)?;
            Ok(CompiledClause {
                resolved,
                descending: clause.descending,
            })
        })
        .collect::<Result<Vec<_>, FilterError>>()?;

    Ok(OrderBy {
        clauses: compiled,
        _marker: std::marker::PhantomData,
    })
}
