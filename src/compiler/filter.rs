//! Walks an [`Expression`] tree in post-order, emitting an evaluable
//! [`Predicate`] against a bound record shape.
//!
//! Compilation happens once; the returned closure captures only immutable
//! constants (resolved paths, coerced literals) and is safe to call any
//! number of times from any thread. It is reentrant and pure, with no
//! hidden mutable state beyond what was captured at compile time.

use std::sync::Arc;

use crate::ast::{ComparisonOp, Expression, LogicalOp, StringFn};
use crate::coerce;
use crate::error::FilterError;
use crate::introspection::{self, ResolvedPath};
use crate::shape::{FieldAccess, Record};
use crate::value::{Value, ValueType};

/// A compiled, reentrant predicate over one record.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Compiles an [`Expression`] tree into a [`Predicate`] bound to `T`'s
/// record shape. Every property path is resolved and every literal coerced
/// here, at compile time, so evaluation never fails.
pub fn compile<T: Record>(expr: &Expression) -> Result<Predicate<T>, FilterError> {
    match expr {
        Expression::Comparison {
            path,
            op,
            value_lexeme,
        } => compile_comparison(path, *op, value_lexeme),
        Expression::Function { func, arg_lexemes } => {
            let [path, value_lexeme] = require_two_args(func_name(*func), arg_lexemes)?;
            compile_string_fn(path, *func, value_lexeme)
        }
        Expression::Logical { op, left, right } => {
            let left = compile::<T>(left)?;
            let right = compile::<T>(right)?;
            Ok(match op {
                // Left-to-right, short-circuiting, never reordered.
                LogicalOp::And => {
                    Box::new(move |record: &T| left(record) && right(record)) as Predicate<T>
                }
                LogicalOp::Or => {
                    Box::new(move |record: &T| left(record) || right(record)) as Predicate<T>
                }
            })
        }
        Expression::Not { inner } => {
            let inner = compile::<T>(inner)?;
            Ok(Box::new(move |record: &T| !inner(record)))
        }
    }
}

fn compile_comparison<T: Record>(
    path: &str,
    op: ComparisonOp,
    value_lexeme: &str,
) -> Result<Predicate<T>, FilterError> {
    let resolved = introspection::resolve_path::<T>(path)?;

    if op.is_string_only() {
        let func = match op {
            ComparisonOp::Contains => StringFn::Contains,
            ComparisonOp::StartsWith => StringFn::StartsWith,
            ComparisonOp::EndsWith => StringFn::EndsWith,
            _ => unreachable!("is_string_only guarantees one of the three"),
        };
        return compile_string_predicate(resolved, path, func, value_lexeme);
    }

    let constant = coerce::coerce(value_lexeme, resolved.value_type, resolved.nullable, path)?;

    tracing::trace!(path, ?op, "compiled comparison");
    Ok(Box::new(move |record: &T| {
        let actual = read_path(record, &resolved);
        evaluate_comparison(&actual, &constant, op)
    }))
}

/// A `Function` node always carries exactly two arguments, the property
/// path and the literal, in that order (the parser enforces this, but a
/// caller may hand-build a tree that doesn't). Raised as the same error a
/// malformed parse would produce, rather than indexing blindly.
fn require_two_args<'a>(
    func_name: &str,
    arg_lexemes: &'a [String],
) -> Result<[&'a str; 2], FilterError> {
    match arg_lexemes {
        [path, value_lexeme] => Ok([path.as_str(), value_lexeme.as_str()]),
        other => Err(FilterError::invalid_syntax(
            format!("{func_name}({})", other.join(", ")),
            0,
        )),
    }
}

fn compile_string_predicate<T: Record>(
    resolved: Arc<ResolvedPath>,
    path: &str,
    func: StringFn,
    value_lexeme: &str,
) -> Result<Predicate<T>, FilterError> {
    if resolved.value_type != ValueType::String {
        return Err(FilterError::type_mismatch(
            func_name(func),
            path,
            resolved.value_type.to_string(),
        ));
    }
    let needle = match coerce::coerce(value_lexeme, ValueType::String, false, path)? {
        Value::String(s) => s,
        _ => unreachable!("coercing to ValueType::String always yields Value::String"),
    };

    tracing::trace!(path, ?func, "compiled guarded string predicate");
    Ok(Box::new(move |record: &T| {
        // Guarded: an absent string never matches a substring predicate.
        match read_path(record, &resolved) {
            Value::String(haystack) => apply_string_fn(func, &haystack, &needle),
            _ => false,
        }
    }))
}

fn compile_string_fn<T: Record>(
    path: &str,
    func: StringFn,
    value_lexeme: &str,
) -> Result<Predicate<T>, FilterError> {
    let resolved = introspection::resolve_path::<T>(path)?;
    compile_string_predicate(resolved, path, func, value_lexeme)
}

fn func_name(func: StringFn) -> &'static str {
    match func {
        StringFn::Contains => "contains",
        StringFn::StartsWith => "startswith",
        StringFn::EndsWith => "endswith",
    }
}

fn apply_string_fn(func: StringFn, haystack: &str, needle: &str) -> bool {
    match func {
        StringFn::Contains => haystack.contains(needle),
        StringFn::StartsWith => haystack.starts_with(needle),
        StringFn::EndsWith => haystack.ends_with(needle),
    }
}

/// Reads the value at the end of a resolved path off one record instance,
/// descending through nested shapes via [`crate::shape::RecordDyn`]. An
/// absent intermediate nested field makes everything downstream read as
/// null, matching the nullability already folded into `path` at resolve
/// time.
pub(crate) fn read_path<T: Record>(record: &T, path: &ResolvedPath) -> Value {
    let mut segments = path.descriptors.iter();
    let first = segments
        .next()
        .expect("resolved path always has at least one segment");

    let mut access = record.field(first.name);
    for descriptor in segments {
        access = match access {
            FieldAccess::Scalar(value) => return value,
            FieldAccess::NestedAbsent => return Value::Null,
            FieldAccess::Nested(nested) => nested.field_dyn(descriptor.name),
        };
    }

    match access {
        FieldAccess::Scalar(value) => value,
        FieldAccess::NestedAbsent => Value::Null,
        FieldAccess::Nested(_) => {
            unreachable!("introspection rejects a nested field as a path's final segment")
        }
    }
}

/// `eq`/`ne` treat two nulls as equal to each other and a null as unequal to
/// anything else; `gt`/`ge`/`lt`/`le` are never satisfied when either side
/// is null (there is no ordering relationship to a missing value).
fn evaluate_comparison(actual: &Value, constant: &Value, op: ComparisonOp) -> bool {
    match op {
        ComparisonOp::Eq => actual == constant,
        ComparisonOp::Ne => actual != constant,
        ComparisonOp::Gt | ComparisonOp::Ge | ComparisonOp::Lt | ComparisonOp::Le => {
            if actual.is_null() || constant.is_null() {
                return false;
            }
            match actual.partial_cmp(constant) {
                Some(ordering) => match op {
                    ComparisonOp::Gt => ordering.is_gt(),
                    ComparisonOp::Ge => ordering.is_ge(),
                    ComparisonOp::Lt => ordering.is_lt(),
                    ComparisonOp::Le => ordering.is_le(),
                    _ => unreachable!(),
                },
                None => false,
            }
        }
        ComparisonOp::Contains | ComparisonOp::StartsWith | ComparisonOp::EndsWith => {
            unreachable!("string-only operators are compiled via compile_string_predicate")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::value::{Value, ValueType};

    struct Person {
        first_name: String,
        age: i32,
        nickname: Option<String>,
    }

    crate::record_shape! {
        Person : "Person" {
            field("FirstName", ValueType::String, false, |r: &Person| Value::String(r.first_name.clone())),
            field("Age", ValueType::I32, false, |r: &Person| Value::I32(r.age)),
            field("Nickname", ValueType::String, true, |r: &Person| match &r.nickname {
                Some(n) => Value::String(n.clone()),
                None => Value::Null,
            }),
        }
    }

    fn person(name: &str, age: i32) -> Person {
        Person {
            first_name: name.to_string(),
            age,
            nickname: None,
        }
    }

    fn compile_str(src: &str) -> Predicate<Person> {
        let expr = parser::parse(src).unwrap();
        compile::<Person>(&expr).unwrap()
    }

    #[test]
    fn simple_eq() {
        let pred = compile_str("Age eq 30");
        assert!(pred(&person("John", 30)));
        assert!(!pred(&person("Jane", 25)));
    }

    #[test]
    fn and_short_circuits_left_to_right() {
        let pred = compile_str("FirstName startswith 'J' and Age gt 25");
        assert!(pred(&person("John", 30)));
        assert!(!pred(&person("Jane", 20)));
        assert!(!pred(&person("Bob", 40)));
    }

    #[test]
    fn not_negates_child() {
        let pred = compile_str("not contains(FirstName, 'oh')");
        assert!(!pred(&person("John", 30)));
        assert!(pred(&person("Jane", 25)));
    }

    #[test]
    fn de_morgan_equivalence() {
        let a = compile_str("not (FirstName eq 'John' and Age eq 30)");
        let b = compile_str("(not FirstName eq 'John') or (not Age eq 30)");
        for (name, age) in [("John", 30), ("John", 25), ("Jane", 30), ("Jane", 25)] {
            assert_eq!(a(&person(name, age)), b(&person(name, age)));
        }
    }

    #[test]
    fn string_predicate_on_null_field_is_false_not_a_crash() {
        let pred = compile_str("contains(Nickname, 'ohn')");
        assert!(!pred(&person("John", 30)));
    }

    #[test]
    fn string_operator_on_non_string_field_is_type_mismatch() {
        let expr = parser::parse("Age startswith '3'").unwrap();
        let err = compile::<Person>(&expr).unwrap_err();
        assert!(matches!(err, FilterError::TypeMismatch { .. }));
    }

    #[test]
    fn unknown_property_is_caught_at_compile_time() {
        let expr = parser::parse("Nope eq 1").unwrap();
        let err = compile::<Person>(&expr).unwrap_err();
        assert!(matches!(err, FilterError::PropertyNotFound { .. }));
    }
}
