//! Error types for the filter/ordering expression pipeline.
//!
//! A single public enum covers every user-visible failure kind. Internal
//! signals raised deep in the tokenizer (e.g. an unterminated string
//! literal) are folded into [`FilterError::InvalidSyntax`] before crossing
//! the public API boundary, so callers only ever need to match on the six
//! kinds below.

use thiserror::Error;

/// Errors raised while parsing or compiling a filter or ordering expression.
///
/// All variants are raised at parse/compile time, never while evaluating a
/// compiled predicate or selector against a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// A dotted property path did not resolve against the bound record shape.
    #[error("property '{segment}' not found on '{shape}'")]
    PropertyNotFound { segment: String, shape: String },

    /// An ordering clause named a direction word other than
    /// `asc`/`ascending`/`desc`/`descending`.
    #[error("invalid sort direction '{word}'")]
    InvalidDirection { word: String },

    /// The token stream did not match the grammar.
    #[error("invalid syntax near '{fragment}' (position {position})")]
    InvalidSyntax { fragment: String, position: usize },

    /// A `null` literal was compared against a non-nullable field.
    #[error("null is not assignable to non-nullable property '{property}'")]
    NullNotAssignable { property: String },

    /// A literal could not be converted to the target scalar type.
    #[error("could not convert '{lexeme}' to {target_type}")]
    CoerceFailed { lexeme: String, target_type: String },

    /// A string-only operator (`contains`/`startswith`/`endswith`) was used
    /// against a non-string property.
    #[error("'{operator}' requires a string property, found {found_type} on '{property}'")]
    TypeMismatch {
        operator: String,
        property: String,
        found_type: String,
    },
}

impl FilterError {
    pub fn property_not_found<S: Into<String>, T: Into<String>>(segment: S, shape: T) -> Self {
        Self::PropertyNotFound {
            segment: segment.into(),
            shape: shape.into(),
        }
    }

    pub fn invalid_direction<S: Into<String>>(word: S) -> Self {
        Self::InvalidDirection { word: word.into() }
    }

    pub fn invalid_syntax<S: Into<String>>(fragment: S, position: usize) -> Self {
        Self::InvalidSyntax {
            fragment: fragment.into(),
            position,
        }
    }

    pub fn null_not_assignable<S: Into<String>>(property: S) -> Self {
        Self::NullNotAssignable {
            property: property.into(),
        }
    }

    pub fn coerce_failed<L: Into<String>, T: Into<String>>(lexeme: L, target_type: T) -> Self {
        Self::CoerceFailed {
            lexeme: lexeme.into(),
            target_type: target_type.into(),
        }
    }

    pub fn type_mismatch<O: Into<String>, P: Into<String>, F: Into<String>>(
        operator: O,
        property: P,
        found_type: F,
    ) -> Self {
        Self::TypeMismatch {
            operator: operator.into(),
            property: property.into(),
            found_type: found_type.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_preserve_offending_fragment_case() {
        let err = FilterError::property_not_found("FirstName", "Person");
        assert_eq!(
            err.to_string(),
            "property 'FirstName' not found on 'Person'"
        );
    }

    #[test]
    fn invalid_direction_names_offending_word() {
        let err = FilterError::invalid_direction("sideways");
        assert_eq!(err.to_string(), "invalid sort direction 'sideways'");
    }
}
