//! The filter expression tree: a tagged sum of four variants, built by
//! [`crate::parser`] and consumed by [`crate::compiler::filter`].
//!
//! Every walk over this type is an exhaustive match; there is no shared
//! base type or virtual dispatch, only plain data.

/// A comparison operator. The last three double as [`StringFn`] names in
/// prefix call position; both forms compile to identical semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
}

impl ComparisonOp {
    /// Parses a normalized (already-lowercased) operator lexeme.
    pub fn from_lexeme(lower: &str) -> Option<Self> {
        Some(match lower {
            "eq" => ComparisonOp::Eq,
            "ne" => ComparisonOp::Ne,
            "gt" => ComparisonOp::Gt,
            "ge" => ComparisonOp::Ge,
            "lt" => ComparisonOp::Lt,
            "le" => ComparisonOp::Le,
            "contains" => ComparisonOp::Contains,
            "startswith" => ComparisonOp::StartsWith,
            "endswith" => ComparisonOp::EndsWith,
            _ => return None,
        })
    }

    pub fn is_string_only(self) -> bool {
        matches!(
            self,
            ComparisonOp::Contains | ComparisonOp::StartsWith | ComparisonOp::EndsWith
        )
    }
}

/// The three string predicates, in their prefix `fn(arg1, arg2)` call form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFn {
    Contains,
    StartsWith,
    EndsWith,
}

impl StringFn {
    pub fn from_lexeme(lower: &str) -> Option<Self> {
        Some(match lower {
            "contains" => StringFn::Contains,
            "startswith" => StringFn::StartsWith,
            "endswith" => StringFn::EndsWith,
            _ => return None,
        })
    }

    pub fn as_comparison_op(self) -> ComparisonOp {
        match self {
            StringFn::Contains => ComparisonOp::Contains,
            StringFn::StartsWith => ComparisonOp::StartsWith,
            StringFn::EndsWith => ComparisonOp::EndsWith,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// One node of a parsed filter expression.
///
/// `Comparison` covers both infix comparisons (`Age eq 30`) and the infix
/// spelling of the string operators (`Name startswith 'J'`); `Function`
/// covers only the prefix call spelling (`startswith(Name, 'J')`) of the
/// same three operators. The compiler treats both identically.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Comparison {
        path: String,
        op: ComparisonOp,
        value_lexeme: String,
    },
    Function {
        func: StringFn,
        arg_lexemes: Vec<String>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Not {
        inner: Box<Expression>,
    },
}
