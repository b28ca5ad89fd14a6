//! The closed set of host scalar types a record field can declare, and the
//! runtime values the coercer and compiler pass around.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate};
use uuid::Uuid;

/// The declared type of a field, as reported by a [`crate::shape::FieldDescriptor`].
///
/// `nullable` is tracked on the descriptor itself, not here, since two
/// fields of the same `ValueType` may differ in nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    F64,
    Decimal,
    Uuid,
    Date,
    DateTimeOffset,
    String,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Bool => "bool",
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::U8 => "u8",
            ValueType::F64 => "f64",
            ValueType::Decimal => "decimal",
            ValueType::Uuid => "uuid",
            ValueType::Date => "date",
            ValueType::DateTimeOffset => "datetime",
            ValueType::String => "string",
        };
        f.write_str(name)
    }
}

/// A coerced scalar value: either the result of parsing a literal, or a
/// value read out of a record via a [`crate::shape::FieldDescriptor`] accessor.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    F64(f64),
    Decimal(BigDecimal),
    Uuid(Uuid),
    Date(NaiveDate),
    DateTimeOffset(DateTime<FixedOffset>),
    String(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn value_type(&self) -> Option<ValueType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(ValueType::Bool),
            Value::I8(_) => Some(ValueType::I8),
            Value::I16(_) => Some(ValueType::I16),
            Value::I32(_) => Some(ValueType::I32),
            Value::I64(_) => Some(ValueType::I64),
            Value::U8(_) => Some(ValueType::U8),
            Value::F64(_) => Some(ValueType::F64),
            Value::Decimal(_) => Some(ValueType::Decimal),
            Value::Uuid(_) => Some(ValueType::Uuid),
            Value::Date(_) => Some(ValueType::Date),
            Value::DateTimeOffset(_) => Some(ValueType::DateTimeOffset),
            Value::String(_) => Some(ValueType::String),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTimeOffset(a), Value::DateTimeOffset(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Null, Value::Null) => Some(std::cmp::Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::I8(a), Value::I8(b)) => a.partial_cmp(b),
            (Value::I16(a), Value::I16(b)) => a.partial_cmp(b),
            (Value::I32(a), Value::I32(b)) => a.partial_cmp(b),
            (Value::I64(a), Value::I64(b)) => a.partial_cmp(b),
            (Value::U8(a), Value::U8(b)) => a.partial_cmp(b),
            (Value::F64(a), Value::F64(b)) => a.partial_cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.partial_cmp(b),
            (Value::Uuid(a), Value::Uuid(b)) => a.partial_cmp(b),
            (Value::Date(a), Value::Date(b)) => a.partial_cmp(b),
            (Value::DateTimeOffset(a), Value::DateTimeOffset(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}
