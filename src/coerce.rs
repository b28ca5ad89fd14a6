//! Converts a tokenizer-produced lexeme into a host scalar [`Value`], per
//! the target type reported by a resolved property path.
//!
//! Every rule below is culture-invariant: there is no locale concept
//! anywhere in this crate. Rule order matters and mirrors the coercion
//! table exactly, with null/nullability checked first, then booleans,
//! then numbers, then UUID/date, and a general fallback last.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate};
use uuid::Uuid;

use crate::error::FilterError;
use crate::value::{Value, ValueType};

/// Converts `lexeme` to a [`Value`] of `target_type`, honoring `nullable`.
pub fn coerce(
    lexeme: &str,
    target_type: ValueType,
    nullable: bool,
    property: &str,
) -> Result<Value, FilterError> {
    if lexeme.eq_ignore_ascii_case("null") {
        return if nullable {
            Ok(Value::Null)
        } else {
            Err(FilterError::null_not_assignable(property))
        };
    }

    match target_type {
        ValueType::Bool => coerce_bool(lexeme),
        ValueType::I8 => coerce_int(lexeme, target_type, |s| s.parse::<i8>().map(Value::I8)),
        ValueType::I16 => coerce_int(lexeme, target_type, |s| s.parse::<i16>().map(Value::I16)),
        ValueType::I32 => coerce_int(lexeme, target_type, |s| s.parse::<i32>().map(Value::I32)),
        ValueType::I64 => coerce_int(lexeme, target_type, |s| s.parse::<i64>().map(Value::I64)),
        ValueType::U8 => coerce_int(lexeme, target_type, |s| s.parse::<u8>().map(Value::U8)),
        ValueType::F64 => lexeme
            .parse::<f64>()
            .map(Value::F64)
            .map_err(|_| FilterError::coerce_failed(lexeme, target_type.to_string())),
        ValueType::Decimal => BigDecimal::from_str(lexeme)
            .map(Value::Decimal)
            .map_err(|_| FilterError::coerce_failed(lexeme, target_type.to_string())),
        ValueType::Uuid => Uuid::parse_str(lexeme)
            .map(Value::Uuid)
            .map_err(|_| FilterError::coerce_failed(lexeme, target_type.to_string())),
        ValueType::Date => NaiveDate::parse_from_str(lexeme, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| FilterError::coerce_failed(lexeme, target_type.to_string())),
        ValueType::DateTimeOffset => DateTime::parse_from_rfc3339(lexeme)
            .map(Value::DateTimeOffset)
            .map_err(|_| FilterError::coerce_failed(lexeme, target_type.to_string())),
        ValueType::String => Ok(Value::String(lexeme.to_string())),
    }
}

fn coerce_bool(lexeme: &str) -> Result<Value, FilterError> {
    if lexeme.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if lexeme.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(FilterError::coerce_failed(lexeme, ValueType::Bool.to_string()))
    }
}

fn coerce_int(
    lexeme: &str,
    target_type: ValueType,
    parse: impl Fn(&str) -> Result<Value, std::num::ParseIntError>,
) -> Result<Value, FilterError> {
    parse(lexeme).map_err(|_| FilterError::coerce_failed(lexeme, target_type.to_string()))
}
