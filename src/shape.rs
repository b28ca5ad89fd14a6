//! Runtime introspection over record shapes.
//!
//! A "shape" is whatever Rust type the embedding application filters or
//! orders: a struct implementing [`Record`]. This module only describes
//! *what fields a shape has* (name, declared type, nullability, and how to
//! read a field off an instance); it has no dependency on the tokenizer or
//! parser, deliberately, to keep the introspection layer reusable and the
//! parser a pure consumer of it rather than the other way round.
//!
//! Shapes are declared with the [`record_shape!`] macro, which keeps the
//! static descriptor table and the runtime field dispatch in lock-step so
//! they cannot drift apart.

use crate::value::{Value, ValueType};

/// One field of a record shape.
///
/// Carries everything the introspection cache needs to resolve a path
/// segment and everything the compiler needs to know about the leaf type
/// without touching a concrete record instance.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub nullable: bool,
    pub kind: FieldKind,
}

/// Whether a field is a terminal scalar or a nested record to descend into.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Scalar(ValueType),
    /// `(descriptors of the nested shape, shape_name of the nested shape)`
    Nested(fn() -> &'static [FieldDescriptor], fn() -> &'static str),
}

/// The value read off one field of one record instance.
pub enum FieldAccess<'a> {
    Scalar(Value),
    Nested(&'a dyn RecordDyn),
    /// The nested record was itself absent (a `None` in a nullable nested
    /// field); every further segment along the path reads as null.
    NestedAbsent,
}

/// A concrete record type whose fields can be resolved and read by name.
///
/// Implement via [`record_shape!`] rather than by hand.
pub trait Record: 'static {
    fn shape_name() -> &'static str
    where
        Self: Sized;

    fn descriptors() -> &'static [FieldDescriptor]
    where
        Self: Sized;

    fn field(&self, name: &str) -> FieldAccess<'_>;
}

/// Object-safe companion of [`Record`], used to walk across a nested-record
/// boundary without knowing the nested type statically.
pub trait RecordDyn {
    fn field_dyn(&self, name: &str) -> FieldAccess<'_>;
}

impl<T: Record> RecordDyn for T {
    fn field_dyn(&self, name: &str) -> FieldAccess<'_> {
        self.field(name)
    }
}

/// Declares a [`Record`] implementation for a struct: a static descriptor
/// table for introspection plus the matching runtime field dispatch, from a
/// single list of fields so the two cannot drift out of sync.
///
/// ```ignore
/// record_shape! {
///     Person : "Person" {
///         field("FirstName", ValueType::String, false, |r: &Person| Value::String(r.first_name.clone())),
///         field("Age", ValueType::I32, false, |r: &Person| Value::I32(r.age)),
///     }
/// }
/// ```
///
/// List every `field(...)` entry before any `nested(...)` entry.
#[macro_export]
macro_rules! record_shape {
    (
        $ty:ty : $shape_name:literal {
            $( field($name:literal, $vt:expr, $nullable:literal, $accessor:expr) ),* $(,)?
            $( nested($nname:literal, $nnullable:literal, $naccessor:expr, $nested_ty:ty) ),* $(,)?
        }
    ) => {
        impl $crate::shape::Record for $ty {
            fn shape_name() -> &'static str {
                $shape_name
            }

            fn descriptors() -> &'static [$crate::shape::FieldDescriptor] {
                static DESCRIPTORS: &[$crate::shape::FieldDescriptor] = &[
                    $(
                        $crate::shape::FieldDescriptor {
                            name: $name,
                            nullable: $nullable,
                            kind: $crate::shape::FieldKind::Scalar($vt),
                        },
                    )*
                    $(
                        $crate::shape::FieldDescriptor {
                            name: $nname,
                            nullable: $nnullable,
                            kind: $crate::shape::FieldKind::Nested(
                                <$nested_ty as $crate::shape::Record>::descriptors,
                                <$nested_ty as $crate::shape::Record>::shape_name,
                            ),
                        },
                    )*
                ];
                DESCRIPTORS
            }

            fn field(&self, name: &str) -> $crate::shape::FieldAccess<'_> {
                $(
                    if name.eq_ignore_ascii_case($name) {
                        return $crate::shape::FieldAccess::Scalar(($accessor)(self));
                    }
                )*
                $(
                    if name.eq_ignore_ascii_case($nname) {
                        return match ($naccessor)(self) {
                            Some(nested) => $crate::shape::FieldAccess::Nested(nested),
                            None => $crate::shape::FieldAccess::NestedAbsent,
                        };
                    }
                )*
                $crate::shape::FieldAccess::NestedAbsent
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Address {
        city: String,
    }

    record_shape! {
        Address : "Address" {
            field("City", ValueType::String, false, |r: &Address| Value::String(r.city.clone())),
        }
    }

    struct Person {
        first_name: String,
        address: Option<Address>,
    }

    record_shape! {
        Person : "Person" {
            field("FirstName", ValueType::String, false, |r: &Person| Value::String(r.first_name.clone())),
            nested("Address", true, |r: &Person| r.address.as_ref(), Address),
        }
    }

    #[test]
    fn descriptor_lookup_is_case_insensitive() {
        let found = Person::descriptors()
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case("firstname"));
        assert!(found.is_some());
    }

    #[test]
    fn nested_absent_short_circuits() {
        let p = Person {
            first_name: "Jane".to_string(),
            address: None,
        };
        assert!(matches!(p.field("Address"), FieldAccess::NestedAbsent));
    }

    #[test]
    fn nested_present_descends() {
        let p = Person {
            first_name: "Jane".to_string(),
            address: Some(Address {
                city: "Austin".to_string(),
            }),
        };
        match p.field("Address") {
            FieldAccess::Nested(addr) => match addr.field_dyn("City") {
                FieldAccess::Scalar(Value::String(s)) => assert_eq!(s, "Austin"),
                _ => panic!("expected scalar city"),
            },
            _ => panic!("expected nested"),
        }
    }
}
