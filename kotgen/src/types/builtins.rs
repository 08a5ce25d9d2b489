//! Well-known Kotlin type names.
//!
//! Constructors for the types generated code reaches for constantly.
//! Each call returns a fresh value; type names are cheap clones of a few
//! strings.

use crate::types::{ClassName, TypeName, WildcardTypeName};

pub fn any() -> ClassName {
    ClassName::new("kotlin", ["Any"])
}

/// `Any?` — the implicit bound of unconstrained type variables and the
/// producer bound that collapses a wildcard to `*`.
pub fn nullable_any() -> TypeName {
    TypeName::from(any()).with_nullable(true)
}

pub fn unit() -> ClassName {
    ClassName::new("kotlin", ["Unit"])
}

pub fn nothing() -> ClassName {
    ClassName::new("kotlin", ["Nothing"])
}

pub fn boolean() -> ClassName {
    ClassName::new("kotlin", ["Boolean"])
}

pub fn byte() -> ClassName {
    ClassName::new("kotlin", ["Byte"])
}

pub fn short() -> ClassName {
    ClassName::new("kotlin", ["Short"])
}

pub fn int() -> ClassName {
    ClassName::new("kotlin", ["Int"])
}

pub fn long() -> ClassName {
    ClassName::new("kotlin", ["Long"])
}

pub fn char() -> ClassName {
    ClassName::new("kotlin", ["Char"])
}

pub fn float() -> ClassName {
    ClassName::new("kotlin", ["Float"])
}

pub fn double() -> ClassName {
    ClassName::new("kotlin", ["Double"])
}

pub fn number() -> ClassName {
    ClassName::new("kotlin", ["Number"])
}

pub fn string() -> ClassName {
    ClassName::new("kotlin", ["String"])
}

pub fn char_sequence() -> ClassName {
    ClassName::new("kotlin", ["CharSequence"])
}

pub fn comparable() -> ClassName {
    ClassName::new("kotlin", ["Comparable"])
}

pub fn throwable() -> ClassName {
    ClassName::new("kotlin", ["Throwable"])
}

pub fn array() -> ClassName {
    ClassName::new("kotlin", ["Array"])
}

pub fn iterable() -> ClassName {
    ClassName::new("kotlin.collections", ["Iterable"])
}

pub fn collection() -> ClassName {
    ClassName::new("kotlin.collections", ["Collection"])
}

pub fn list() -> ClassName {
    ClassName::new("kotlin.collections", ["List"])
}

pub fn set() -> ClassName {
    ClassName::new("kotlin.collections", ["Set"])
}

pub fn map() -> ClassName {
    ClassName::new("kotlin.collections", ["Map"])
}

pub fn map_entry() -> ClassName {
    map().nested_class("Entry")
}

pub fn mutable_list() -> ClassName {
    ClassName::new("kotlin.collections", ["MutableList"])
}

pub fn mutable_set() -> ClassName {
    ClassName::new("kotlin.collections", ["MutableSet"])
}

pub fn mutable_map() -> ClassName {
    ClassName::new("kotlin.collections", ["MutableMap"])
}

/// The star projection `*`, shorthand for `out Any?`.
pub fn star() -> WildcardTypeName {
    WildcardTypeName::producer_of(nullable_any())
}
