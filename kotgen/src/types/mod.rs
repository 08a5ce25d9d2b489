//! The type-name model.
//!
//! A [`TypeName`] is any type in Kotlin's type system: simple types like
//! `Int`, nullable types like `Int?`, composite types like
//! `Array<String>`, function types, wildcard projections, and the
//! `dynamic` sentinel. Type names are dumb identifiers only — the name
//! for `kotlin.collections.List` knows nothing about `size()` or even
//! that lists take one type parameter.
//!
//! All variants are immutable value objects with structural equality.
//! The only mutation path is the `with_*` family, which returns a new
//! instance with selected fields replaced.

pub mod builtins;

mod class_name;
mod lambda;
mod member;
mod parameterized;
mod tags;
mod type_variable;
mod wildcard;

use std::fmt;

pub use class_name::ClassName;
pub use lambda::LambdaTypeName;
pub use member::MemberName;
pub use parameterized::ParameterizedTypeName;
pub use tags::Tags;
pub use type_variable::{TypeVariableName, Variance};
pub use wildcard::WildcardTypeName;

use crate::code::CodeWriter;
use crate::error::Result;
use crate::spec::AnnotationSpec;

/// Any type in Kotlin's type system.
///
/// The set of variants is closed: everywhere emission dispatches over a
/// `TypeName` it does so with an exhaustive `match`, so adding a variant
/// forces every consumer to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    Class(ClassName),
    Parameterized(ParameterizedTypeName),
    TypeVariable(TypeVariableName),
    Wildcard(WildcardTypeName),
    Lambda(LambdaTypeName),
    /// The `dynamic` type. A fixed sentinel with no configurable state:
    /// it is never nullable, never annotated, and refuses to be copied.
    Dynamic,
}

impl TypeName {
    /// Whether this type is marked nullable (`T?`).
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeName::Class(c) => c.is_nullable(),
            TypeName::Parameterized(p) => p.is_nullable(),
            TypeName::TypeVariable(t) => t.is_nullable(),
            TypeName::Wildcard(w) => w.is_nullable(),
            TypeName::Lambda(l) => l.is_nullable(),
            TypeName::Dynamic => false,
        }
    }

    /// The annotations applied directly to this type.
    pub fn annotations(&self) -> &[AnnotationSpec] {
        match self {
            TypeName::Class(c) => c.annotations(),
            TypeName::Parameterized(p) => p.annotations(),
            TypeName::TypeVariable(t) => t.annotations(),
            TypeName::Wildcard(w) => w.annotations(),
            TypeName::Lambda(l) => l.annotations(),
            TypeName::Dynamic => &[],
        }
    }

    pub fn is_annotated(&self) -> bool {
        !self.annotations().is_empty()
    }

    /// Returns a copy with the nullability replaced.
    ///
    /// # Panics
    ///
    /// Panics for [`TypeName::Dynamic`], which has no state to vary.
    pub fn with_nullable(&self, nullable: bool) -> TypeName {
        match self {
            TypeName::Class(c) => c.with_nullable(nullable).into(),
            TypeName::Parameterized(p) => p.with_nullable(nullable).into(),
            TypeName::TypeVariable(t) => t.with_nullable(nullable).into(),
            TypeName::Wildcard(w) => w.with_nullable(nullable).into(),
            TypeName::Lambda(l) => l.with_nullable(nullable).into(),
            TypeName::Dynamic => panic!("dynamic doesn't support copying"),
        }
    }

    /// Returns a copy with the annotation list replaced.
    ///
    /// # Panics
    ///
    /// Panics for [`TypeName::Dynamic`], which has no state to vary.
    pub fn with_annotations(&self, annotations: Vec<AnnotationSpec>) -> TypeName {
        match self {
            TypeName::Class(c) => c.with_annotations(annotations).into(),
            TypeName::Parameterized(p) => p.with_annotations(annotations).into(),
            TypeName::TypeVariable(t) => t.with_annotations(annotations).into(),
            TypeName::Wildcard(w) => w.with_annotations(annotations).into(),
            TypeName::Lambda(l) => l.with_annotations(annotations).into(),
            TypeName::Dynamic => panic!("dynamic doesn't support copying"),
        }
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        match self {
            TypeName::Class(c) => c.emit(out),
            TypeName::Parameterized(p) => p.emit(out),
            TypeName::TypeVariable(t) => t.emit(out),
            TypeName::Wildcard(w) => w.emit(out),
            TypeName::Lambda(l) => l.emit(out),
            TypeName::Dynamic => out.emit("dynamic"),
        }
    }

    pub(crate) fn emit_annotations(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        for annotation in self.annotations() {
            annotation.emit(out, true, false)?;
            out.emit(" ")?;
        }
        Ok(())
    }

    pub(crate) fn emit_nullable(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        if self.is_nullable() {
            out.emit("?")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = CodeWriter::unbounded(f);
        self.emit_annotations(&mut out).map_err(|_| fmt::Error)?;
        self.emit(&mut out).map_err(|_| fmt::Error)?;
        self.emit_nullable(&mut out).map_err(|_| fmt::Error)?;
        out.close().map_err(|_| fmt::Error)
    }
}

impl From<ClassName> for TypeName {
    fn from(value: ClassName) -> Self {
        TypeName::Class(value)
    }
}

impl From<ParameterizedTypeName> for TypeName {
    fn from(value: ParameterizedTypeName) -> Self {
        TypeName::Parameterized(value)
    }
}

impl From<TypeVariableName> for TypeName {
    fn from(value: TypeVariableName) -> Self {
        TypeName::TypeVariable(value)
    }
}

impl From<WildcardTypeName> for TypeName {
    fn from(value: WildcardTypeName) -> Self {
        TypeName::Wildcard(value)
    }
}

impl From<LambdaTypeName> for TypeName {
    fn from(value: LambdaTypeName) -> Self {
        TypeName::Lambda(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullability_round_trips() {
        let list = builtins::list().parameterized_by([builtins::string().into()]);
        let original = TypeName::from(list);
        let rendered = original.to_string();
        let round_tripped = original.with_nullable(true).with_nullable(false);
        assert_eq!(round_tripped.to_string(), rendered);
        assert_eq!(round_tripped, original);
    }

    #[test]
    fn nullable_suffix() {
        let string: TypeName = builtins::string().into();
        assert_eq!(string.to_string(), "kotlin.String");
        assert_eq!(string.with_nullable(true).to_string(), "kotlin.String?");
    }

    #[test]
    #[should_panic(expected = "dynamic doesn't support copying")]
    fn dynamic_refuses_to_copy() {
        TypeName::Dynamic.with_nullable(true);
    }

    #[test]
    fn dynamic_renders_its_keyword() {
        assert_eq!(TypeName::Dynamic.to_string(), "dynamic");
        assert!(!TypeName::Dynamic.is_nullable());
    }
}
