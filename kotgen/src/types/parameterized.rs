//! Parameterized (generic) type names.

use std::fmt;

use crate::code::CodeWriter;
use crate::error::Result;
use crate::spec::AnnotationSpec;
use crate::types::{ClassName, Tags, TypeName};

/// A type with type arguments applied, like `List<String>`, possibly
/// nested inside another parameterized type, like
/// `Outer<Int>.Inner<String>`.
///
/// ```
/// use kotgen::{ClassName, builtins};
///
/// let list_of_strings = builtins::list()
///     .parameterized_by([builtins::string().into()]);
/// assert_eq!(
///     list_of_strings.to_string(),
///     "kotlin.collections.List<kotlin.String>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterizedTypeName {
    enclosing_type: Option<Box<TypeName>>,
    raw_type: ClassName,
    type_arguments: Vec<TypeName>,
    nullable: bool,
    annotations: Vec<AnnotationSpec>,
    tags: Tags,
}

impl ParameterizedTypeName {
    /// # Panics
    ///
    /// Panics when `type_arguments` is empty and there is no enclosing
    /// type: `Foo<>` is not a type.
    pub(crate) fn of(
        enclosing_type: Option<TypeName>,
        raw_type: ClassName,
        type_arguments: Vec<TypeName>,
    ) -> Self {
        assert!(
            !type_arguments.is_empty() || enclosing_type.is_some(),
            "no type arguments: {}",
            raw_type.canonical_name()
        );
        Self {
            enclosing_type: enclosing_type.map(Box::new),
            raw_type,
            type_arguments,
            nullable: false,
            annotations: Vec::new(),
            tags: Tags::new(),
        }
    }

    pub fn raw_type(&self) -> &ClassName {
        &self.raw_type
    }

    pub fn type_arguments(&self) -> &[TypeName] {
        &self.type_arguments
    }

    /// Returns `name` nested inside this type, with its own
    /// `type_arguments`: `Outer<Int>.Inner<String>`.
    pub fn nested_class(
        &self,
        name: impl Into<String>,
        type_arguments: impl IntoIterator<Item = TypeName>,
    ) -> ParameterizedTypeName {
        Self::of(
            Some(self.clone().into()),
            self.raw_type.nested_class(name),
            type_arguments.into_iter().collect(),
        )
    }

    /// Returns a copy with one more type argument appended.
    pub fn plus_parameter(&self, type_argument: impl Into<TypeName>) -> ParameterizedTypeName {
        let mut type_arguments = self.type_arguments.clone();
        type_arguments.push(type_argument.into());
        self.with_type_arguments(type_arguments)
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        &self.annotations
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn with_nullable(&self, nullable: bool) -> ParameterizedTypeName {
        let mut copy = self.clone();
        copy.nullable = nullable;
        copy
    }

    pub fn with_annotations(&self, annotations: Vec<AnnotationSpec>) -> ParameterizedTypeName {
        let mut copy = self.clone();
        copy.annotations = annotations;
        copy
    }

    pub fn with_tags(&self, tags: Tags) -> ParameterizedTypeName {
        let mut copy = self.clone();
        copy.tags = tags;
        copy
    }

    /// Returns a copy with the type arguments replaced.
    ///
    /// # Panics
    ///
    /// Panics when `type_arguments` is empty and there is no enclosing
    /// type.
    pub fn with_type_arguments(&self, type_arguments: Vec<TypeName>) -> ParameterizedTypeName {
        assert!(
            !type_arguments.is_empty() || self.enclosing_type.is_some(),
            "no type arguments: {}",
            self.raw_type.canonical_name()
        );
        let mut copy = self.clone();
        copy.type_arguments = type_arguments;
        copy
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        if let Some(enclosing) = &self.enclosing_type {
            // Nested generics render as Enclosing<...>.Inner<...>: the
            // raw type contributes only its simple name.
            enclosing.emit_annotations(out)?;
            enclosing.emit(out)?;
            out.emit(".")?;
            out.emit(self.raw_type.simple_name())?;
        } else {
            self.raw_type.emit_annotations(out)?;
            self.raw_type.emit(out)?;
        }
        if !self.type_arguments.is_empty() {
            out.emit("<")?;
            for (index, parameter) in self.type_arguments.iter().enumerate() {
                if index > 0 {
                    out.emit(",·")?;
                }
                parameter.emit_annotations(out)?;
                parameter.emit(out)?;
                parameter.emit_nullable(out)?;
            }
            out.emit(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for ParameterizedTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeName::Parameterized(self.clone()).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::builtins;

    #[test]
    fn arguments_render_with_nullability() {
        let map = builtins::map().parameterized_by([
            builtins::string().into(),
            TypeName::from(builtins::int()).with_nullable(true),
        ]);
        // The argument separator's non-breaking space renders as a
        // plain space.
        assert_eq!(
            map.to_string(),
            "kotlin.collections.Map<kotlin.String, kotlin.Int?>"
        );
    }

    #[test]
    fn nested_generics_use_the_simple_name() {
        let outer = ClassName::new("com.example", ["Outer"])
            .parameterized_by([builtins::int().into()]);
        let inner = outer.nested_class("Inner", [builtins::string().into()]);
        assert_eq!(
            inner.to_string(),
            "com.example.Outer<kotlin.Int>.Inner<kotlin.String>"
        );
    }

    #[test]
    fn nested_type_may_have_no_arguments_of_its_own() {
        let outer = ClassName::new("com.example", ["Outer"])
            .parameterized_by([builtins::int().into()]);
        let inner = outer.nested_class("Inner", []);
        assert_eq!(inner.to_string(), "com.example.Outer<kotlin.Int>.Inner");
    }

    #[test]
    #[should_panic(expected = "no type arguments: com.example.Foo")]
    fn top_level_type_requires_arguments() {
        ClassName::new("com.example", ["Foo"]).parameterized_by([]);
    }

    #[test]
    fn plus_parameter_appends() {
        let pair = ClassName::new("kotlin", ["Pair"])
            .parameterized_by([builtins::int().into()])
            .plus_parameter(builtins::string());
        assert_eq!(pair.to_string(), "kotlin.Pair<kotlin.Int, kotlin.String>");
    }
}
