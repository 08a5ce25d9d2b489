//! Light declaration collaborators consumed by the emission engine.
//!
//! These are deliberately small: the engine only needs enough of an
//! annotation to decorate a type name, and enough of a parameter to
//! describe a lambda shape. Full declaration builders (functions,
//! properties, classes) live outside this crate and feed the engine
//! through [`CodeBlock`]s.

use std::fmt;

use crate::code::{CodeBlock, CodeWriter};
use crate::error::Result;
use crate::types::{ClassName, TypeName};

/// An annotation applied to a type or declaration, like
/// `@Suppress("DEPRECATION")`.
///
/// ```
/// use kotgen::{AnnotationSpec, Arg, ClassName, CodeBlock};
///
/// let suppress = AnnotationSpec::new(ClassName::new("kotlin", ["Suppress"]))
///     .add_member(CodeBlock::of("%S", [Arg::string("DEPRECATION")]));
/// assert_eq!(suppress.to_string(), "@kotlin.Suppress(\"DEPRECATION\")");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnnotationSpec {
    type_name: TypeName,
    members: Vec<CodeBlock>,
}

impl AnnotationSpec {
    pub fn new(type_name: impl Into<TypeName>) -> Self {
        Self {
            type_name: type_name.into(),
            members: Vec::new(),
        }
    }

    /// Adds an argument, itself a code block so references inside it
    /// participate in import resolution.
    pub fn add_member(mut self, member: CodeBlock) -> Self {
        self.members.push(member);
        self
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    pub fn members(&self) -> &[CodeBlock] {
        &self.members
    }

    /// `inline` renders members on one line; otherwise each member gets
    /// its own indented line. `as_parameter` drops the `@` for
    /// annotations nested as arguments of other annotations.
    pub(crate) fn emit(
        &self,
        out: &mut CodeWriter<'_>,
        inline: bool,
        as_parameter: bool,
    ) -> Result<()> {
        if !as_parameter {
            out.emit("@")?;
        }
        self.type_name.emit(out)?;
        if self.members.is_empty() {
            return Ok(());
        }
        let whitespace = if inline { "" } else { "\n" };
        let member_separator = if inline { ", " } else { ",\n" };
        out.emit("(")?;
        if self.members.len() > 1 {
            out.emit(whitespace)?;
            if !inline {
                out.indent(1);
            }
        }
        for (index, member) in self.members.iter().enumerate() {
            if index > 0 {
                out.emit(member_separator)?;
            }
            out.emit_code_in_context(member, true, false)?;
        }
        if self.members.len() > 1 {
            if !inline {
                out.unindent(1);
            }
            out.emit(whitespace)?;
        }
        out.emit(")")?;
        Ok(())
    }
}

impl fmt::Display for AnnotationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = CodeWriter::unbounded(f);
        self.emit(&mut out, true, false).map_err(|_| fmt::Error)?;
        out.close().map_err(|_| fmt::Error)
    }
}

impl From<ClassName> for AnnotationSpec {
    fn from(value: ClassName) -> Self {
        AnnotationSpec::new(value)
    }
}

/// A parameter of a function type.
///
/// In this crate parameters act as positional shape descriptors for
/// [`LambdaTypeName`](crate::LambdaTypeName); the annotation, modifier,
/// and default-value fields exist so lambda construction can reject
/// parameters that carry them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterSpec {
    name: String,
    ty: TypeName,
    annotations: Vec<AnnotationSpec>,
    modifiers: Vec<String>,
    default_value: Option<CodeBlock>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            annotations: Vec::new(),
            modifiers: Vec::new(),
            default_value: None,
        }
    }

    /// A parameter with no name, rendered as its type alone.
    pub fn unnamed(ty: impl Into<TypeName>) -> Self {
        Self::new("", ty)
    }

    pub fn with_annotations(mut self, annotations: Vec<AnnotationSpec>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_modifiers(
        mut self,
        modifiers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_value(mut self, default_value: CodeBlock) -> Self {
        self.default_value = Some(default_value);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeName {
        &self.ty
    }

    pub fn annotations(&self) -> &[AnnotationSpec] {
        &self.annotations
    }

    pub fn modifiers(&self) -> &[String] {
        &self.modifiers
    }

    pub fn default_value(&self) -> Option<&CodeBlock> {
        self.default_value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Arg;
    use crate::types::builtins;

    #[test]
    fn annotation_without_members() {
        let deprecated = AnnotationSpec::new(ClassName::new("kotlin", ["Deprecated"]));
        assert_eq!(deprecated.to_string(), "@kotlin.Deprecated");
    }

    #[test]
    fn annotation_members_render_inline() {
        let suppress = AnnotationSpec::new(ClassName::new("kotlin", ["Suppress"]))
            .add_member(CodeBlock::of("%S", [Arg::string("UNCHECKED_CAST")]))
            .add_member(CodeBlock::of("%S", [Arg::string("DEPRECATION")]));
        assert_eq!(
            suppress.to_string(),
            "@kotlin.Suppress(\"UNCHECKED_CAST\", \"DEPRECATION\")"
        );
    }

    #[test]
    fn annotation_members_are_constant_context() {
        // A multi-line string in an annotation argument must not become
        // a raw string: raw strings aren't constant expressions.
        let header = AnnotationSpec::new(ClassName::new("com.example", ["Header"]))
            .add_member(CodeBlock::of("%S", [Arg::string("line1\nline2")]));
        assert_eq!(
            header.to_string(),
            "@com.example.Header(\"line1\\nline2\")"
        );
    }

    #[test]
    fn annotated_types_render_their_annotations() {
        let annotated = TypeName::from(builtins::string()).with_annotations(vec![
            AnnotationSpec::new(ClassName::new("com.example", ["Tagged"])),
        ]);
        assert_eq!(
            annotated.to_string(),
            "@com.example.Tagged kotlin.String"
        );
    }
}
