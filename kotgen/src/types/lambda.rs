//! Function (lambda) type names.

use std::fmt;

use kotgen_core::escape::escape_if_necessary;

use crate::code::CodeWriter;
use crate::error::Result;
use crate::spec::{AnnotationSpec, ParameterSpec};
use crate::types::{Tags, TypeName, builtins};

/// A function type like `(String, Int) -> Unit`, optionally suspending
/// and optionally with a receiver.
///
/// ```
/// use kotgen::{LambdaTypeName, ParameterSpec, builtins};
///
/// let callback = LambdaTypeName::new(
///     vec![ParameterSpec::unnamed(builtins::string())],
///     builtins::unit().into(),
/// );
/// assert_eq!(callback.to_string(), "(kotlin.String) -> kotlin.Unit");
/// ```
///
/// Parameters here are purely positional shape descriptors: they may be
/// named, but must carry no annotations, no modifiers, and no default
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LambdaTypeName {
    receiver: Option<Box<TypeName>>,
    parameters: Vec<ParameterSpec>,
    return_type: Box<TypeName>,
    suspending: bool,
    nullable: bool,
    annotations: Vec<AnnotationSpec>,
    tags: Tags,
}

impl LambdaTypeName {
    /// A function type with the given parameters and return type.
    ///
    /// # Panics
    ///
    /// Panics if any parameter carries annotations, modifiers, or a
    /// default value.
    pub fn new(parameters: Vec<ParameterSpec>, return_type: TypeName) -> Self {
        for parameter in &parameters {
            assert!(
                parameter.annotations().is_empty(),
                "parameters with annotations are not allowed"
            );
            assert!(
                parameter.modifiers().is_empty(),
                "parameters with modifiers are not allowed"
            );
            assert!(
                parameter.default_value().is_none(),
                "parameters with default values are not allowed"
            );
        }
        Self {
            receiver: None,
            parameters,
            return_type: Box::new(return_type),
            suspending: false,
            nullable: false,
            annotations: Vec::new(),
            tags: Tags::new(),
        }
    }

    /// A parameterless function type returning `Unit`: `() -> Unit`.
    pub fn unit() -> Self {
        Self::new(Vec::new(), builtins::unit().into())
    }

    pub fn receiver(&self) -> Option<&TypeName> {
        self.receiver.as_deref()
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn return_type(&self) -> &TypeName {
        &self.return_type
    }

    pub fn is_suspending(&self) -> bool {
        self.suspending
    }

    /// Returns a copy with a receiver: `String.(Int) -> Unit`.
    pub fn with_receiver(&self, receiver: impl Into<TypeName>) -> LambdaTypeName {
        let mut copy = self.clone();
        copy.receiver = Some(Box::new(receiver.into()));
        copy
    }

    /// Returns a copy with the `suspend` marker replaced.
    pub fn with_suspending(&self, suspending: bool) -> LambdaTypeName {
        let mut copy = self.clone();
        copy.suspending = suspending;
        copy
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

    pub fn with_nullable(&self, nullable: bool) -> LambdaTypeName {
        let mut copy = self.clone();
        copy.nullable = nullable;
        copy
    }

    pub fn with_annotations(&self, annotations: Vec<AnnotationSpec>) -> LambdaTypeName {
        let mut copy = self.clone();
        copy.annotations = annotations;
        copy
    }

    pub fn with_tags(&self, tags: Tags) -> LambdaTypeName {
        let mut copy = self.clone();
        copy.tags = tags;
        copy
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        // A nullable function type must be parenthesized as a whole:
        // ((Int) -> Unit)?
        if self.nullable {
            out.emit("(")?;
        }
        if self.suspending {
            out.emit("suspend ")?;
        }
        if let Some(receiver) = &self.receiver {
            // A lambda or annotated receiver is ambiguous unparenthesized.
            let parenthesize =
                matches!(**receiver, TypeName::Lambda(_)) || receiver.is_annotated();
            if parenthesize {
                out.emit("(")?;
                out.emit_type(receiver)?;
                out.emit(")")?;
            } else {
                out.emit_type(receiver)?;
            }
            out.emit(".")?;
        }
        out.emit("(")?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                out.emit(",·")?;
            }
            if !parameter.name().is_empty() {
                out.emit(&escape_if_necessary(parameter.name()))?;
                out.emit(":·")?;
            }
            out.emit_type(parameter.ty())?;
        }
        out.emit(")")?;
        if matches!(*self.return_type, TypeName::Lambda(_)) {
            out.emit(" -> (")?;
            out.emit_type(&self.return_type)?;
            out.emit(")")?;
        } else {
            out.emit(" -> ")?;
            out.emit_type(&self.return_type)?;
        }
        if self.nullable {
            out.emit(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for LambdaTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeName::Lambda(self.clone()).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeBlock;

    #[test]
    fn parameterless_unit_lambda() {
        assert_eq!(LambdaTypeName::unit().to_string(), "() -> kotlin.Unit");
    }

    #[test]
    fn named_parameters_render_with_types() {
        let lambda = LambdaTypeName::new(
            vec![
                ParameterSpec::new("name", builtins::string()),
                ParameterSpec::new("age", builtins::int()),
            ],
            builtins::unit().into(),
        );
        assert_eq!(
            lambda.to_string(),
            "(name: kotlin.String, age: kotlin.Int) -> kotlin.Unit"
        );
    }

    #[test]
    fn nullable_lambda_is_parenthesized() {
        let lambda = LambdaTypeName::unit().with_nullable(true);
        assert_eq!(lambda.to_string(), "(() -> kotlin.Unit)?");
    }

    #[test]
    fn suspending_lambda_has_the_keyword() {
        let lambda = LambdaTypeName::unit().with_suspending(true);
        assert_eq!(lambda.to_string(), "suspend () -> kotlin.Unit");
    }

    #[test]
    fn receiver_prefixes_the_parameter_list() {
        let lambda = LambdaTypeName::new(vec![], builtins::unit().into())
            .with_receiver(builtins::int());
        assert_eq!(lambda.to_string(), "kotlin.Int.() -> kotlin.Unit");
    }

    #[test]
    fn lambda_receiver_is_parenthesized() {
        let lambda = LambdaTypeName::unit().with_receiver(LambdaTypeName::unit());
        assert_eq!(
            lambda.to_string(),
            "(() -> kotlin.Unit).() -> kotlin.Unit"
        );
    }

    #[test]
    fn lambda_return_type_is_parenthesized() {
        let lambda = LambdaTypeName::new(vec![], LambdaTypeName::unit().into());
        assert_eq!(lambda.to_string(), "() -> (() -> kotlin.Unit)");
    }

    #[test]
    #[should_panic(expected = "default values are not allowed")]
    fn parameters_must_not_carry_defaults() {
        let parameter = ParameterSpec::new("age", builtins::int())
            .with_default_value(CodeBlock::of("0", []));
        LambdaTypeName::new(vec![parameter], builtins::unit().into());
    }
}
