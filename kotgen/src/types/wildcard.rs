//! Wildcard (projection) type names.

use std::fmt;

use crate::code::CodeWriter;
use crate::error::Result;
use crate::spec::AnnotationSpec;
use crate::types::{Tags, TypeName, builtins};

/// A type projection: `out CharSequence`, `in String`, or the star
/// projection `*` (shorthand for `out Any?`).
///
/// ```
/// use kotgen::{WildcardTypeName, builtins};
///
/// let star = WildcardTypeName::producer_of(builtins::nullable_any());
/// assert_eq!(star.to_string(), "*");
///
/// let consumer = WildcardTypeName::consumer_of(builtins::string());
/// assert_eq!(consumer.to_string(), "in kotlin.String");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardTypeName {
    out_types: Vec<TypeName>,
    in_types: Vec<TypeName>,
    nullable: bool,
    annotations: Vec<AnnotationSpec>,
    tags: Tags,
}

impl WildcardTypeName {
    fn of(out_types: Vec<TypeName>, in_types: Vec<TypeName>) -> Self {
        assert!(
            out_types.len() == 1,
            "unexpected out types: {out_types:?}"
        );
        Self {
            out_types,
            in_types,
            nullable: false,
            annotations: Vec::new(),
            tags: Tags::new(),
        }
    }

    /// An unknown type that produces `out_type`: `out CharSequence`, or
    /// `*` when `out_type` is `Any?`.
    pub fn producer_of(out_type: impl Into<TypeName>) -> Self {
        Self::of(vec![out_type.into()], Vec::new())
    }

    /// An unknown type that consumes `in_type`: `in String`.
    pub fn consumer_of(in_type: impl Into<TypeName>) -> Self {
        Self::of(vec![builtins::any().into()], vec![in_type.into()])
    }

    /// The producer bound. Always exactly one element.
    pub fn out_types(&self) -> &[TypeName] {
        &self.out_types
    }

    /// The consumer bound; empty for producer wildcards.
    pub fn in_types(&self) -> &[TypeName] {
        &self.in_types
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

    pub fn with_nullable(&self, nullable: bool) -> WildcardTypeName {
        let mut copy = self.clone();
        copy.nullable = nullable;
        copy
    }

    pub fn with_annotations(&self, annotations: Vec<AnnotationSpec>) -> WildcardTypeName {
        let mut copy = self.clone();
        copy.annotations = annotations;
        copy
    }

    pub fn with_tags(&self, tags: Tags) -> WildcardTypeName {
        let mut copy = self.clone();
        copy.tags = tags;
        copy
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        if self.in_types.len() == 1 {
            out.emit("in ")?;
            out.emit_type(&self.in_types[0])
        } else if self.out_types == [builtins::nullable_any()] {
            out.emit("*")
        } else {
            out.emit("out ")?;
            out.emit_type(&self.out_types[0])
        }
    }
}

impl fmt::Display for WildcardTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeName::Wildcard(self.clone()).fmt(f)
    }
}
