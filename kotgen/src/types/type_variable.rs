//! Type variables and their declaration-site metadata.

use std::fmt;

use crate::code::CodeWriter;
use crate::error::Result;
use crate::spec::AnnotationSpec;
use crate::types::{Tags, TypeName, builtins};

/// Declaration-site variance of a type variable. Kotlin only admits `in`
/// and `out`; invariance is the absence of a variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    In,
    Out,
}

impl Variance {
    pub fn keyword(self) -> &'static str {
        match self {
            Variance::In => "in",
            Variance::Out => "out",
        }
    }
}

/// A type variable like `T`, with bounds, optional variance, and an
/// optional `reified` marker.
///
/// Bounds are structural metadata consumed when the variable is
/// *declared* (see [`CodeWriter::emit_type_variables`]); a reference to
/// the variable renders as just its name. An unconstrained variable
/// carries the single implicit bound `Any?`:
///
/// ```
/// use kotgen::{TypeVariableName, builtins};
///
/// let t = TypeVariableName::new("T");
/// assert_eq!(t.bounds(), [builtins::nullable_any()]);
/// assert_eq!(t.to_string(), "T");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariableName {
    name: String,
    bounds: Vec<TypeName>,
    variance: Option<Variance>,
    reified: bool,
    nullable: bool,
    annotations: Vec<AnnotationSpec>,
    tags: Tags,
}

impl TypeVariableName {
    /// A type variable named `name` without explicit bounds.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: vec![builtins::nullable_any()],
            variance: None,
            reified: false,
            nullable: false,
            annotations: Vec::new(),
            tags: Tags::new(),
        }
    }

    /// A type variable named `name` with the given bounds. An empty list
    /// falls back to the implicit `Any?` bound.
    pub fn bounded_by(
        name: impl Into<String>,
        bounds: impl IntoIterator<Item = TypeName>,
    ) -> Self {
        Self::new(name).with_bounds(bounds.into_iter().collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &[TypeName] {
        &self.bounds
    }

    pub fn variance(&self) -> Option<Variance> {
        self.variance
    }

    pub fn is_reified(&self) -> bool {
        self.reified
    }

    pub fn with_variance(&self, variance: Variance) -> TypeVariableName {
        let mut copy = self.clone();
        copy.variance = Some(variance);
        copy
    }

    /// Returns a copy with the bounds replaced. The implicit `Any?`
    /// sentinel is stripped when a real bound accompanies it, and an
    /// empty list falls back to `[Any?]`.
    pub fn with_bounds(&self, bounds: Vec<TypeName>) -> TypeVariableName {
        let mut copy = self.clone();
        copy.bounds = without_implicit_bound(bounds);
        copy
    }

    pub fn with_reified(&self, reified: bool) -> TypeVariableName {
        let mut copy = self.clone();
        copy.reified = reified;
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

    pub fn with_nullable(&self, nullable: bool) -> TypeVariableName {
        let mut copy = self.clone();
        copy.nullable = nullable;
        copy
    }

    pub fn with_annotations(&self, annotations: Vec<AnnotationSpec>) -> TypeVariableName {
        let mut copy = self.clone();
        copy.annotations = annotations;
        copy
    }

    pub fn with_tags(&self, tags: Tags) -> TypeVariableName {
        let mut copy = self.clone();
        copy.tags = tags;
        copy
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        out.emit(&self.name)
    }
}

fn without_implicit_bound(bounds: Vec<TypeName>) -> Vec<TypeName> {
    if bounds.is_empty() {
        return vec![builtins::nullable_any()];
    }
    if bounds.len() == 1 {
        return bounds;
    }
    let nullable_any = builtins::nullable_any();
    let filtered: Vec<TypeName> = bounds
        .into_iter()
        .filter(|bound| *bound != nullable_any)
        .collect();
    if filtered.is_empty() {
        vec![builtins::nullable_any()]
    } else {
        filtered
    }
}

impl fmt::Display for TypeVariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeName::TypeVariable(self.clone()).fmt(f)
    }
}
