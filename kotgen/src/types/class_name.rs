//! Fully-qualified class names.

use std::cmp::Ordering;
use std::fmt;

use kotgen_core::escape::escape_segments_if_necessary;

use crate::code::{Arg, CodeBlock, CodeWriter};
use crate::error::Result;
use crate::spec::AnnotationSpec;
use crate::types::{MemberName, ParameterizedTypeName, Tags, TypeName};

/// A fully-qualified class name for top-level and member classes.
///
/// ```
/// use kotgen::ClassName;
///
/// let entry = ClassName::new("kotlin.collections", ["Map", "Entry"]);
/// assert_eq!(entry.canonical_name(), "kotlin.collections.Map.Entry");
/// assert_eq!(entry.simple_name(), "Entry");
/// assert_eq!(
///     entry.enclosing_class_name(),
///     Some(ClassName::new("kotlin.collections", ["Map"]))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassName {
    /// From top to bottom: `["kotlin.collections", "Map", "Entry"]`.
    names: Vec<String>,
    nullable: bool,
    annotations: Vec<AnnotationSpec>,
    tags: Tags,
}

impl ClassName {
    /// Creates a class name from a package and one or more simple names.
    /// An empty package means the default (unnamed) package.
    ///
    /// # Panics
    ///
    /// Panics if `simple_names` is empty or contains an empty segment.
    pub fn new(
        package_name: impl Into<String>,
        simple_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut names = vec![package_name.into()];
        names.extend(simple_names.into_iter().map(Into::into));
        assert!(names.len() >= 2, "simple_names must not be empty");
        assert!(
            names[1..].iter().all(|name| !name.is_empty()),
            "simple_names must not contain empty items: {:?}",
            &names[1..]
        );
        Self::from_names(names)
    }

    pub(crate) fn from_names(names: Vec<String>) -> Self {
        Self {
            names,
            nullable: false,
            annotations: Vec::new(),
            tags: Tags::new(),
        }
    }

    /// Guesses a class name from a fully-qualified name string, assuming
    /// typical style: lowercase package names, UpperCamelCase class
    /// names.
    ///
    /// ```
    /// use kotgen::ClassName;
    ///
    /// let guessed = ClassName::best_guess("kotlin.collections.Map.Entry");
    /// assert_eq!(guessed.package_name(), "kotlin.collections");
    /// assert_eq!(guessed.simple_names(), ["Map", "Entry"]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics when the input doesn't follow that style; prefer
    /// [`ClassName::new`], which carries no such restriction.
    pub fn best_guess(class_name_string: &str) -> Self {
        let mut names = Vec::new();

        // Take the package, like "java.util.concurrent", or "" for none.
        let mut p = 0;
        while p < class_name_string.len()
            && class_name_string[p..].chars().next().is_some_and(char::is_lowercase)
        {
            match class_name_string[p..].find('.') {
                Some(dot) => p += dot + 1,
                None => panic!("couldn't make a guess for {class_name_string}"),
            }
        }
        names.push(if p > 0 {
            class_name_string[..p - 1].to_string()
        } else {
            String::new()
        });

        // Take the class names, like "Map" and "Entry".
        for part in class_name_string[p..].split('.') {
            assert!(
                !part.is_empty() && part.chars().next().is_some_and(char::is_uppercase),
                "couldn't make a guess for {class_name_string}"
            );
            names.push(part.to_string());
        }

        assert!(
            names.len() >= 2,
            "couldn't make a guess for {class_name_string}"
        );
        Self::from_names(names)
    }

    /// Package name, like `"kotlin.collections"` for `Map.Entry`.
    pub fn package_name(&self) -> &str {
        &self.names[0]
    }

    /// Simple name of this class, like `"Entry"` for `Map.Entry`.
    pub fn simple_name(&self) -> &str {
        &self.names[self.names.len() - 1]
    }

    /// The enclosing classes, outermost first, followed by the simple
    /// name: `["Map", "Entry"]` for `Map.Entry`.
    pub fn simple_names(&self) -> &[String] {
        &self.names[1..]
    }

    /// Fully qualified name using `.` as a separator, like
    /// `kotlin.collections.Map.Entry`.
    pub fn canonical_name(&self) -> String {
        if self.names[0].is_empty() {
            self.names[1..].join(".")
        } else {
            self.names.join(".")
        }
    }

    /// Fully qualified name using `.` for the package and `$` for nested
    /// classes, like `kotlin.collections.Map$Entry`.
    pub fn reflection_name(&self) -> String {
        if self.names.len() == 2 {
            return self.canonical_name();
        }
        let mut result = self.top_level_class_name().canonical_name();
        for name in &self.names[2..] {
            result.push('$');
            result.push_str(name);
        }
        result
    }

    /// The enclosing class, like `Map` for `Map.Entry`, or `None` for a
    /// top-level class.
    pub fn enclosing_class_name(&self) -> Option<ClassName> {
        if self.names.len() == 2 {
            None
        } else {
            Some(Self::from_names(self.names[..self.names.len() - 1].to_vec()))
        }
    }

    /// The top class in this nesting group. Equivalent to chained
    /// [`enclosing_class_name`](Self::enclosing_class_name) calls until
    /// the result is top-level.
    pub fn top_level_class_name(&self) -> ClassName {
        Self::from_names(self.names[..2].to_vec())
    }

    /// Returns `name` nested inside this class.
    pub fn nested_class(&self, name: impl Into<String>) -> ClassName {
        let mut names = self.names.clone();
        names.push(name.into());
        Self::from_names(names)
    }

    /// Returns a class that shares this class's enclosing package or
    /// class.
    pub fn peer_class(&self, name: impl Into<String>) -> ClassName {
        let mut names = self.names.clone();
        let last = names.len() - 1;
        names[last] = name.into();
        Self::from_names(names)
    }

    /// A member (function or property) declared on this class.
    pub fn member(&self, simple_name: impl Into<String>) -> MemberName {
        MemberName::in_class(self.clone(), simple_name)
    }

    /// Applies `type_arguments` to this class.
    pub fn parameterized_by(
        &self,
        type_arguments: impl IntoIterator<Item = TypeName>,
    ) -> ParameterizedTypeName {
        ParameterizedTypeName::of(None, self.clone(), type_arguments.into_iter().collect())
    }

    /// Callable reference to the constructor of this class: the
    /// enclosing class followed by `::` and the simple name, or
    /// `::` and the class itself when top-level.
    pub fn constructor_reference(&self) -> CodeBlock {
        match self.enclosing_class_name() {
            Some(enclosing) => CodeBlock::of(
                "%T::%N",
                [Arg::ty(enclosing), Arg::name(self.simple_name())],
            ),
            None => CodeBlock::of("::%T", [Arg::ty(self.clone())]),
        }
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

    pub fn with_nullable(&self, nullable: bool) -> ClassName {
        let mut copy = self.clone();
        copy.nullable = nullable;
        copy
    }

    pub fn with_annotations(&self, annotations: Vec<AnnotationSpec>) -> ClassName {
        let mut copy = self.clone();
        copy.annotations = annotations;
        copy
    }

    pub fn with_tags(&self, tags: Tags) -> ClassName {
        let mut copy = self.clone();
        copy.tags = tags;
        copy
    }

    pub(crate) fn emit_annotations(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        for annotation in &self.annotations {
            annotation.emit(out, true, false)?;
            out.emit(" ")?;
        }
        Ok(())
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        let name = out.lookup_name_class(self);
        out.emit(&escape_segments_if_necessary(&name))
    }
}

/// Orders by fully-qualified name, with nested types immediately after
/// their enclosing type:
///
/// ```text
/// com.example.Robot
/// com.example.Robot.Motor
/// com.example.RoboticVacuum
/// ```
impl Ord for ClassName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.names
            .cmp(&other.names)
            .then_with(|| self.nullable.cmp(&other.nullable))
            .then_with(|| {
                let left: Vec<String> = self.annotations.iter().map(ToString::to_string).collect();
                let right: Vec<String> =
                    other.annotations.iter().map(ToString::to_string).collect();
                left.cmp(&right)
            })
    }
}

impl PartialOrd for ClassName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        TypeName::Class(self.clone()).fmt(f)
    }
}
