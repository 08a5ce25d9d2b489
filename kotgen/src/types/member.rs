//! References to members (functions and properties).

use std::fmt;

use kotgen_core::escape::escape_segments_if_necessary;

use crate::code::{Arg, CodeBlock, CodeWriter};
use crate::error::Result;
use crate::types::ClassName;

/// A reference to a function or property, importable when top-level or
/// declared inside an object.
///
/// ```
/// use kotgen::MemberName;
///
/// let create = MemberName::new("kotlin.io.path", "createTempDirectory");
/// assert_eq!(create.canonical_name(), "kotlin.io.path.createTempDirectory");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberName {
    package_name: String,
    enclosing_class_name: Option<ClassName>,
    simple_name: String,
    extension: bool,
}

impl MemberName {
    /// A top-level member in `package_name`.
    pub fn new(package_name: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            enclosing_class_name: None,
            simple_name: simple_name.into(),
            extension: false,
        }
    }

    /// A member declared inside `enclosing_class_name`.
    pub fn in_class(
        enclosing_class_name: ClassName,
        simple_name: impl Into<String>,
    ) -> Self {
        Self {
            package_name: enclosing_class_name.package_name().to_string(),
            enclosing_class_name: Some(enclosing_class_name),
            simple_name: simple_name.into(),
            extension: false,
        }
    }

    /// Marks this member as an extension, which may be imported even
    /// when its simple name clashes with a method in scope.
    pub fn with_extension(&self, extension: bool) -> MemberName {
        let mut copy = self.clone();
        copy.extension = extension;
        copy
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn enclosing_class_name(&self) -> Option<&ClassName> {
        self.enclosing_class_name.as_ref()
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn is_extension(&self) -> bool {
        self.extension
    }

    /// Fully qualified name using `.` as a separator, like
    /// `kotlin.String.isBlank`.
    pub fn canonical_name(&self) -> String {
        let mut result = String::new();
        if let Some(enclosing) = &self.enclosing_class_name {
            result.push_str(&enclosing.canonical_name());
            result.push('.');
        } else if !self.package_name.is_empty() {
            result.push_str(&self.package_name);
            result.push('.');
        }
        result.push_str(&self.simple_name);
        result
    }

    /// Callable reference to this member: `EnclosingClass::name`, or
    /// `::name` through an import for a top-level member.
    pub fn reference(&self) -> CodeBlock {
        match &self.enclosing_class_name {
            Some(enclosing) => CodeBlock::of(
                "%T::%N",
                [Arg::ty(enclosing.clone()), Arg::name(&self.simple_name)],
            ),
            None => CodeBlock::of("::%M", [Arg::member(self.clone())]),
        }
    }

    pub(crate) fn emit(&self, out: &mut CodeWriter<'_>) -> Result<()> {
        let name = out.lookup_name_member(self);
        out.emit(&escape_segments_if_necessary(&name))
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_forms() {
        assert_eq!(
            MemberName::new("kotlin.math", "abs").canonical_name(),
            "kotlin.math.abs"
        );
        assert_eq!(MemberName::new("", "printIt").canonical_name(), "printIt");
        let is_blank = ClassName::new("kotlin", ["String"]).member("isBlank");
        assert_eq!(is_blank.canonical_name(), "kotlin.String.isBlank");
    }

    #[test]
    fn callable_references() {
        let count = ClassName::new("com.example", ["Tacos"]).member("count");
        assert_eq!(count.reference().to_string(), "com.example.Tacos::count");
        let abs = MemberName::new("kotlin.math", "abs");
        assert_eq!(abs.reference().to_string(), "::kotlin.math.abs");
    }

    #[test]
    fn member_of_class_keeps_the_package() {
        let member = ClassName::new("com.example", ["Tacos"]).member("count");
        assert_eq!(member.package_name(), "com.example");
        assert_eq!(
            member.enclosing_class_name(),
            Some(&ClassName::new("com.example", ["Tacos"]))
        );
    }
}
