//! Whole-file assembly and the two-pass import resolution.
//!
//! Import elision needs global knowledge: whether `List` can be written
//! short depends on every other type the file mentions. A single
//! depth-first emission can't know that, so rendering runs twice. Pass
//! one writes into a null sink with an unlimited column budget, purely
//! to collect which names are importable and which are claimed by the
//! file's own scope; pass two renders for real with the import tables
//! built from pass one. Pass one always completes before pass two
//! starts.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use kotgen_core::escape::escape_segments_if_necessary;

use crate::code::{Arg, CodeBlock, CodeWriter, DEFAULT_COLUMN_LIMIT, DEFAULT_INDENT, Import};
use crate::code::Sink;
use crate::error::{Error, Result};
use crate::types::{ClassName, MemberName};

/// Kotlin's standard default imports; their members never need explicit
/// import lines. <https://kotlinlang.org/docs/packages.html#default-imports>
const KOTLIN_DEFAULT_IMPORTS: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.comparisons",
    "kotlin.io",
    "kotlin.ranges",
    "kotlin.sequences",
    "kotlin.text",
];

const KOTLIN_DEFAULT_JVM_IMPORTS: &[&str] = &["java.lang"];

/// A Kotlin source file: a package, optional file comment, explicit
/// imports, and a sequence of top-level code fragments.
///
/// Output order is comment, package, imports, members. Imports combine
/// the explicitly registered ones with everything the two-pass
/// resolution collected; non-aliased lines sort first, aliased lines
/// after them.
///
/// ```
/// use kotgen::{Arg, CodeBlock, SourceFile, builtins};
///
/// let file = SourceFile::builder("com.example", "Sizes")
///     .add_code(CodeBlock::of(
///         "val sizes: %T = listOf()\n",
///         [Arg::ty(builtins::list().parameterized_by([builtins::int().into()]))],
///     ))
///     .build();
/// assert_eq!(
///     file.to_string(),
///     "package com.example\n\nimport kotlin.Int\nimport kotlin.collections.List\n\nval sizes: List<Int> = listOf()\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SourceFile {
    package_name: String,
    name: String,
    comment: CodeBlock,
    members: Vec<CodeBlock>,
    member_imports: Vec<Import>,
    default_imports: Vec<String>,
    indent: String,
}

impl SourceFile {
    pub fn builder(
        package_name: impl Into<String>,
        name: impl Into<String>,
    ) -> SourceFileBuilder {
        SourceFileBuilder {
            package_name: package_name.into(),
            name: name.into(),
            comment: CodeBlock::builder(),
            members: Vec::new(),
            member_imports: Vec::new(),
            default_imports: Vec::new(),
            indent: DEFAULT_INDENT.to_string(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The relative path a [`write_to_path`](Self::write_to_path) call
    /// would produce, with unix-style separators:
    /// `com/example/HelloWorld.kt`.
    pub fn relative_path(&self) -> String {
        let mut path = String::new();
        for component in self.package_name.split('.').filter(|c| !c.is_empty()) {
            path.push_str(component);
            path.push('/');
        }
        path.push_str(&self.name);
        path.push_str(".kt");
        path
    }

    /// Renders this file into `out`.
    pub fn write_to(&self, out: &mut dyn fmt::Write) -> Result<()> {
        // First pass: emit the whole file into a null sink, just to
        // collect the types and members to import.
        let member_imports: IndexMap<String, Import> = self
            .member_imports
            .iter()
            .map(|import| (import.qualified_name().to_string(), import.clone()))
            .collect();
        let mut collector = CodeWriter::with_imports(
            Sink::Null,
            &self.indent,
            member_imports.clone(),
            HashMap::new(),
            HashMap::new(),
            usize::MAX,
        );
        self.emit(&mut collector, true)?;
        let suggested_types = collector.suggested_type_imports();
        let suggested_members = collector.suggested_member_imports();
        collector.close()?;

        let mut generated_imports: IndexMap<String, Import> = IndexMap::new();
        let imported_types = generate_imports(
            suggested_types,
            &mut generated_imports,
            |class_name: &ClassName| class_name.canonical_name(),
            true,
        );
        let imported_members = generate_imports(
            suggested_members,
            &mut generated_imports,
            |member_name: &MemberName| member_name.canonical_name(),
            false,
        );

        let mut merged_imports = member_imports.clone();
        for (qualified_name, import) in generated_imports {
            if !member_imports.contains_key(&qualified_name) {
                merged_imports.insert(qualified_name, import);
            }
        }

        // Second pass: write for real, with the collected imports
        // available for short-name resolution.
        let mut writer = CodeWriter::with_imports(
            Sink::Extern(out),
            &self.indent,
            merged_imports,
            imported_types,
            imported_members,
            DEFAULT_COLUMN_LIMIT,
        );
        self.emit(&mut writer, false)?;
        writer.close()
    }

    /// Writes this file under `directory` as UTF-8, using the standard
    /// package directory structure, and returns the output path.
    pub fn write_to_path(&self, directory: impl AsRef<Path>) -> Result<PathBuf> {
        let output_path = directory.as_ref().join(self.relative_path());
        let mut rendered = String::new();
        self.write_to(&mut rendered)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&output_path, rendered).map_err(|source| Error::Io {
            path: output_path.clone(),
            source,
        })?;
        Ok(output_path)
    }

    fn emit(&self, writer: &mut CodeWriter<'_>, collecting_imports: bool) -> Result<()> {
        if !self.comment.is_empty() {
            writer.emit_comment(&self.comment)?;
        }

        writer.push_package(&self.package_name);

        let escaped_package_name = escape_segments_if_necessary(&self.package_name);
        if !escaped_package_name.is_empty() {
            writer.emit_code(&CodeBlock::of(
                "package %L\n",
                [Arg::literal(escaped_package_name)],
            ))?;
            writer.emit("\n")?;
        }

        // Default-import filtering only applies to the real pass; the
        // collecting pass wants every candidate on the table.
        let escaped_default_imports: Vec<String> = if collecting_imports {
            Vec::new()
        } else {
            self.default_imports
                .iter()
                .map(|package| escape_segments_if_necessary(package))
                .collect()
        };
        let is_default_import = |import_line: &str| {
            let package = import_line
                .rsplit_once('.')
                .map_or(import_line, |(package, _)| package);
            escaped_default_imports.iter().any(|p| p == package)
        };

        // Aliased imports always appear at the bottom of the list.
        let mut plain_lines: Vec<String> = Vec::new();
        let mut aliased_lines: Vec<String> = Vec::new();
        for import in writer.imports().values() {
            if import.alias().is_some() {
                aliased_lines.push(import.to_string());
            } else {
                let line = import.to_string();
                if !is_default_import(&line) {
                    plain_lines.push(line);
                }
            }
        }
        plain_lines.sort();
        plain_lines.dedup();
        aliased_lines.sort();
        aliased_lines.dedup();
        plain_lines.extend(aliased_lines);

        if !plain_lines.is_empty() {
            for import_line in &plain_lines {
                writer.emit_code(&CodeBlock::of(
                    "import %L\n",
                    [Arg::literal(import_line.clone())],
                ))?;
            }
            writer.emit("\n")?;
        }

        for (index, member) in self.members.iter().enumerate() {
            if index > 0 {
                writer.emit("\n")?;
            }
            writer.emit_code(member)?;
        }

        writer.pop_package();
        Ok(())
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f).map_err(|_| fmt::Error)
    }
}

/// Builds a [`SourceFile`].
#[derive(Debug, Clone)]
pub struct SourceFileBuilder {
    package_name: String,
    name: String,
    comment: crate::code::CodeBlockBuilder,
    members: Vec<CodeBlock>,
    member_imports: Vec<Import>,
    default_imports: Vec<String>,
    indent: String,
}

impl SourceFileBuilder {
    /// Adds a file-site comment, prefixed to the start of the file.
    pub fn add_file_comment(mut self, format: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        self.comment = self.comment.add(format, args);
        self
    }

    /// Adds a top-level code fragment. Fragments are separated by blank
    /// lines in the output.
    pub fn add_code(mut self, code: CodeBlock) -> Self {
        self.members.push(code);
        self
    }

    /// Registers an explicit import of `name` from `package_name`, for
    /// members the resolution pass can't discover on its own.
    ///
    /// # Panics
    ///
    /// Panics on wildcard imports.
    pub fn add_import(mut self, package_name: &str, name: &str) -> Self {
        assert!(name != "*", "wildcard imports are not allowed");
        let qualified_name = if package_name.is_empty() {
            name.to_string()
        } else {
            format!("{package_name}.{name}")
        };
        self.member_imports.push(Import::new(qualified_name));
        self
    }

    /// Registers an explicit import of `member`.
    pub fn add_member_import(mut self, member: &MemberName) -> Self {
        self.member_imports.push(Import::new(member.canonical_name()));
        self
    }

    /// Registers an aliased import: `import com.example.Taco as Wrap`.
    pub fn add_aliased_import(
        mut self,
        qualified_name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        self.member_imports
            .push(Import::aliased(qualified_name, alias));
        self
    }

    /// Registers `package_name` as a default import: types and members
    /// from it resolve short without an import line.
    pub fn add_default_package_import(mut self, package_name: impl Into<String>) -> Self {
        self.default_imports.push(package_name.into());
        self
    }

    /// Registers Kotlin's standard default imports, optionally with the
    /// JVM's `java.lang`.
    pub fn add_kotlin_default_imports(mut self, include_jvm: bool) -> Self {
        self.default_imports
            .extend(KOTLIN_DEFAULT_IMPORTS.iter().map(|p| (*p).to_string()));
        if include_jvm {
            self.default_imports
                .extend(KOTLIN_DEFAULT_JVM_IMPORTS.iter().map(|p| (*p).to_string()));
        }
        self
    }

    /// Replaces the indentation unit; two spaces by default.
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn build(self) -> SourceFile {
        SourceFile {
            package_name: self.package_name,
            name: self.name,
            comment: self.comment.build(),
            members: self.members,
            member_imports: self.member_imports,
            default_imports: self.default_imports,
            indent: self.indent,
        }
    }
}

/// Turns the collected suggestions into final `simple name → entry`
/// tables, generating aliases where one simple name has several
/// candidates, and records the corresponding import lines.
fn generate_imports<T: Clone + PartialEq>(
    suggestions: IndexMap<String, Vec<T>>,
    generated_imports: &mut IndexMap<String, Import>,
    canonical_name: impl Fn(&T) -> String,
    capitalize_aliases: bool,
) -> HashMap<String, T> {
    let mut result = HashMap::new();
    for (simple_name, qualified) in suggestions {
        if let [only] = qualified.as_slice() {
            let canonical = canonical_name(only);
            generated_imports.insert(canonical.clone(), Import::new(canonical));
            result.insert(simple_name, only.clone());
        } else {
            for (alias, entry) in
                generate_import_aliases(&simple_name, &qualified, &canonical_name, capitalize_aliases)
            {
                let canonical = canonical_name(&entry);
                generated_imports.insert(canonical.clone(), Import::aliased(canonical, &alias));
                result.insert(alias, entry);
            }
        }
    }
    result
}

/// Builds unique aliases for colliding simple names by prepending
/// however many trailing canonical-name segments it takes:
/// `squareup.TacoFactory` and `chipotle.TacoFactory` become
/// `SquareupTacoFactory` and `ChipotleTacoFactory`.
fn generate_import_aliases<T: Clone>(
    simple_name: &str,
    qualified_names: &[T],
    canonical_name: impl Fn(&T) -> String,
    capitalize_aliases: bool,
) -> Vec<(String, T)> {
    // The last segment of the canonical name repeats the simple name,
    // so it never contributes to the alias prefix; neither do
    // `Companion` segments.
    let canonical_segments: Vec<(&T, Vec<String>)> = qualified_names
        .iter()
        .map(|qualified| {
            let full = canonical_name(qualified);
            let mut segments: Vec<&str> = full.split('.').collect();
            segments.pop();
            let segments = segments
                .into_iter()
                .filter(|segment| *segment != "Companion")
                .map(capitalize_first)
                .collect();
            (qualified, segments)
        })
        .collect();
    let longest = canonical_segments
        .iter()
        .map(|(_, segments)| segments.len())
        .max()
        .unwrap_or(0);

    let mut alias_names: IndexMap<String, &T> = IndexMap::new();
    let mut segments_to_use = 0;
    // Iterate until the aliases are unique for all names.
    while alias_names.len() != qualified_names.len() && segments_to_use <= longest {
        segments_to_use += 1;
        alias_names.clear();
        for (qualified, segments) in &canonical_segments {
            let take = segments_to_use.min(segments.len());
            let mut alias_prefix = segments[segments.len() - take..].concat();
            if !capitalize_aliases {
                alias_prefix = decapitalize_first(&alias_prefix);
            }
            let alias_name = format!("{alias_prefix}{}", capitalize_first(simple_name));
            alias_names.insert(alias_name, qualified);
        }
    }
    alias_names
        .into_iter()
        .map(|(alias, qualified)| (alias, qualified.clone()))
        .collect()
}

fn capitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn decapitalize_first(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::builtins;

    #[test]
    fn repeated_references_emit_one_import_and_short_names() {
        let list = builtins::list();
        let file = SourceFile::builder("com.example", "Lists")
            .add_code(CodeBlock::of("val a: %T = listOf()\n", [Arg::ty(list.clone())]))
            .add_code(CodeBlock::of("val b: %T = listOf()\n", [Arg::ty(list)]))
            .build();
        let rendered = file.to_string();
        assert_eq!(
            rendered.matches("import kotlin.collections.List").count(),
            1
        );
        assert!(rendered.contains("val a: List = listOf()"));
        assert!(rendered.contains("val b: List = listOf()"));
    }

    #[test]
    fn colliding_simple_names_get_aliases() {
        let square = ClassName::new("com.squareup", ["Taco"]);
        let chipotle = ClassName::new("com.chipotle", ["Taco"]);
        let file = SourceFile::builder("com.example", "Tacos")
            .add_code(CodeBlock::of(
                "val a: %T? = null\nval b: %T? = null\n",
                [Arg::ty(square), Arg::ty(chipotle)],
            ))
            .build();
        let rendered = file.to_string();
        assert!(rendered.contains("import com.chipotle.Taco as ChipotleTaco"));
        assert!(rendered.contains("import com.squareup.Taco as SquareupTaco"));
        assert!(rendered.contains("val a: SquareupTaco? = null"));
        assert!(rendered.contains("val b: ChipotleTaco? = null"));
    }

    #[test]
    fn default_imports_are_elided() {
        let file = SourceFile::builder("com.example", "Lists")
            .add_kotlin_default_imports(false)
            .add_code(CodeBlock::of(
                "val a: %T = listOf()\n",
                [Arg::ty(builtins::list())],
            ))
            .build();
        let rendered = file.to_string();
        assert!(!rendered.contains("import"));
        assert!(rendered.contains("val a: List = listOf()"));
    }

    #[test]
    fn same_package_types_need_no_import() {
        let file = SourceFile::builder("com.example", "Tacos")
            .add_code(CodeBlock::of(
                "val taco: %T? = null\n",
                [Arg::ty(ClassName::new("com.example", ["Taco"]))],
            ))
            .build();
        let rendered = file.to_string();
        assert!(!rendered.contains("import"));
        assert!(rendered.contains("val taco: Taco? = null"));
    }

    #[test]
    fn file_comment_precedes_the_package() {
        let file = SourceFile::builder("com.example", "Generated")
            .add_file_comment("Generated, do not edit!", [])
            .build();
        assert_eq!(
            file.to_string(),
            "// Generated, do not edit!\npackage com.example\n\n"
        );
    }

    #[test]
    fn empty_package_omits_the_package_line() {
        let file = SourceFile::builder("", "Script")
            .add_code(CodeBlock::of("val x = 1\n", []))
            .build();
        assert_eq!(file.to_string(), "val x = 1\n");
    }

    #[test]
    fn relative_path_follows_the_package() {
        let file = SourceFile::builder("com.example.tacos", "TacoFactory").build();
        assert_eq!(file.relative_path(), "com/example/tacos/TacoFactory.kt");
        let file = SourceFile::builder("", "TacoFactory").build();
        assert_eq!(file.relative_path(), "TacoFactory.kt");
    }

    #[test]
    fn writes_to_disk_under_the_package_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = SourceFile::builder("com.example", "Taco")
            .add_code(CodeBlock::of("class Taco\n", []))
            .build();
        let path = file.write_to_path(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("com/example/Taco.kt"));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "package com.example\n\nclass Taco\n"
        );
    }

    #[test]
    fn aliased_member_import_rewrites_call_sites() {
        let file = SourceFile::builder("com.example", "Tacos")
            .add_aliased_import("com.squareup.tacos.Tacos.produce", "produceTacos")
            .add_code(CodeBlock::of(
                "val taco = %T.produce()\n",
                [Arg::ty(ClassName::new("com.squareup.tacos", ["Tacos"]))],
            ))
            .build();
        let rendered = file.to_string();
        assert!(
            rendered.contains("import com.squareup.tacos.Tacos.produce as produceTacos")
        );
        assert!(rendered.contains("val taco = produceTacos()"));
    }

    #[test]
    fn member_references_are_imported() {
        let file = SourceFile::builder("com.example", "Math")
            .add_code(CodeBlock::of(
                "val x = %M(-11)\n",
                [Arg::member(MemberName::new("kotlin.math", "abs"))],
            ))
            .build();
        let rendered = file.to_string();
        assert!(rendered.contains("import kotlin.math.abs"));
        assert!(rendered.contains("val x = abs(-11)"));
    }

    #[test]
    fn end_to_end_parameterized_type() {
        let list_of_strings = builtins::list()
            .parameterized_by([builtins::string().into()]);
        let file = SourceFile::builder("com.example", "HelloWorld")
            .add_code(CodeBlock::of(
                "val names: %T = listOf()\n",
                [Arg::ty(list_of_strings)],
            ))
            .build();
        assert_eq!(
            file.to_string(),
            "package com.example\n\nimport kotlin.String\nimport kotlin.collections.List\n\nval names: List<String> = listOf()\n"
        );
    }
}
