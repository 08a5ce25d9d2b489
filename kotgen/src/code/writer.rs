//! The central emission engine.
//!
//! A `CodeWriter` converts code blocks to Kotlin source, honoring
//! imports, indentation, statement wrapping, and deferred member-import
//! references. One writer lives for exactly one render pass; whole-file
//! emission runs two of them (see [`crate::file`]).

use std::collections::{HashMap, HashSet};
use std::fmt;

use indexmap::IndexMap;
use kotgen_core::escape::is_identifier_start;
use kotgen_core::literal::string_literal_with_quotes;

use crate::code::block::{Arg, CodeBlock, FormatPart};
use crate::code::import::Import;
use crate::code::line_wrapper::{LineWrapper, Sink};
use crate::error::Result;
use crate::spec::AnnotationSpec;
use crate::types::{ClassName, MemberName, TypeName, TypeVariableName, builtins};

/// Unit of indentation used when none is configured.
pub const DEFAULT_INDENT: &str = "  ";

/// Column limit used for real emission passes.
pub const DEFAULT_COLUMN_LIMIT: usize = 100;

/// One enclosing type context on the writer's lexical stack.
///
/// The writer resolves simple names against this stack: nested type
/// names first (innermost scope wins), then the top-level type itself,
/// then its enum constants, then the import table.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    pub name: String,
    /// Simple names of types nested directly inside this type.
    pub nested_type_names: Vec<String>,
    /// Names of functions declared on this type; a member import whose
    /// simple name clashes with one of these is not suggested.
    pub function_names: Vec<String>,
    /// Constants, when this is an enum type.
    pub enum_constants: Vec<String>,
    pub is_enum: bool,
    /// Whether this is an `inner` class, which sees the functions of
    /// its enclosing type.
    pub is_inner: bool,
}

impl TypeScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Converts code blocks to a string suitable for both human and kotlinc
/// consumption.
pub struct CodeWriter<'a> {
    out: LineWrapper<'a>,
    indent: String,
    indent_level: usize,
    kdoc: bool,
    comment: bool,
    /// Set-once-per-pass package context. `None` until
    /// [`push_package`](Self::push_package); the empty package compares
    /// equal to an unset one during resolution.
    package_name: Option<String>,
    type_stack: Vec<TypeScope>,
    /// Explicit (member) imports by qualified name.
    imports: IndexMap<String, Import>,
    /// Enclosures of member imports, for the `%T` deferral check.
    member_import_names: HashSet<String>,
    /// Pass-2 tables: simple name to the entry it refers to.
    imported_types: HashMap<String, ClassName>,
    imported_members: HashMap<String, MemberName>,
    /// Suggestion tables accumulated during the collecting pass.
    importable_types: IndexMap<String, Vec<ClassName>>,
    importable_members: IndexMap<String, Vec<MemberName>>,
    /// Simple names resolved in scope; never offered as imports, which
    /// would shadow them.
    referenced_names: HashSet<String>,
    trailing_newline: bool,
    /// `Some(line)` while inside statement markers. The first
    /// continuation line of a multi-line statement double-indents to
    /// stand apart from nested block lines.
    statement_line: Option<usize>,
}

impl<'a> CodeWriter<'a> {
    pub fn new(out: &'a mut dyn fmt::Write, indent: &str, column_limit: usize) -> Self {
        Self::with_imports(
            Sink::Extern(out),
            indent,
            IndexMap::new(),
            HashMap::new(),
            HashMap::new(),
            column_limit,
        )
    }

    /// A writer with an unlimited column budget, for rendering detached
    /// values (`Display` impls) where soft wrapping would be noise.
    pub(crate) fn unbounded(out: &'a mut dyn fmt::Write) -> Self {
        Self::new(out, DEFAULT_INDENT, usize::MAX)
    }

    pub(crate) fn with_imports(
        out: Sink<'a>,
        indent: &str,
        imports: IndexMap<String, Import>,
        imported_types: HashMap<String, ClassName>,
        imported_members: HashMap<String, MemberName>,
        column_limit: usize,
    ) -> Self {
        let member_import_names: HashSet<String> = imports
            .keys()
            .filter_map(|qualified| {
                qualified
                    .rfind('.')
                    .map(|last_dot| qualified[..last_dot].to_string())
            })
            .collect();
        Self {
            out: LineWrapper::from_sink(out, indent, column_limit),
            indent: indent.to_string(),
            indent_level: 0,
            kdoc: false,
            comment: false,
            package_name: None,
            type_stack: Vec::new(),
            imports,
            member_import_names,
            imported_types,
            imported_members,
            importable_types: IndexMap::new(),
            importable_members: IndexMap::new(),
            referenced_names: HashSet::new(),
            trailing_newline: false,
            statement_line: None,
        }
    }

    pub fn indent(&mut self, levels: usize) {
        self.indent_level += levels;
    }

    /// # Panics
    ///
    /// Panics when unindenting below zero.
    pub fn unindent(&mut self, levels: usize) {
        assert!(
            self.indent_level >= levels,
            "cannot unindent {levels} from {}",
            self.indent_level
        );
        self.indent_level -= levels;
    }

    /// # Panics
    ///
    /// Panics if a package is already set for this pass.
    pub fn push_package(&mut self, package_name: impl Into<String>) {
        assert!(
            self.package_name.is_none(),
            "package already set: {}",
            self.package_name.as_deref().unwrap_or_default()
        );
        self.package_name = Some(package_name.into());
    }

    /// # Panics
    ///
    /// Panics if no package is set.
    pub fn pop_package(&mut self) {
        assert!(self.package_name.is_some(), "package not set");
        self.package_name = None;
    }

    pub fn push_type(&mut self, type_scope: TypeScope) {
        self.type_stack.push(type_scope);
    }

    pub fn pop_type(&mut self) {
        self.type_stack.pop().expect("type stack is empty");
    }

    /// Emits `code_block` as a `//` comment.
    pub fn emit_comment(&mut self, code_block: &CodeBlock) -> Result<()> {
        self.trailing_newline = true; // Force the '//' prefix.
        self.comment = true;
        let result = self
            .emit_code(code_block)
            .and_then(|_| self.emit("\n"));
        self.comment = false;
        result
    }

    /// Emits `code_block` as a `/** ... */` KDoc comment.
    pub fn emit_kdoc(&mut self, code_block: &CodeBlock) -> Result<()> {
        if code_block.is_empty() {
            return Ok(());
        }
        self.emit("/**\n")?;
        self.kdoc = true;
        let result = self.emit_code_in_context(code_block, false, true);
        self.kdoc = false;
        result?;
        self.emit(" */\n")
    }

    /// Emits annotations, space-separated when `inline`, one per line
    /// otherwise.
    pub fn emit_annotations(
        &mut self,
        annotations: &[AnnotationSpec],
        inline: bool,
    ) -> Result<()> {
        for annotation in annotations {
            annotation.emit(self, inline, false)?;
            self.emit(if inline { " " } else { "\n" })?;
        }
        Ok(())
    }

    /// Emits type variables with their single bounds, for a declaration
    /// site: `<in T : Number, reified R>`. Variables with multiple
    /// bounds need an additional [`emit_where_block`](Self::emit_where_block).
    ///
    /// Only declarations consume bounds and variance; references render
    /// through `%T` as the bare variable name.
    pub fn emit_type_variables(&mut self, type_variables: &[TypeVariableName]) -> Result<()> {
        if type_variables.is_empty() {
            return Ok(());
        }
        self.emit("<")?;
        for (index, type_variable) in type_variables.iter().enumerate() {
            if index > 0 {
                self.emit(", ")?;
            }
            if let Some(variance) = type_variable.variance() {
                self.emit(variance.keyword())?;
                self.emit(" ")?;
            }
            if type_variable.is_reified() {
                self.emit("reified ")?;
            }
            self.emit(type_variable.name())?;
            if type_variable.bounds().len() == 1
                && type_variable.bounds()[0] != builtins::nullable_any()
            {
                self.emit(" : ")?;
                self.emit_type(&type_variable.bounds()[0])?;
            }
        }
        self.emit(">")
    }

    /// Emits a `where` block with the bounds of every type variable
    /// that has at least two of them.
    pub fn emit_where_block(&mut self, type_variables: &[TypeVariableName]) -> Result<()> {
        let mut first_bound = true;
        for type_variable in type_variables {
            if type_variable.bounds().len() > 1 {
                for bound in type_variable.bounds() {
                    self.emit(if first_bound { " where " } else { ", " })?;
                    self.emit(type_variable.name())?;
                    self.emit(" : ")?;
                    self.emit_type(bound)?;
                    first_bound = false;
                }
            }
        }
        Ok(())
    }

    /// Emits `code_block`, interpreting placeholders against its
    /// argument list.
    pub fn emit_code(&mut self, code_block: &CodeBlock) -> Result<()> {
        self.emit_code_in_context(code_block, false, false)
    }

    pub(crate) fn emit_code_in_context(
        &mut self,
        code_block: &CodeBlock,
        is_constant_context: bool,
        ensure_trailing_newline: bool,
    ) -> Result<()> {
        let mut a = 0;
        // Used by the member-import logic: a bare class reference
        // followed by a `.member` continuation may collapse into an
        // imported member name, so its emission is held one token.
        let mut deferred_type_name: Option<ClassName> = None;

        let mut i = 0;
        while i < code_block.parts.len() {
            match &code_block.parts[i] {
                FormatPart::Literal => {
                    let arg = &code_block.args[a];
                    a += 1;
                    self.emit_literal(arg, is_constant_context)?;
                }

                FormatPart::Name => {
                    let Arg::Name(name) = &code_block.args[a] else {
                        unreachable!("%N arguments are normalized to names")
                    };
                    a += 1;
                    self.emit(name)?;
                }

                FormatPart::Str => {
                    let Arg::Str(string) = &code_block.args[a] else {
                        unreachable!("%S arguments are normalized to strings")
                    };
                    a += 1;
                    // Emit null as a literal null: no quotes.
                    let literal = match string {
                        Some(string) => {
                            string_literal_with_quotes(string, false, is_constant_context)
                        }
                        None => "null".to_string(),
                    };
                    self.emit_raw(&literal, true)?;
                }

                FormatPart::Template => {
                    let arg = &code_block.args[a];
                    a += 1;
                    let string = match arg {
                        Arg::Block(block) => {
                            Some(self.emit_into(|writer| writer.emit_code(block))?)
                        }
                        Arg::Str(string) => string.clone(),
                        _ => unreachable!("%P arguments are normalized to strings or blocks"),
                    };
                    let literal = match string {
                        Some(string) => {
                            string_literal_with_quotes(&string, true, is_constant_context)
                        }
                        None => "null".to_string(),
                    };
                    self.emit_raw(&literal, true)?;
                }

                FormatPart::Type => {
                    let Arg::Type(type_name) = &code_block.args[a] else {
                        unreachable!("%T arguments are normalized to types")
                    };
                    a += 1;
                    let mut type_name = type_name.clone();
                    if type_name.is_annotated() {
                        type_name.emit_annotations(self)?;
                        type_name = type_name.with_annotations(Vec::new());
                    }
                    // Defer emission when the next token might rewrite
                    // this reference through a member import.
                    let mut defer = false;
                    if let TypeName::Class(class_name) = &type_name {
                        if let Some(FormatPart::Text(_)) = code_block.parts.get(i + 1) {
                            if self
                                .member_import_names
                                .contains(&class_name.canonical_name())
                            {
                                assert!(
                                    deferred_type_name.is_none(),
                                    "pending type for static import?!"
                                );
                                deferred_type_name = Some(class_name.clone());
                                defer = true;
                            }
                        }
                    }
                    if !defer {
                        type_name.emit(self)?;
                    }
                    type_name.emit_nullable(self)?;
                }

                FormatPart::Member => {
                    let Arg::Member(member_name) = &code_block.args[a] else {
                        unreachable!("%M arguments are normalized to members")
                    };
                    a += 1;
                    member_name.emit(self)?;
                }

                FormatPart::Percent => self.emit("%")?,

                FormatPart::Indent => self.indent(1),

                FormatPart::Unindent => self.unindent(1),

                FormatPart::BeginStatement => {
                    assert!(
                        self.statement_line.is_none(),
                        "Can't open a new statement until the current statement is closed \
                         (opening « followed by another « without a closing »).\n\
                         Current code block:\n- Format parts: {:?}\n- Arguments: {:?}",
                        code_block.parts,
                        code_block.args
                    );
                    self.statement_line = Some(0);
                }

                FormatPart::EndStatement => {
                    let statement_line = self.statement_line.unwrap_or_else(|| {
                        panic!(
                            "Can't close a statement that hasn't been opened (closing » is \
                             not preceded by an opening «).\n\
                             Current code block:\n- Format parts: {:?}\n- Arguments: {:?}",
                            code_block.parts, code_block.args
                        )
                    });
                    if statement_line > 0 {
                        // End a multi-line statement: drop the
                        // double indent applied at its first wrap.
                        self.unindent(2);
                    }
                    self.statement_line = None;
                }

                FormatPart::Text(text) => {
                    let mut handled = false;
                    if let Some(class_name) = deferred_type_name.take() {
                        if text.starts_with('.')
                            && self.emit_static_import_member(&class_name.canonical_name(), text)?
                        {
                            // Member import hit: the member access was
                            // rewritten, skip the raw text.
                            handled = true;
                        } else {
                            TypeName::Class(class_name).emit(self)?;
                        }
                    }
                    if !handled {
                        self.emit(text)?;
                    }
                }
            }
            i += 1;
        }
        if ensure_trailing_newline && self.out.has_pending_segments() {
            self.emit("\n")?;
        }
        Ok(())
    }

    fn emit_literal(&mut self, arg: &Arg, is_constant_context: bool) -> Result<()> {
        match arg {
            Arg::Literal(text) => self.emit(text),
            Arg::Block(block) => self.emit_code_in_context(block, is_constant_context, false),
            Arg::Annotation(annotation) => annotation.emit(self, true, is_constant_context),
            _ => unreachable!("%L arguments are normalized to literals"),
        }
    }

    fn emit_static_import_member(&mut self, canonical: &str, part: &str) -> Result<bool> {
        let part_without_leading_dot = &part[1..];
        if part_without_leading_dot.is_empty() {
            return Ok(false);
        }
        let first = part_without_leading_dot
            .chars()
            .next()
            .expect("non-empty");
        if !is_identifier_start(first) {
            return Ok(false);
        }
        let member_name = extract_member_name(part_without_leading_dot);
        let import = self.imports.get(&format!("{canonical}.{member_name}"));
        match import {
            Some(import) => {
                let text = match import.alias() {
                    Some(alias) => part_without_leading_dot.replacen(member_name, alias, 1),
                    None => part_without_leading_dot.to_string(),
                };
                self.emit(&text)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Returns the best name to identify `class_name` with in the
    /// current context: the shortest suffix of its nesting chain that
    /// resolves back to it, through the lexical scope and the import
    /// tables. Falls back to the canonical name, recording the type as
    /// importable for a future pass.
    pub(crate) fn lookup_name_class(&mut self, class_name: &ClassName) -> String {
        let mut name_resolved = false;
        let mut candidate = Some(class_name.clone());
        while let Some(c) = candidate {
            let alias = self
                .imports
                .get(&c.canonical_name())
                .and_then(|import| import.alias().map(str::to_string));
            let simple_name = alias
                .clone()
                .unwrap_or_else(|| c.simple_name().to_string());
            let resolved = self.resolve(&simple_name);
            name_resolved = resolved.is_some();

            // Nullability and type annotations are irrelevant for
            // imports.
            if resolved == Some(c.with_nullable(false).with_annotations(Vec::new())) {
                if alias.is_none() {
                    self.referenced_names
                        .insert(class_name.top_level_class_name().simple_name().to_string());
                }
                let mut segments = vec![simple_name];
                segments.extend(
                    class_name.simple_names()[c.simple_names().len()..]
                        .iter()
                        .cloned(),
                );
                return segments.join(".");
            }
            candidate = c.enclosing_class_name();
        }

        // The name resolved but to something else: name shadowing, so
        // only the fully qualified name is safe.
        if name_resolved {
            return class_name.canonical_name();
        }

        // A same-package type needs no import, but its top-level name
        // must never be shadowed by one.
        if self.package() == class_name.package_name() {
            self.referenced_names
                .insert(class_name.top_level_class_name().simple_name().to_string());
            return class_name.simple_names().join(".");
        }

        // Fall back to the fully-qualified name and mark the type as
        // importable for a future pass.
        if !self.kdoc {
            self.importable_type(class_name);
        }

        class_name.canonical_name()
    }

    /// The analogous, simpler resolution for member references.
    pub(crate) fn lookup_name_member(&mut self, member_name: &MemberName) -> String {
        let simple_name = self
            .imports
            .get(&member_name.canonical_name())
            .and_then(|import| import.alias().map(str::to_string))
            .unwrap_or_else(|| member_name.simple_name().to_string());

        // Match an imported member.
        if let Some(imported) = self.imported_members.get(&simple_name).cloned() {
            if &imported == member_name {
                return simple_name;
            } else if let Some(enclosing) = member_name.enclosing_class_name() {
                let enclosing_name = self.lookup_name_class(&enclosing.clone());
                return format!("{enclosing_name}.{simple_name}");
            }
        }

        // A same-package top-level member needs no import.
        if self.package() == member_name.package_name()
            && member_name.enclosing_class_name().is_none()
        {
            self.referenced_names
                .insert(member_name.simple_name().to_string());
            return member_name.simple_name().to_string();
        }

        // Mark the member as importable for a future pass, unless the
        // name clashes with a method in the current context.
        if !self.kdoc
            && (member_name.is_extension()
                || !self.is_method_name_used_in_current_context(member_name.simple_name()))
        {
            self.importable_member(member_name);
        }

        member_name.canonical_name()
    }

    // TODO: also honor superclass members when resolving names.
    fn is_method_name_used_in_current_context(&self, simple_name: &str) -> bool {
        for scope in self.type_stack.iter().rev() {
            if scope.function_names.iter().any(|name| name == simple_name) {
                return true;
            }
            if !scope.is_inner {
                break;
            }
        }
        false
    }

    fn importable_type(&mut self, class_name: &ClassName) {
        let top_level = class_name.top_level_class_name();
        let simple_name = self
            .imports
            .get(&class_name.canonical_name())
            .and_then(|import| import.alias().map(str::to_string))
            .unwrap_or_else(|| top_level.simple_name().to_string());
        // Check for name clashes with members.
        if !self.importable_members.contains_key(&simple_name) {
            self.importable_types
                .entry(simple_name)
                .or_default()
                .push(top_level);
        }
    }

    fn importable_member(&mut self, member_name: &MemberName) {
        if member_name.package_name().is_empty() {
            return;
        }
        let simple_name = self
            .imports
            .get(&member_name.canonical_name())
            .and_then(|import| import.alias().map(str::to_string))
            .unwrap_or_else(|| member_name.simple_name().to_string());
        // Check for name clashes with types.
        if !self.importable_types.contains_key(&simple_name) {
            self.importable_members
                .entry(simple_name)
                .or_default()
                .push(member_name.clone());
        }
    }

    /// Returns the class or enum value referenced by `simple_name`,
    /// using the current nesting context and imports.
    // TODO: also honor superclass members when resolving names.
    fn resolve(&self, simple_name: &str) -> Option<ClassName> {
        // Match a child of the current (potentially nested) class.
        for depth in (0..self.type_stack.len()).rev() {
            if self.type_stack[depth]
                .nested_type_names
                .iter()
                .any(|name| name == simple_name)
            {
                return Some(self.stack_class_name(depth, simple_name));
            }
        }

        if let Some(first) = self.type_stack.first() {
            // Match the top-level class.
            if first.name == simple_name {
                return Some(ClassName::new(self.package(), [simple_name]));
            }
            // Match a top-level enum value; enum values are not proper
            // classes but can still be modeled as one.
            if first.is_enum
                && first.enum_constants.iter().any(|constant| constant == simple_name)
            {
                return Some(
                    ClassName::new(self.package(), [first.name.clone()])
                        .nested_class(simple_name),
                );
            }
        }

        // Match an imported type.
        self.imported_types.get(simple_name).cloned()
    }

    /// The class named `simple_name` when nested in the class at
    /// `stack_depth`.
    fn stack_class_name(&self, stack_depth: usize, simple_name: &str) -> ClassName {
        let mut class_name =
            ClassName::new(self.package(), [self.type_stack[0].name.clone()]);
        for depth in 1..=stack_depth {
            class_name = class_name.nested_class(&self.type_stack[depth].name);
        }
        class_name.nested_class(simple_name)
    }

    fn package(&self) -> &str {
        self.package_name.as_deref().unwrap_or("")
    }

    /// Emits annotations, body, and nullability of `type_name` the way
    /// a `%T` reference would.
    pub(crate) fn emit_type(&mut self, type_name: &TypeName) -> Result<()> {
        if type_name.is_annotated() {
            type_name.emit_annotations(self)?;
            let stripped = type_name.with_annotations(Vec::new());
            stripped.emit(self)?;
            stripped.emit_nullable(self)
        } else {
            type_name.emit(self)?;
            type_name.emit_nullable(self)
        }
    }

    /// Emits `s` with indentation as required. All text reaches the
    /// output through here; indentation is written lazily to avoid
    /// trailing whitespace.
    pub fn emit(&mut self, s: &str) -> Result<()> {
        self.emit_raw(s, false)
    }

    fn emit_raw(&mut self, s: &str, non_wrapping: bool) -> Result<()> {
        let mut first = true;
        for line in s.split('\n') {
            // Each split boundary is a newline character. Blank lines in
            // KDoc and comments still get their prefix.
            if !first {
                if (self.kdoc || self.comment) && self.trailing_newline {
                    self.emit_indentation();
                    self.out
                        .append_non_wrapping(if self.kdoc { " *" } else { "//" });
                }
                self.out.newline()?;
                self.trailing_newline = true;
                if let Some(statement_line) = self.statement_line {
                    if statement_line == 0 {
                        // Begin a multi-line statement: double-indent
                        // the continuation lines.
                        self.indent(2);
                    }
                    self.statement_line = Some(statement_line + 1);
                }
            }
            first = false;

            if line.is_empty() {
                continue; // Don't indent empty lines.
            }

            if self.trailing_newline {
                self.emit_indentation();
                if self.kdoc {
                    self.out.append_non_wrapping(" * ");
                } else if self.comment {
                    self.out.append_non_wrapping("// ");
                }
            }

            if non_wrapping {
                self.out.append_non_wrapping(line);
            } else {
                let indent_level = if self.kdoc {
                    self.indent_level
                } else {
                    self.indent_level + 2
                };
                let line_prefix = if self.kdoc { " * " } else { "" };
                self.out.append(line, indent_level, line_prefix)?;
            }
            self.trailing_newline = false;
        }
        Ok(())
    }

    fn emit_indentation(&mut self) {
        for _ in 0..self.indent_level {
            self.out.append_non_wrapping(&self.indent);
        }
    }

    /// Runs `action` with the output temporarily redirected into a
    /// buffer, preserving all resolution state, and returns the
    /// buffered text.
    pub(crate) fn emit_into<F>(&mut self, action: F) -> Result<String>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let indent = self.indent.clone();
        let old = std::mem::replace(
            &mut self.out,
            LineWrapper::from_sink(Sink::Buffer(String::new()), indent, usize::MAX),
        );
        let result = action(self);
        let buffered = std::mem::replace(&mut self.out, old);
        let text = buffered.into_buffer()?;
        result.map(|_| text)
    }

    pub(crate) fn imports(&self) -> &IndexMap<String, Import> {
        &self.imports
    }

    /// The types that should have been imported for this code, keyed by
    /// simple name. Simple-name collisions keep every candidate; the
    /// file layer generates aliases for them.
    pub(crate) fn suggested_type_imports(&self) -> IndexMap<String, Vec<ClassName>> {
        self.importable_types
            .iter()
            .filter(|(simple_name, _)| !self.referenced_names.contains(simple_name.as_str()))
            .map(|(simple_name, class_names)| (simple_name.clone(), dedup(class_names)))
            .collect()
    }

    /// The members that should have been imported for this code.
    pub(crate) fn suggested_member_imports(&self) -> IndexMap<String, Vec<MemberName>> {
        self.importable_members
            .iter()
            .filter(|(simple_name, _)| !self.referenced_names.contains(simple_name.as_str()))
            .map(|(simple_name, member_names)| (simple_name.clone(), dedup(member_names)))
            .collect()
    }

    /// Flushes the output. Must run before the writer is discarded for
    /// the last buffered line to reach the sink.
    pub fn close(&mut self) -> Result<()> {
        self.out.close()
    }
}

fn dedup<T: Clone + PartialEq>(values: &[T]) -> Vec<T> {
    let mut unique = Vec::new();
    for value in values {
        if !unique.contains(value) {
            unique.push(value.clone());
        }
    }
    unique
}

/// The longest identifier prefix of `part`: `isBlank` of `isBlank()`.
fn extract_member_name(part: &str) -> &str {
    let end = part
        .char_indices()
        .find(|(_, c)| !kotgen_core::escape::is_identifier_part(*c))
        .map_or(part.len(), |(index, _)| index);
    &part[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Arg;
    use crate::types::Variance;

    fn write(actions: impl FnOnce(&mut CodeWriter<'_>)) -> String {
        write_with_limit(usize::MAX, actions)
    }

    fn write_with_limit(
        column_limit: usize,
        actions: impl FnOnce(&mut CodeWriter<'_>),
    ) -> String {
        let mut out = String::new();
        let mut writer = CodeWriter::new(&mut out, DEFAULT_INDENT, column_limit);
        actions(&mut writer);
        writer.close().unwrap();
        drop(writer);
        out
    }

    fn scope(name: &str, nested: &[&str]) -> TypeScope {
        TypeScope {
            name: name.to_string(),
            nested_type_names: nested.iter().map(|n| (*n).to_string()).collect(),
            ..TypeScope::default()
        }
    }

    #[test]
    fn nested_class_resolves_to_its_simple_name_in_scope() {
        let out = write(|writer| {
            writer.push_package("com.example");
            writer.push_type(scope("Outer", &["Inner"]));
            let inner = ClassName::new("com.example", ["Outer", "Inner"]);
            writer
                .emit_code(&CodeBlock::of("val x: %T", [Arg::ty(inner)]))
                .unwrap();
            writer.pop_type();
            writer.pop_package();
        });
        assert_eq!(out, "val x: Inner");
    }

    #[test]
    fn shadowed_name_falls_back_to_the_canonical_name() {
        // `Inner` in scope refers to Outer.Inner, so another package's
        // `Inner` cannot use its simple name.
        let out = write(|writer| {
            writer.push_package("com.example");
            writer.push_type(scope("Outer", &["Inner"]));
            let foreign = ClassName::new("com.squareup", ["Inner"]);
            writer
                .emit_code(&CodeBlock::of("val x: %T", [Arg::ty(foreign)]))
                .unwrap();
            writer.pop_type();
            writer.pop_package();
        });
        assert_eq!(out, "val x: com.squareup.Inner");
    }

    #[test]
    fn same_package_type_uses_its_simple_name() {
        let out = write(|writer| {
            writer.push_package("com.example");
            let peer = ClassName::new("com.example", ["Taco"]);
            writer
                .emit_code(&CodeBlock::of("val x: %T", [Arg::ty(peer)]))
                .unwrap();
            writer.pop_package();
        });
        assert_eq!(out, "val x: Taco");
    }

    #[test]
    fn foreign_type_is_fully_qualified_and_recorded_as_importable() {
        let mut out = String::new();
        let mut writer = CodeWriter::new(&mut out, DEFAULT_INDENT, usize::MAX);
        writer.push_package("com.example");
        let list = builtins::list();
        writer
            .emit_code(&CodeBlock::of("val x: %T", [Arg::ty(list.clone())]))
            .unwrap();
        let suggested = writer.suggested_type_imports();
        assert_eq!(suggested.get("List"), Some(&vec![list]));
        writer.pop_package();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(out, "val x: kotlin.collections.List");
    }

    #[test]
    fn same_package_name_is_never_offered_as_an_import() {
        // A same-package `Taco` must suppress the suggestion for a
        // foreign `Taco`, which would shadow it.
        let mut out = String::new();
        let mut writer = CodeWriter::new(&mut out, DEFAULT_INDENT, usize::MAX);
        writer.push_package("com.example");
        writer
            .emit_code(&CodeBlock::of(
                "val a: %T\nval b: %T\n",
                [
                    Arg::ty(ClassName::new("com.example", ["Taco"])),
                    Arg::ty(ClassName::new("com.squareup", ["Taco"])),
                ],
            ))
            .unwrap();
        assert!(writer.suggested_type_imports().get("Taco").is_none());
        writer.close().unwrap();
    }

    #[test]
    fn imported_type_uses_its_simple_name() {
        let mut out = String::new();
        let mut imported_types = HashMap::new();
        imported_types.insert("List".to_string(), builtins::list());
        let mut writer = CodeWriter::with_imports(
            Sink::Extern(&mut out),
            DEFAULT_INDENT,
            IndexMap::new(),
            imported_types,
            HashMap::new(),
            usize::MAX,
        );
        writer.push_package("com.example");
        writer
            .emit_code(&CodeBlock::of("val x: %T", [Arg::ty(builtins::list())]))
            .unwrap();
        writer.pop_package();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(out, "val x: List");
    }

    #[test]
    fn aliased_import_renders_the_alias() {
        let mut out = String::new();
        let mut imports = IndexMap::new();
        imports.insert(
            "com.squareup.Taco".to_string(),
            Import::aliased("com.squareup.Taco", "SquareTaco"),
        );
        let mut imported_types = HashMap::new();
        imported_types.insert(
            "SquareTaco".to_string(),
            ClassName::new("com.squareup", ["Taco"]),
        );
        let mut writer = CodeWriter::with_imports(
            Sink::Extern(&mut out),
            DEFAULT_INDENT,
            imports,
            imported_types,
            HashMap::new(),
            usize::MAX,
        );
        writer.push_package("com.example");
        writer
            .emit_code(&CodeBlock::of(
                "val x: %T",
                [Arg::ty(ClassName::new("com.squareup", ["Taco"]))],
            ))
            .unwrap();
        writer.pop_package();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(out, "val x: SquareTaco");
    }

    #[test]
    fn statement_continuation_lines_are_double_indented() {
        let out = write_with_limit(10, |writer| {
            writer
                .emit_code(
                    &CodeBlock::builder()
                        .add_statement("val x = aaa♢+ bbb♢+ ccc", [])
                        .build(),
                )
                .unwrap();
        });
        // Soft wraps inside a statement land at the double indent (the
        // wrapper gets indent level + 2).
        assert_eq!(out, "val x = aaa\n    + bbb\n    + ccc\n");
    }

    #[test]
    #[should_panic(expected = "Can't open a new statement")]
    fn reopening_a_statement_is_fatal() {
        let block = CodeBlock::builder().add("««", []).build();
        write(|writer| {
            let _ = writer.emit_code(&block);
        });
    }

    #[test]
    #[should_panic(expected = "Can't close a statement")]
    fn closing_an_unopened_statement_is_fatal() {
        let block = CodeBlock::builder().add("»", []).build();
        write(|writer| {
            let _ = writer.emit_code(&block);
        });
    }

    #[test]
    #[should_panic(expected = "cannot unindent")]
    fn unindent_below_zero_is_fatal() {
        write(|writer| writer.unindent(1));
    }

    #[test]
    fn comments_prefix_every_line() {
        let out = write(|writer| {
            writer
                .emit_comment(&CodeBlock::of("first\nsecond", []))
                .unwrap();
        });
        assert_eq!(out, "// first\n// second\n");
    }

    #[test]
    fn kdoc_wraps_in_a_comment_block() {
        let out = write(|writer| {
            writer
                .emit_kdoc(&CodeBlock::of("Hello\nworld", []))
                .unwrap();
        });
        assert_eq!(out, "/**\n * Hello\n * world\n */\n");
    }

    #[test]
    fn deferred_type_collapses_into_member_import() {
        let mut out = String::new();
        let mut imports = IndexMap::new();
        imports.insert(
            "kotlin.Unit.toString".to_string(),
            Import::new("kotlin.Unit.toString"),
        );
        let mut writer = CodeWriter::with_imports(
            Sink::Extern(&mut out),
            DEFAULT_INDENT,
            imports,
            HashMap::new(),
            HashMap::new(),
            usize::MAX,
        );
        writer.push_package("com.example");
        writer
            .emit_code(&CodeBlock::of(
                "val x = %T.toString()",
                [Arg::ty(builtins::unit())],
            ))
            .unwrap();
        writer.pop_package();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(out, "val x = toString()");
    }

    #[test]
    fn deferred_type_with_aliased_member_import() {
        let mut out = String::new();
        let mut imports = IndexMap::new();
        imports.insert(
            "kotlin.Unit.toString".to_string(),
            Import::aliased("kotlin.Unit.toString", "unitToString"),
        );
        let mut writer = CodeWriter::with_imports(
            Sink::Extern(&mut out),
            DEFAULT_INDENT,
            imports,
            HashMap::new(),
            HashMap::new(),
            usize::MAX,
        );
        writer.push_package("com.example");
        writer
            .emit_code(&CodeBlock::of(
                "val x = %T.toString()",
                [Arg::ty(builtins::unit())],
            ))
            .unwrap();
        writer.pop_package();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(out, "val x = unitToString()");
    }

    #[test]
    fn unmatched_member_access_emits_the_type() {
        let mut out = String::new();
        let mut imports = IndexMap::new();
        imports.insert(
            "kotlin.Unit.toString".to_string(),
            Import::new("kotlin.Unit.toString"),
        );
        let mut writer = CodeWriter::with_imports(
            Sink::Extern(&mut out),
            DEFAULT_INDENT,
            imports,
            HashMap::new(),
            HashMap::new(),
            usize::MAX,
        );
        writer.push_package("kotlin");
        writer
            .emit_code(&CodeBlock::of(
                "val x = %T.hashCode()",
                [Arg::ty(builtins::unit())],
            ))
            .unwrap();
        writer.pop_package();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(out, "val x = Unit.hashCode()");
    }

    #[test]
    fn member_lookup_prefers_imported_simple_name() {
        let mut out = String::new();
        let mut imported_members = HashMap::new();
        let abs = MemberName::new("kotlin.math", "abs");
        imported_members.insert("abs".to_string(), abs.clone());
        let mut writer = CodeWriter::with_imports(
            Sink::Extern(&mut out),
            DEFAULT_INDENT,
            IndexMap::new(),
            HashMap::new(),
            imported_members,
            usize::MAX,
        );
        writer.push_package("com.example");
        writer
            .emit_code(&CodeBlock::of("val x = %M(-1)", [Arg::member(abs)]))
            .unwrap();
        writer.pop_package();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(out, "val x = abs(-1)");
    }

    #[test]
    fn member_clashing_with_scope_function_is_not_suggested() {
        let mut out = String::new();
        let mut writer = CodeWriter::new(&mut out, DEFAULT_INDENT, usize::MAX);
        writer.push_package("com.example");
        let mut type_scope = TypeScope::new("Tacos");
        type_scope.function_names.push("abs".to_string());
        writer.push_type(type_scope);
        writer
            .emit_code(&CodeBlock::of(
                "val x = %M(-1)",
                [Arg::member(MemberName::new("kotlin.math", "abs"))],
            ))
            .unwrap();
        assert!(writer.suggested_member_imports().get("abs").is_none());
        writer.pop_type();
        writer.pop_package();
        writer.close().unwrap();
        drop(writer);
        assert_eq!(out, "val x = kotlin.math.abs(-1)");
    }

    #[test]
    fn type_variable_declarations_carry_bounds_and_variance() {
        let out = write(|writer| {
            let t = TypeVariableName::bounded_by("T", [builtins::number().into()]);
            let r = TypeVariableName::new("R")
                .with_variance(Variance::Out)
                .with_reified(true);
            writer.emit_type_variables(&[t, r]).unwrap();
        });
        assert_eq!(out, "<T : kotlin.Number, out reified R>");
    }

    #[test]
    fn where_block_lists_multiple_bounds() {
        let out = write(|writer| {
            let t = TypeVariableName::bounded_by(
                "T",
                [builtins::number().into(), builtins::comparable().into()],
            );
            writer.emit_where_block(&[t]).unwrap();
        });
        assert_eq!(
            out,
            " where T : kotlin.Number, T : kotlin.Comparable"
        );
    }
}
