//! Format-string IR for generated code.
//!
//! A [`CodeBlock`] is a fragment of a `.kt` file: a pre-split token
//! stream of literal text and placeholders, plus a positional argument
//! list. Code blocks are not necessarily well-formed Kotlin and are not
//! validated — kotlinc checks correctness later.
//!
//! Placeholders use a percent sign:
//! * `%L` emits a *literal* value with no escaping: strings, numbers,
//!   nested code blocks, annotations.
//! * `%N` emits a *name*, escaped to be a usable identifier.
//! * `%S` escapes the value as a *string* literal, wrapping it in double
//!   quotes and escaping `$` signs. A missing value emits `null`.
//! * `%P` is `%S` without the `$` escaping, for building string
//!   templates.
//! * `%T` emits a *type* reference, imported where possible.
//! * `%M` emits a *member* reference through the same import machinery.
//! * `%%` emits a percent sign.
//! * `♢` emits a space, or a newline plus continuation indent when the
//!   line passes the column limit. Spaces in plain text never wrap.
//! * `·` emits a space that never wraps.
//! * `⇥`/`⇤` increase/decrease the indentation level.
//! * `«`/`»` begin/end a statement; wrapped statement lines after the
//!   first are double-indented.

use std::fmt;

use kotgen_core::escape::escape_if_necessary;

use crate::code::CodeWriter;
use crate::spec::AnnotationSpec;
use crate::types::{ClassName, LambdaTypeName, MemberName, ParameterizedTypeName, TypeName,
    TypeVariableName, WildcardTypeName};

/// One token of a code block's format stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum FormatPart {
    /// Literal text, possibly containing `♢`/`·` markers and newlines.
    Text(String),
    /// `%L`
    Literal,
    /// `%N`
    Name,
    /// `%S`
    Str,
    /// `%P`
    Template,
    /// `%T`
    Type,
    /// `%M`
    Member,
    /// `%%`
    Percent,
    /// `⇥`
    Indent,
    /// `⇤`
    Unindent,
    /// `«`
    BeginStatement,
    /// `»`
    EndStatement,
}

/// A positional argument for a placeholder.
///
/// Construct arguments with the typed helpers ([`Arg::string`],
/// [`Arg::ty`], ...) or the `From` conversions for common value types;
/// numbers formatted through `From` get `_` digit grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arg {
    /// Pre-rendered literal text for `%L`.
    Literal(String),
    /// A nested code block, usable with `%L` and `%P`.
    Block(CodeBlock),
    /// An annotation emitted inline, for `%L`.
    Annotation(AnnotationSpec),
    /// An identifier for `%N`, escaped at construction.
    Name(String),
    /// A string value (or `None` for a literal `null`) for `%S`/`%P`.
    Str(Option<String>),
    /// A type reference for `%T`.
    Type(TypeName),
    /// A member reference for `%M`.
    Member(MemberName),
}

impl Arg {
    pub fn literal(value: impl Into<String>) -> Self {
        Arg::Literal(value.into())
    }

    pub fn block(value: CodeBlock) -> Self {
        Arg::Block(value)
    }

    pub fn annotation(value: AnnotationSpec) -> Self {
        Arg::Annotation(value)
    }

    /// A name argument. Escaped here, so `%N` can emit it verbatim.
    pub fn name(value: impl AsRef<str>) -> Self {
        Arg::Name(escape_if_necessary(value.as_ref()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Arg::Str(Some(value.into()))
    }

    /// The absent string: `%S`/`%P` emit a bare `null`.
    pub fn null() -> Self {
        Arg::Str(None)
    }

    pub fn ty(value: impl Into<TypeName>) -> Self {
        Arg::Type(value.into())
    }

    pub fn member(value: MemberName) -> Self {
        Arg::Member(value)
    }
}

impl From<CodeBlock> for Arg {
    fn from(value: CodeBlock) -> Self {
        Arg::Block(value)
    }
}

impl From<AnnotationSpec> for Arg {
    fn from(value: AnnotationSpec) -> Self {
        Arg::Annotation(value)
    }
}

impl From<TypeName> for Arg {
    fn from(value: TypeName) -> Self {
        Arg::Type(value)
    }
}

impl From<ClassName> for Arg {
    fn from(value: ClassName) -> Self {
        Arg::Type(value.into())
    }
}

impl From<ParameterizedTypeName> for Arg {
    fn from(value: ParameterizedTypeName) -> Self {
        Arg::Type(value.into())
    }
}

impl From<TypeVariableName> for Arg {
    fn from(value: TypeVariableName) -> Self {
        Arg::Type(value.into())
    }
}

impl From<WildcardTypeName> for Arg {
    fn from(value: WildcardTypeName) -> Self {
        Arg::Type(value.into())
    }
}

impl From<LambdaTypeName> for Arg {
    fn from(value: LambdaTypeName) -> Self {
        Arg::Type(value.into())
    }
}

impl From<MemberName> for Arg {
    fn from(value: MemberName) -> Self {
        Arg::Member(value)
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Literal(value.to_string())
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Literal(format_integer(i128::from(value)))
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Literal(format_integer(i128::from(value)))
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Arg::Literal(format_integer(i128::from(value)))
    }
}

impl From<u64> for Arg {
    fn from(value: u64) -> Self {
        Arg::Literal(format_integer(i128::from(value)))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Literal(format_float(value))
    }
}

/// Groups digits by thousands with `_`, Kotlin style: `1_000_000`.
fn format_integer(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let grouped = group_digits(&digits);
    if value < 0 { format!("-{grouped}") } else { grouped }
}

fn format_float(value: f64) -> String {
    let text = value.to_string();
    if text.contains(['e', 'E', 'N', 'i']) {
        // Scientific notation, NaN, infinity: pass through untouched.
        return text;
    }
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (text.as_str(), "0"),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    format!("{sign}{}.{frac_part}", group_digits(digits))
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == offset % 3 {
            grouped.push('_');
        }
        grouped.push(c);
    }
    grouped
}

/// A fragment of a Kotlin file: declarations, statements, documentation.
///
/// ```
/// use kotgen::{Arg, CodeBlock};
///
/// let block = CodeBlock::of("val greeting = %S", [Arg::string("hello")]);
/// assert_eq!(block.to_string(), "val greeting = \"hello\"");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodeBlock {
    pub(crate) parts: Vec<FormatPart>,
    pub(crate) args: Vec<Arg>,
}

impl CodeBlock {
    /// Builds a code block from one format string.
    ///
    /// Arguments are consumed left to right by default; a digit between
    /// `%` and the placeholder letter selects an argument by 1-based
    /// index instead (`%1T`), in which case every placeholder must be
    /// indexed.
    ///
    /// # Panics
    ///
    /// Panics on malformed format strings: dangling `%`, unknown
    /// placeholder letters, out-of-range or unused arguments, arguments
    /// whose kind can't satisfy their placeholder, and mixed indexed and
    /// relative placeholders.
    pub fn of(format: &str, args: impl IntoIterator<Item = Arg>) -> CodeBlock {
        CodeBlock::builder().add(format, args).build()
    }

    pub fn builder() -> CodeBlockBuilder {
        CodeBlockBuilder::new()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Joins `blocks` with `separator` between each pair.
    pub fn join(blocks: impl IntoIterator<Item = CodeBlock>, separator: &str) -> CodeBlock {
        Self::join_with(blocks, separator, "", "")
    }

    /// Joins `blocks` with `separator`, wrapped in `prefix` and
    /// `suffix`.
    pub fn join_with(
        blocks: impl IntoIterator<Item = CodeBlock>,
        separator: &str,
        prefix: &str,
        suffix: &str,
    ) -> CodeBlock {
        let mut builder = CodeBlock::builder();
        if !prefix.is_empty() {
            builder.parts.push(FormatPart::Text(prefix.to_string()));
        }
        for (index, block) in blocks.into_iter().enumerate() {
            if index > 0 {
                builder.parts.push(FormatPart::Text(separator.to_string()));
            }
            builder = builder.add_block(block);
        }
        if !suffix.is_empty() {
            builder.parts.push(FormatPart::Text(suffix.to_string()));
        }
        builder.build()
    }
}

impl fmt::Display for CodeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = CodeWriter::unbounded(f);
        out.emit_code(self).map_err(|_| fmt::Error)?;
        out.close().map_err(|_| fmt::Error)
    }
}

/// Builds a [`CodeBlock`] incrementally.
#[derive(Debug, Clone, Default)]
pub struct CodeBlockBuilder {
    parts: Vec<FormatPart>,
    args: Vec<Arg>,
}

impl CodeBlockBuilder {
    fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Adds code from a format string; see [`CodeBlock::of`] for the
    /// placeholder and argument rules.
    pub fn add(mut self, format: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        let args: Vec<Arg> = args.into_iter().collect();
        let mut has_relative = false;
        let mut has_indexed = false;
        let mut relative_count = 0usize;
        let mut indexed_count = vec![0usize; args.len()];

        let mut p = 0;
        while p < format.len() {
            let c = format[p..].chars().next().expect("p is a char boundary");
            match c {
                '⇥' => {
                    self.parts.push(FormatPart::Indent);
                    p += c.len_utf8();
                    continue;
                }
                '⇤' => {
                    self.parts.push(FormatPart::Unindent);
                    p += c.len_utf8();
                    continue;
                }
                '«' => {
                    self.parts.push(FormatPart::BeginStatement);
                    p += c.len_utf8();
                    continue;
                }
                '»' => {
                    self.parts.push(FormatPart::EndStatement);
                    p += c.len_utf8();
                    continue;
                }
                '%' => {}
                _ => {
                    let next = next_placeholder_position(format, p + c.len_utf8());
                    self.parts
                        .push(FormatPart::Text(format[p..next].to_string()));
                    p = next;
                    continue;
                }
            }

            p += 1; // '%'

            // Consume optional index digits, leaving `letter` as the
            // first non-digit character after the '%'.
            let index_start = p;
            let mut letter;
            loop {
                assert!(p < format.len(), "dangling format characters in '{format}'");
                letter = format[p..].chars().next().expect("p is a char boundary");
                p += letter.len_utf8();
                if !letter.is_ascii_digit() {
                    break;
                }
            }
            let index_end = p - letter.len_utf8();

            if letter == '%' {
                assert!(index_start == index_end, "%% may not have an index");
                self.parts.push(FormatPart::Percent);
                continue;
            }

            let index = if index_start < index_end {
                has_indexed = true;
                let one_based: usize = format[index_start..index_end]
                    .parse()
                    .expect("index is all digits");
                assert!(
                    one_based >= 1 && one_based <= args.len(),
                    "index {one_based} for '%{}{letter}' not in range (received {} arguments)",
                    &format[index_start..index_end],
                    args.len()
                );
                indexed_count[one_based - 1] += 1;
                one_based - 1
            } else {
                has_relative = true;
                relative_count += 1;
                let index = relative_count - 1;
                assert!(
                    index < args.len(),
                    "index {} for '%{letter}' not in range (received {} arguments)",
                    index + 1,
                    args.len()
                );
                index
            };
            assert!(
                !(has_indexed && has_relative),
                "cannot mix indexed and positional parameters"
            );

            self.push_placeholder(letter, args[index].clone(), format);
        }

        if has_relative {
            assert!(
                relative_count >= args.len(),
                "unused arguments: expected {relative_count}, received {}",
                args.len()
            );
        }
        if has_indexed {
            let unused: Vec<String> = indexed_count
                .iter()
                .enumerate()
                .filter(|(_, count)| **count == 0)
                .map(|(i, _)| format!("%{}", i + 1))
                .collect();
            assert!(
                unused.is_empty(),
                "unused argument{}: {}",
                if unused.len() == 1 { "" } else { "s" },
                unused.join(", ")
            );
        }
        self
    }

    fn push_placeholder(&mut self, letter: char, arg: Arg, format: &str) {
        match letter {
            'L' => {
                let arg = match arg {
                    Arg::Literal(_) | Arg::Block(_) | Arg::Annotation(_) => arg,
                    Arg::Name(name) => Arg::Literal(name),
                    Arg::Str(Some(text)) => Arg::Literal(text),
                    Arg::Str(None) => Arg::Literal("null".to_string()),
                    Arg::Type(ty) => Arg::Literal(ty.to_string()),
                    Arg::Member(member) => Arg::Literal(member.canonical_name()),
                };
                self.parts.push(FormatPart::Literal);
                self.args.push(arg);
            }
            'N' => {
                let arg = match arg {
                    Arg::Name(_) => arg,
                    Arg::Str(Some(name)) | Arg::Literal(name) => {
                        Arg::Name(escape_if_necessary(&name))
                    }
                    Arg::Member(member) => Arg::Name(escape_if_necessary(member.simple_name())),
                    other => panic!("expected name but was {other:?}"),
                };
                self.parts.push(FormatPart::Name);
                self.args.push(arg);
            }
            'S' => {
                let arg = match arg {
                    Arg::Str(_) => arg,
                    Arg::Literal(text) | Arg::Name(text) => Arg::Str(Some(text)),
                    other => panic!("expected string but was {other:?}"),
                };
                self.parts.push(FormatPart::Str);
                self.args.push(arg);
            }
            'P' => {
                let arg = match arg {
                    Arg::Str(_) | Arg::Block(_) => arg,
                    Arg::Literal(text) | Arg::Name(text) => Arg::Str(Some(text)),
                    other => panic!("expected string or code block but was {other:?}"),
                };
                self.parts.push(FormatPart::Template);
                self.args.push(arg);
            }
            'T' => {
                assert!(
                    matches!(arg, Arg::Type(_)),
                    "expected type but was {arg:?}"
                );
                self.parts.push(FormatPart::Type);
                self.args.push(arg);
            }
            'M' => {
                assert!(
                    matches!(arg, Arg::Member(_)),
                    "expected member but was {arg:?}"
                );
                self.parts.push(FormatPart::Member);
                self.args.push(arg);
            }
            _ => panic!("invalid format string: '{format}'"),
        }
    }

    /// Appends an already-built block.
    pub fn add_block(mut self, block: CodeBlock) -> Self {
        self.parts.extend(block.parts);
        self.args.extend(block.args);
        self
    }

    /// Adds a complete statement: the format plus a trailing newline,
    /// wrapped in statement markers so continuation lines double-indent.
    pub fn add_statement(self, format: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        self.add("«", [])
            .add(format, args)
            .add("\n»", [])
    }

    /// Opens a control-flow block: `if (foo == 5)` becomes
    /// `if (foo == 5) {` followed by an indent. An opening brace already
    /// at the end of the text is kept.
    pub fn begin_control_flow(self, control_flow: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        let text = with_opening_brace(control_flow);
        self.add(&text, args).indent()
    }

    /// Continues control flow: `else if (foo == 10)` becomes
    /// `} else if (foo == 10) {`.
    pub fn next_control_flow(self, control_flow: &str, args: impl IntoIterator<Item = Arg>) -> Self {
        self.unindent()
            .add(&format!("}} {control_flow} {{\n"), args)
            .indent()
    }

    pub fn end_control_flow(self) -> Self {
        self.unindent().add("}\n", [])
    }

    pub fn indent(mut self) -> Self {
        self.parts.push(FormatPart::Indent);
        self
    }

    pub fn unindent(mut self) -> Self {
        self.parts.push(FormatPart::Unindent);
        self
    }

    /// Runs `f` between an indent and an unindent.
    pub fn with_indent(self, f: impl FnOnce(Self) -> Self) -> Self {
        f(self.indent()).unindent()
    }

    pub fn build(self) -> CodeBlock {
        CodeBlock {
            parts: self.parts,
            args: self.args,
        }
    }
}

fn with_opening_brace(control_flow: &str) -> String {
    for c in control_flow.chars().rev() {
        if c == '{' {
            return format!("{control_flow}\n");
        }
        if c == '}' {
            break;
        }
    }
    format!("{control_flow} {{\n")
}

fn next_placeholder_position(format: &str, start: usize) -> usize {
    format[start..]
        .find(['%', '«', '»', '⇥', '⇤'])
        .map_or(format.len(), |offset| start + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::builtins;

    #[test]
    fn plain_text_is_one_part() {
        let block = CodeBlock::of("val x = 1\n", []);
        assert_eq!(block.to_string(), "val x = 1\n");
    }

    #[test]
    fn percent_escape() {
        let block = CodeBlock::of("100%%", []);
        assert_eq!(block.to_string(), "100%");
    }

    #[test]
    fn string_placeholder_escapes() {
        let block = CodeBlock::of("%S", [Arg::string("6\" sandwich")]);
        assert_eq!(block.to_string(), "\"6\\\" sandwich\"");
    }

    #[test]
    fn null_string_emits_bare_null() {
        let block = CodeBlock::of("val x = %S", [Arg::null()]);
        assert_eq!(block.to_string(), "val x = null");
    }

    #[test]
    fn template_keeps_dollar_signs() {
        let escaped = CodeBlock::of("%S", [Arg::string("Hi, $name")]);
        assert_eq!(escaped.to_string(), "\"Hi, ${'$'}name\"");
        let template = CodeBlock::of("%P", [Arg::string("Hi, $name")]);
        assert_eq!(template.to_string(), "\"\"\"Hi, $name\"\"\"");
    }

    #[test]
    fn name_placeholder_escapes_keywords() {
        let block = CodeBlock::of("val %N = 1", [Arg::name("when")]);
        assert_eq!(block.to_string(), "val `when` = 1");
    }

    #[test]
    fn type_placeholder_renders_canonically_without_imports() {
        let block = CodeBlock::of("val x: %T", [Arg::ty(builtins::string())]);
        assert_eq!(block.to_string(), "val x: kotlin.String");
    }

    #[test]
    fn literal_numbers_group_digits() {
        let block = CodeBlock::of("%L", [Arg::from(1_000_000i64)]);
        assert_eq!(block.to_string(), "1_000_000");
        let block = CodeBlock::of("%L", [Arg::from(-9_876i32)]);
        assert_eq!(block.to_string(), "-9_876");
        let block = CodeBlock::of("%L", [Arg::from(1234.5f64)]);
        assert_eq!(block.to_string(), "1_234.5");
        let block = CodeBlock::of("%L", [Arg::from(5.0f64)]);
        assert_eq!(block.to_string(), "5.0");
    }

    #[test]
    fn annotations_as_literals_render_inline() {
        let annotation = crate::spec::AnnotationSpec::new(ClassName::new(
            "kotlin.jvm",
            ["JvmStatic"],
        ));
        let block = CodeBlock::of("%L fun of()", [Arg::annotation(annotation)]);
        assert_eq!(block.to_string(), "@kotlin.jvm.JvmStatic fun of()");
    }

    #[test]
    fn nested_blocks_emit_in_place() {
        let inner = CodeBlock::of("listOf(%S)", [Arg::string("taco")]);
        let outer = CodeBlock::of("val menu = %L", [Arg::block(inner)]);
        assert_eq!(outer.to_string(), "val menu = listOf(\"taco\")");
    }

    #[test]
    fn indexed_arguments_may_repeat() {
        let block = CodeBlock::of("%1N == %1N", [Arg::name("taco")]);
        assert_eq!(block.to_string(), "taco == taco");
    }

    #[test]
    #[should_panic(expected = "cannot mix indexed and positional parameters")]
    fn mixing_indexed_and_relative_is_fatal() {
        CodeBlock::of("%1N %N", [Arg::name("a"), Arg::name("b")]);
    }

    #[test]
    #[should_panic(expected = "unused argument")]
    fn unused_indexed_argument_is_fatal() {
        CodeBlock::of("%1N", [Arg::name("a"), Arg::name("b")]);
    }

    #[test]
    #[should_panic(expected = "unused arguments")]
    fn unused_relative_argument_is_fatal() {
        CodeBlock::of("%N", [Arg::name("a"), Arg::name("b")]);
    }

    #[test]
    #[should_panic(expected = "dangling format characters")]
    fn dangling_percent_is_fatal() {
        CodeBlock::of("value: %", []);
    }

    #[test]
    #[should_panic(expected = "invalid format string")]
    fn unknown_placeholder_is_fatal() {
        CodeBlock::of("%X", [Arg::literal("x")]);
    }

    #[test]
    #[should_panic(expected = "expected type but was")]
    fn type_placeholder_rejects_other_arguments() {
        CodeBlock::of("%T", [Arg::string("kotlin.String")]);
    }

    #[test]
    fn control_flow_braces() {
        let block = CodeBlock::builder()
            .begin_control_flow("if (taco.isSpicy)", [])
            .add_statement("dispense(%S)", [Arg::string("milk")])
            .next_control_flow("else", [])
            .add_statement("dispense(%S)", [Arg::string("salsa")])
            .end_control_flow()
            .build();
        assert_eq!(
            block.to_string(),
            "if (taco.isSpicy) {\n  dispense(\"milk\")\n} else {\n  dispense(\"salsa\")\n}\n"
        );
    }

    #[test]
    fn begin_control_flow_keeps_existing_brace() {
        let block = CodeBlock::builder()
            .begin_control_flow("list.forEach { element ->", [])
            .add_statement("println(element)", [])
            .end_control_flow()
            .build();
        assert_eq!(
            block.to_string(),
            "list.forEach { element ->\n  println(element)\n}\n"
        );
    }

    #[test]
    fn with_indent_scopes_an_indent_level() {
        let block = CodeBlock::builder()
            .add("object : Runnable {\n", [])
            .with_indent(|builder| builder.add("override fun run() = Unit\n", []))
            .add("}\n", [])
            .build();
        assert_eq!(
            block.to_string(),
            "object : Runnable {\n  override fun run() = Unit\n}\n"
        );
    }

    #[test]
    fn join_separates_blocks() {
        let joined = CodeBlock::join(
            vec![
                CodeBlock::of("%S", [Arg::string("a")]),
                CodeBlock::of("%L", [Arg::literal("b")]),
            ],
            " + ",
        );
        assert_eq!(joined.to_string(), "\"a\" + b");
    }

    #[test]
    fn join_with_prefix_and_suffix() {
        let joined = CodeBlock::join_with(
            vec![CodeBlock::of("1", []), CodeBlock::of("2", [])],
            ", ",
            "listOf(",
            ")",
        );
        assert_eq!(joined.to_string(), "listOf(1, 2)");
    }
}
