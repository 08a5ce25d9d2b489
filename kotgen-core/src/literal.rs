//! Kotlin string and character literal rendering.

use crate::escape::format_iso_control_code;

fn is_iso_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}

/// Returns the escaped form of `c` as it appears between double quotes,
/// without surrounding quotes.
pub fn character_literal_without_single_quotes(c: char) -> String {
    match c {
        '\u{0008}' => "\\b".to_string(),
        '\t' => "\\t".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '"' => "\"".to_string(),
        '\'' => "\\'".to_string(),
        '\\' => "\\\\".to_string(),
        c if is_iso_control(c) => format_iso_control_code(c as u32),
        c => c.to_string(),
    }
}

/// Returns the Kotlin string literal representing `value`, including
/// wrapping quotes.
///
/// Multi-line values become triple-quoted raw strings with a `|` margin
/// and a trailing `.trimMargin()`, unless `constant_context` is set (a
/// raw string is not a constant expression, so annotation arguments must
/// stay single-line). `inside_raw_string` suppresses `$` escaping so the
/// value can carry string-template expressions.
pub fn string_literal_with_quotes(
    value: &str,
    inside_raw_string: bool,
    constant_context: bool,
) -> String {
    if !constant_context && value.contains('\n') {
        let mut result = String::with_capacity(value.len() + 32);
        result.push_str("\"\"\"\n|");
        let mut rest = value;
        while let Some(c) = rest.chars().next() {
            if rest.starts_with("\"\"\"") {
                // Don't inadvertently end the raw string too early.
                result.push_str("\"\"${'\"'}");
                rest = &rest[3..];
            } else if c == '\n' {
                // The '|' margin is removed by trimMargin().
                result.push_str("\n|");
                rest = &rest[1..];
            } else if c == '$' && !inside_raw_string {
                result.push_str("${'$'}");
                rest = &rest[1..];
            } else {
                result.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
        // If the last-emitted character wasn't a margin '|', add a blank
        // line for trimMargin() to swallow.
        if !value.ends_with('\n') {
            result.push('\n');
        }
        result.push_str("\"\"\".trimMargin()");
        result
    } else {
        let mut result = String::with_capacity(value.len() + 32);
        result.push_str(if inside_raw_string { "\"\"\"" } else { "\"" });
        for c in value.chars() {
            if c == '\'' {
                result.push('\'');
                continue;
            }
            if c == '"' && !inside_raw_string {
                result.push_str("\\\"");
                continue;
            }
            if c == '$' && !inside_raw_string {
                result.push_str("${'$'}");
                continue;
            }
            if inside_raw_string {
                result.push(c);
            } else {
                result.push_str(&character_literal_without_single_quotes(c));
            }
        }
        result.push_str(if inside_raw_string { "\"\"\"" } else { "\"" });
        result
    }
}
