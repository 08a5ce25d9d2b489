//! Identifier validation and escaping.
//!
//! Kotlin allows almost any name to appear in source as long as it is
//! quoted with backticks, but a handful of characters are illegal even
//! inside backticks, and import aliases cannot be backticked at all
//! (KT-18706), so aliases get their own mangling scheme.

use crate::keywords::is_keyword;

/// Characters that stay illegal even inside a backticked identifier.
///
/// From the Kotlin compiler's `JvmSimpleNameBacktickChecker`.
const ILLEGAL_CHARACTERS_TO_ESCAPE: &[char] = &['.', ';', '[', ']', '/', '<', '>', ':', '\\'];

/// Whether `c` can start an identifier.
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Whether `c` can appear after the first character of an identifier.
pub fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_numeric()
}

/// Whether `name` consists solely of identifier characters. Keywords are
/// the caller's concern; this checks characters only.
fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => is_identifier_start(first) && chars.all(is_identifier_part),
        None => false,
    }
}

fn already_escaped(name: &str) -> bool {
    name.starts_with('`') && name.ends_with('`') && name.len() >= 2
}

fn has_dollar_sign(name: &str) -> bool {
    name.contains('$')
}

fn all_characters_are_underscore(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c == '_')
}

/// `\uXXXX` escape for an ISO control or otherwise unprintable character.
pub(crate) fn format_iso_control_code(code: u32) -> String {
    format!("\\u{code:04x}")
}

// Backticks don't make these characters legal, so escaping cannot help.
fn fail_if_escape_invalid(name: &str) {
    let illegal: String = name
        .chars()
        .filter(|c| ILLEGAL_CHARACTERS_TO_ESCAPE.contains(c))
        .collect();
    assert!(
        illegal.is_empty(),
        "can't escape identifier {name} because it contains illegal characters: {illegal}"
    );
}

/// Returns `name` quoted with backticks when it would otherwise not be a
/// valid Kotlin identifier: keywords, names containing `$`, names made
/// entirely of underscores, and names with non-identifier characters.
///
/// # Panics
///
/// Panics if `name` contains a character that is illegal even inside
/// backticks (`.`, `;`, `[`, `]`, `/`, `<`, `>`, `:`, `\`).
pub fn escape_if_necessary(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let needs_backticks = !already_escaped(name)
        && (!is_plain_identifier(name)
            || is_keyword(name)
            || has_dollar_sign(name)
            || all_characters_are_underscore(name));
    let escaped = if needs_backticks {
        format!("`{name}`")
    } else {
        name.to_string()
    };
    fail_if_escape_invalid(&escaped);
    escaped
}

/// Escapes `name` for use as an import alias.
///
/// Aliases escaped with backticks do not resolve (KT-18706), so a custom
/// scheme is used instead:
/// - if all characters are underscores, a `0` is appended
/// - keywords are prefixed with `__`
/// - a leading character that cannot start an identifier gets a `_` prefix
/// - every `$` becomes `__`
/// - every other non-identifier character becomes `_Uxxxx` with the
///   character's code in hexadecimal
///
/// # Panics
///
/// Panics if the result still contains characters illegal in identifiers.
pub fn escape_as_alias(name: &str) -> String {
    if all_characters_are_underscore(name) {
        return format!("{name}0");
    }
    if is_keyword(name) {
        return format!("__{name}");
    }

    let mut alias = String::new();
    if let Some(first) = name.chars().next() {
        if !is_identifier_start(first) {
            alias.push('_');
        }
    }
    for c in name.chars() {
        if c == '$' {
            alias.push_str("__");
        } else if !is_identifier_part(c) {
            alias.push_str("_U");
            alias.push_str(&format!("{:04x}", c as u32));
        } else {
            alias.push(c);
        }
    }
    fail_if_escape_invalid(&alias);
    alias
}

/// Splits `name` on `.` and escapes each non-empty segment independently,
/// so `com.example.when.Taco` backticks only its `when` segment.
pub fn escape_segments_if_necessary(name: &str) -> String {
    name.split('.')
        .filter(|segment| !segment.is_empty())
        .map(escape_if_necessary)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(escape_if_necessary("taco"), "taco");
        assert_eq!(escape_if_necessary("taco7"), "taco7");
        assert_eq!(escape_if_necessary("_taco"), "_taco");
    }

    #[test]
    fn keywords_are_backticked() {
        assert_eq!(escape_if_necessary("when"), "`when`");
        assert_eq!(escape_if_necessary("fun"), "`fun`");
    }

    #[test]
    fn dollar_signs_are_backticked() {
        assert_eq!(escape_if_necessary("taco$wrapper"), "`taco$wrapper`");
    }

    #[test]
    fn underscores_only_is_backticked() {
        assert_eq!(escape_if_necessary("__"), "`__`");
    }

    #[test]
    fn spaces_are_backticked() {
        assert_eq!(escape_if_necessary("with space"), "`with space`");
    }

    #[test]
    fn already_escaped_is_untouched() {
        assert_eq!(escape_if_necessary("`when`"), "`when`");
    }

    #[test]
    #[should_panic(expected = "illegal characters")]
    fn illegal_characters_fail_loudly() {
        escape_if_necessary("taco;");
    }

    #[test]
    fn segments_are_escaped_independently() {
        assert_eq!(
            escape_segments_if_necessary("com.example.when.Taco"),
            "com.example.`when`.Taco"
        );
        assert_eq!(escape_segments_if_necessary("Taco"), "Taco");
    }

    #[test]
    fn alias_escaping() {
        assert_eq!(escape_as_alias("plain"), "plain");
        assert_eq!(escape_as_alias("___"), "___0");
        assert_eq!(escape_as_alias("object"), "__object");
        assert_eq!(escape_as_alias("1st"), "_1st");
        assert_eq!(escape_as_alias("pre$post"), "pre__post");
        assert_eq!(escape_as_alias("with space"), "with_U0020space");
    }
}
