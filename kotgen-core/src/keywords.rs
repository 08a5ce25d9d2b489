//! The Kotlin keyword table.
//!
//! Process-wide read-only data, initialized once at startup. See
//! <https://kotlinlang.org/docs/keyword-reference.html>.

/// Every identifier that must be escaped with backticks (or avoided
/// entirely when allocating fresh names) to be usable in Kotlin source.
///
/// Hard keywords, soft keywords, and modifier keywords are all included:
/// soft and modifier keywords are only reserved in certain positions, but
/// generated code cannot know its surrounding position, so kotgen treats
/// all of them as reserved.
pub const KEYWORDS: &[&str] = &[
    // Hard keywords
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
    // Soft keywords
    "by", "catch", "constructor", "delegate", "dynamic", "field", "file", "finally", "get",
    "import", "init", "param", "property", "receiver", "set", "setparam", "where",
    // Modifier keywords
    "actual", "abstract", "annotation", "companion", "const", "crossinline", "data", "enum",
    "expect", "external", "final", "infix", "inline", "inner", "internal", "lateinit", "noinline",
    "open", "operator", "out", "override", "private", "protected", "public", "reified", "sealed",
    "suspend", "tailrec", "value", "vararg",
    // No longer keywords but still break unescaped code (KT-52315)
    "header", "impl",
    // Other reserved words
    "yield",
];

/// Whether `name` is a Kotlin keyword.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_keywords_are_reserved() {
        assert!(is_keyword("when"));
        assert!(is_keyword("fun"));
        assert!(is_keyword("object"));
    }

    #[test]
    fn soft_and_modifier_keywords_are_reserved() {
        assert!(is_keyword("by"));
        assert!(is_keyword("suspend"));
        assert!(is_keyword("companion"));
    }

    #[test]
    fn ordinary_names_are_not_reserved() {
        assert!(!is_keyword("whenever"));
        assert!(!is_keyword("funky"));
        assert!(!is_keyword(""));
    }
}
