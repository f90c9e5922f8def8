//! Escaping of free-text search input before it is embedded in a
//! case-insensitive regular-expression match (`~*` in Postgres).
//!
//! The escaped pattern matches the input literally as a substring. Both the
//! Postgres ARE engine and the `regex` crate read `\` followed by an ASCII
//! punctuation or whitespace character as that literal character.

/// Characters with pattern meaning that must be escaped.
const PATTERN_METACHARACTERS: &[char] = &[
    '-', '[', ']', '{', '}', '(', ')', '*', '+', '?', '.', ',', '\\', '^', '$', '|', '#',
];

/// Returns `input` with every pattern metacharacter and ASCII whitespace
/// character prefixed by a backslash.
///
/// Never fails. Non-ASCII characters are passed through untouched.
#[must_use]
pub fn sanitize_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() * 2);
    for c in input.chars() {
        if PATTERN_METACHARACTERS.contains(&c) || c.is_ascii_whitespace() {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
