//! TEXT value escaping, applied by the `escape` template filter.

use std::borrow::Cow;

const SPECIAL: [char; 5] = ['\\', ',', ';', '\n', '\r'];

/// ## Summary
/// Escapes `value` as an RFC 5545 TEXT value.
///
/// `\`, `,` and `;` get a backslash prefix and line breaks become `\n`.
/// CRLF and a lone CR both count as one line break.
#[must_use]
pub fn escape_text(value: &str) -> Cow<'_, str> {
    if !value.contains(SPECIAL) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' | ',' | ';' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\n' => escaped.push_str("\\n"),
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    escaped.push_str("\\n");
                }
            }
            _ => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}
