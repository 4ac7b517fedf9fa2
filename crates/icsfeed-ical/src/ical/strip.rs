//! HTML tag removal.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex_lite::Regex;

/// Comments, and anything that opens like an element, closing tag,
/// declaration or processing instruction, up to the next `>`.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used)]
    Regex::new(r"(?s)<!--.*?-->|<[A-Za-z/!?][^>]*>").expect("tag pattern is valid")
});

/// ## Summary
/// Removes markup tags from `html`, leaving the text between them.
///
/// Entities such as `&amp;` are passed through undecoded. A `<` that does not
/// start a tag (e.g. `a < b`) is kept as text.
#[must_use]
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    TAG_PATTERN.replace_all(html, "")
}
