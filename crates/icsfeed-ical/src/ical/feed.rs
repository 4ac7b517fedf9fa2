//! The `VCALENDAR` envelope around rendered entry blocks.

use super::entry::CalendarEntry;
use super::template::EntryTemplate;
use crate::error::TemplateResult;

/// Last line of every feed document.
pub const FEED_FOOTER: &str = "END:VCALENDAR";

/// Fixed framing of a feed document.
///
/// Lines are separated by `\n` and the document does not end with a line
/// break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEnvelope {
    header: String,
}

impl FeedEnvelope {
    #[must_use]
    pub fn new(product_id: &str) -> Self {
        Self {
            header: format!(
                "BEGIN:VCALENDAR\nMETHOD:PUBLISH\nPRODID:-//{product_id}//EN\nVERSION:2.0"
            ),
        }
    }

    /// ## Summary
    /// Returns the header lines, without a trailing line break.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// ## Summary
    /// Frames already rendered entry blocks, one line break before each block
    /// and before the footer.
    ///
    /// An empty sequence yields the header directly followed by the footer.
    #[must_use]
    pub fn render_feed<I, S>(&self, blocks: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut document = self.header.clone();
        for block in blocks {
            document.push('\n');
            document.push_str(block.as_ref());
        }
        document.push('\n');
        document.push_str(FEED_FOOTER);
        document
    }

    /// ## Summary
    /// Renders every entry with `template` and frames the result.
    ///
    /// ## Errors
    /// Returns the first error raised while rendering an entry.
    pub fn render_entries(
        &self,
        template: &EntryTemplate,
        entries: &[CalendarEntry],
    ) -> TemplateResult<String> {
        let blocks = entries
            .iter()
            .map(|entry| template.render(entry))
            .collect::<TemplateResult<Vec<_>>>()?;

        Ok(self.render_feed(blocks))
    }
}
