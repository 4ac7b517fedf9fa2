//! Field-substitution templates for entry blocks.
//!
//! A template is literal text with `{{ field }}` placeholders. A placeholder
//! may apply a filter: `{{ summary | escape }}` escapes the value as an
//! iCalendar TEXT value.
//!
//! Field names are matched ignoring case, underscores and a leading `.`, so
//! `{{ last_modified }}`, `{{LastModified}}` and `{{.LastModified}}` are the
//! same placeholder. `start` and `end` also answer to `StartDate` and
//! `EndDate`. `created` (or `CreatedDate`) is accepted for compatibility
//! with existing templates and always renders empty, since the store keeps
//! no creation time.

use std::fmt::Write as _;
use std::path::Path;

use super::entry::CalendarEntry;
use super::escape::escape_text;
use crate::error::{TemplateError, TemplateResult};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A calendar entry value a placeholder can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Uid,
    Summary,
    Description,
    Start,
    End,
    LastModified,
    Location,
    /// Always empty.
    Created,
}

impl Field {
    /// ## Summary
    /// Resolves a placeholder name to a field.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .strip_prefix('.')
            .unwrap_or(name)
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "uid" => Some(Self::Uid),
            "summary" => Some(Self::Summary),
            "description" => Some(Self::Description),
            "start" | "startdate" => Some(Self::Start),
            "end" | "enddate" => Some(Self::End),
            "lastmodified" => Some(Self::LastModified),
            "location" => Some(Self::Location),
            "created" | "createddate" => Some(Self::Created),
            _ => None,
        }
    }

    fn value(self, entry: &CalendarEntry) -> &str {
        match self {
            Self::Uid => &entry.uid,
            Self::Summary => &entry.summary,
            Self::Description => &entry.description,
            Self::Start => &entry.start_stamp,
            Self::End => &entry.end_stamp,
            Self::LastModified => &entry.last_modified_stamp,
            Self::Location => &entry.location,
            Self::Created => "",
        }
    }
}

/// A transformation applied to a field value before substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// RFC 5545 TEXT escaping.
    Escape,
}

impl Filter {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "escape" => Some(Self::Escape),
            _ => None,
        }
    }

    fn apply(self, out: &mut String, value: &str) -> std::fmt::Result {
        match self {
            Self::Escape => out.write_str(&escape_text(value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { field: Field, filters: Vec<Filter> },
}

/// A parsed entry template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTemplate {
    segments: Vec<Segment>,
}

impl EntryTemplate {
    /// ## Summary
    /// Parses template source text.
    ///
    /// ## Errors
    /// Returns `TemplateError::Parse` with the 1-based line of the offending
    /// placeholder if a placeholder is unclosed, empty, names an unknown field
    /// or applies an unknown filter.
    pub fn parse(source: &str) -> TemplateResult<Self> {
        let mut segments = Vec::new();
        let mut offset = 0;

        while let Some(relative_open) = source[offset..].find(OPEN) {
            let open = offset + relative_open;
            if open > offset {
                segments.push(Segment::Literal(source[offset..open].to_string()));
            }

            let inner_start = open + OPEN.len();
            let Some(relative_close) = source[inner_start..].find(CLOSE) else {
                return Err(parse_error(source, open, "unclosed placeholder"));
            };
            let inner_end = inner_start + relative_close;

            segments.push(parse_placeholder(source, open, &source[inner_start..inner_end])?);
            offset = inner_end + CLOSE.len();
        }

        if offset < source.len() {
            segments.push(Segment::Literal(source[offset..].to_string()));
        }

        Ok(Self { segments })
    }

    /// ## Summary
    /// Reads and parses the template at `path`.
    ///
    /// ## Errors
    /// Returns `TemplateError::Read` if the file cannot be read and
    /// `TemplateError::Parse` if its contents are not a valid template.
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub async fn load(path: &Path) -> TemplateResult<Self> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TemplateError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let template = Self::parse(&source)?;

        tracing::debug!(segments = template.segments.len(), "Template loaded");

        Ok(template)
    }

    /// ## Summary
    /// Substitutes the fields of `entry` into the template.
    ///
    /// ## Errors
    /// Returns `TemplateError::Render` if writing the output fails.
    pub fn render(&self, entry: &CalendarEntry) -> TemplateResult<String> {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.write_str(text)?,
                Segment::Placeholder { field, filters } => {
                    render_value(&mut out, field.value(entry), filters)?;
                }
            }
        }

        Ok(out)
    }

    /// ## Summary
    /// Returns whether any placeholder substitutes `field`.
    #[must_use]
    pub fn references(&self, field: Field) -> bool {
        self.segments.iter().any(
            |segment| matches!(segment, Segment::Placeholder { field: f, .. } if *f == field),
        )
    }
}

fn render_value(out: &mut String, value: &str, filters: &[Filter]) -> std::fmt::Result {
    match filters.split_last() {
        None => out.write_str(value),
        Some((last, rest)) => {
            let mut current = value.to_string();
            for filter in rest {
                let mut next = String::with_capacity(current.len());
                filter.apply(&mut next, &current)?;
                current = next;
            }
            last.apply(out, &current)
        }
    }
}

fn parse_placeholder(source: &str, open: usize, inner: &str) -> TemplateResult<Segment> {
    let mut parts = inner.split('|').map(str::trim);

    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(parse_error(source, open, "empty placeholder"));
    }

    let field = Field::from_name(name)
        .ok_or_else(|| parse_error(source, open, &format!("unknown field `{name}`")))?;

    let filters = parts
        .map(|filter| {
            Filter::from_name(filter)
                .ok_or_else(|| parse_error(source, open, &format!("unknown filter `{filter}`")))
        })
        .collect::<TemplateResult<Vec<_>>>()?;

    Ok(Segment::Placeholder { field, filters })
}

fn parse_error(source: &str, offset: usize, message: &str) -> TemplateError {
    TemplateError::Parse {
        line: source[..offset].matches('\n').count() + 1,
        message: message.to_string(),
    }
}
