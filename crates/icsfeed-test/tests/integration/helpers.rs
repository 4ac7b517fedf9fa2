#![expect(clippy::expect_used)]
//! Shared fixtures: a template on disk and an output directory per test.

use std::path::{Path, PathBuf};

use icsfeed_test::icsfeed_core::config::FeedConfig;
use tempfile::TempDir;

pub use icsfeed_test::{MemoryProvider, event};

/// The entry template shipped in `templates/`, inlined.
pub const EVENT_TEMPLATE: &str = "BEGIN:VEVENT\n\
UID:{{ uid }}\n\
DTSTAMP:{{ last_modified }}\n\
SUMMARY:{{ summary | escape }}\n\
DESCRIPTION:{{ description | escape }}\n\
DTSTART:{{ start }}\n\
DTEND:{{ end }}\n\
LAST-MODIFIED:{{ last_modified }}\n\
LOCATION:{{ location | escape }}\n\
END:VEVENT";

pub const HEADER: &str = "BEGIN:VCALENDAR\nMETHOD:PUBLISH\nPRODID:-//DIDATE//EN\nVERSION:2.0";

/// A temporary template file and output directory.
pub struct Workspace {
    _dir: TempDir,
    pub config: FeedConfig,
}

impl Workspace {
    /// ## Panics
    /// Panics if the temporary files cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::with_template(EVENT_TEMPLATE)
    }

    /// ## Panics
    /// Panics if the temporary files cannot be created.
    #[must_use]
    pub fn with_template(source: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let template = dir.path().join("event.ics.tmpl");
        let destination = dir.path().join("out");
        std::fs::write(&template, source).expect("write template");
        std::fs::create_dir(&destination).expect("create output directory");

        Self {
            config: FeedConfig {
                template,
                destination,
                product_id: "DIDATE".to_string(),
                extension: "ics".to_string(),
            },
            _dir: dir,
        }
    }

    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.config.destination
    }

    #[must_use]
    pub fn feed_path(&self, category_id: i64) -> PathBuf {
        self.config.feed_path(category_id)
    }

    /// Contents of the feed for `category_id`, if it exists.
    #[must_use]
    pub fn read_feed(&self, category_id: i64) -> Option<String> {
        std::fs::read_to_string(self.feed_path(category_id)).ok()
    }

    /// ## Panics
    /// Panics if the file cannot be written.
    pub fn seed_feed(&self, category_id: i64, contents: &str) {
        std::fs::write(self.feed_path(category_id), contents).expect("seed feed");
    }

    /// ## Panics
    /// Panics if the template cannot be rewritten.
    pub fn replace_template(&self, source: &str) {
        std::fs::write(&self.config.template, source).expect("rewrite template");
    }

    /// Sorted names of every entry in the output directory.
    ///
    /// ## Panics
    /// Panics if the directory cannot be read.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.destination())
            .expect("read output directory")
            .map(|entry| {
                entry
                    .expect("directory entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

/// The `VEVENT` blocks of a feed document, each without its `BEGIN` and
/// `END` lines.
#[must_use]
pub fn event_blocks(document: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in document.lines() {
        match line {
            "BEGIN:VEVENT" => current = Some(Vec::new()),
            "END:VEVENT" => blocks.extend(current.take()),
            _ => {
                if let Some(block) = current.as_mut() {
                    block.push(line);
                }
            }
        }
    }
    blocks
}

/// Every `UID:` value in a feed document, in order.
#[must_use]
pub fn uids(document: &str) -> Vec<&str> {
    document
        .lines()
        .filter_map(|line| line.strip_prefix("UID:"))
        .collect()
}
