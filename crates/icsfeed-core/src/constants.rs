/// Product identifier written to `PRODID` when none is configured.
pub const DEFAULT_PRODUCT_ID: &str = "DIDATE";

/// Extension of generated feed files when none is configured.
pub const DEFAULT_FEED_EXTENSION: &str = "ics";

/// Port the feed directory is published on by default.
pub const DEFAULT_SERVER_PORT: u16 = 8091;

/// Seconds between two regeneration cycles by default.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Suffix of the scratch file a feed is written to before it replaces the
/// published one.
pub const TEMP_FILE_SUFFIX: &str = "tmp";

pub const HEALTHCHECK_ROUTE_COMPONENT: &str = "healthcheck";
pub const HEALTHCHECK_ROUTE: &str = const_str::concat!("/", HEALTHCHECK_ROUTE_COMPONENT);
