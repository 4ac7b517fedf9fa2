//! Basic-format UTC date-time stamps.

use chrono::{DateTime, SecondsFormat, Utc};

/// `0000-01-01T00:00:00Z`, the earliest instant with a four digit year.
const MIN_EPOCH: i64 = -62_167_219_200;

/// `9999-12-31T23:59:59Z`, the latest instant with a four digit year.
const MAX_EPOCH: i64 = 253_402_300_799;

/// ## Summary
/// Encodes seconds since the Unix epoch as an iCalendar UTC date-time in
/// basic format, e.g. `0` becomes `19700101T000000Z`.
///
/// The instant is formatted as an extended ISO-8601 instant and the `-` and
/// `:` separators are then removed. Instants outside years 0000..=9999 are
/// clamped to that range so the result always has a four digit year.
#[must_use]
pub fn encode_timestamp(epoch_seconds: i64) -> String {
    let clamped = epoch_seconds.clamp(MIN_EPOCH, MAX_EPOCH);

    DateTime::<Utc>::from_timestamp(clamped, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
        .replace(['-', ':'], "")
}
