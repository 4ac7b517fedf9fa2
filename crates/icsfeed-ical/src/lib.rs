//! Calendar entry formatting and feed rendering.

pub mod error;
pub mod ical;
