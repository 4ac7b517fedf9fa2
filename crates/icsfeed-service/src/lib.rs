//! Feed regeneration: the per-cycle pipeline and the scheduler driving it.

pub mod error;
pub mod feed;
pub mod regenerate;
