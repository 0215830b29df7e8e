//! Google Takeout Semantic Location History as a source of timeline events.
//!
//! A Takeout export holds one JSON file per month. This crate reads a year of
//! them lazily and turns each entry into a [`tl_core::TimelineEvent`] with
//! timestamps in a reference timezone.

mod month;
mod normalize;
pub mod raw;
mod reader;

pub use month::Month;
pub use normalize::{NormalizeError, normalize, normalize_value};
pub use reader::{LoadReport, TakeoutError, TakeoutReader};
