//! Timestamps and their textual time-codes.
//!
//! A [`TimePoint`] is stored in whole milliseconds. It displays in the `SRT`
//! form (`HH:MM:SS,mmm`); [`TimePointEditor`] and
//! [`crate::webvtt::TimePointVtt`] give the editor (`MM:SS.mmm`) and `WebVTT`
//! (`HH:MM:SS.mmm`) forms.
mod editor;
pub(crate) mod parse;
mod time_point;
mod time_span;

pub use editor::{parse_editor, TimePointEditor};
pub use time_point::TimePoint;
pub use time_span::TimeSpan;

use thiserror::Error;

/// Error for time-code handling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimeCodeError {
    /// The text doesn't match the expected time-code shape.
    #[error("Malformed time-code '{0}'")]
    Malformed(String),

    /// The value in seconds can't be represented as a `TimePoint`.
    #[error("Time value {0} is out of range")]
    OutOfRange(f64),
}
