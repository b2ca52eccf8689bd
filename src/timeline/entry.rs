use std::fmt;

use compact_str::CompactString;

use super::TimelineError;
use crate::time::{TimePoint, TimeSpan};

/// Identifier of a caption, unique inside its [`super::Timeline`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptionId(u64);

impl CaptionId {
    /// Wrap a raw identifier value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CaptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One timed caption.
///
/// Invariants, checked at construction and after every patch:
/// `0 <= start < end`, and the text is not blank. The text may span
/// several lines, separated by `LF`; blank lines are dropped at construction
/// since a blank line ends a cue in the text encodings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionEntry {
    id: CaptionId,
    span: TimeSpan,
    text: CompactString,
}

impl CaptionEntry {
    /// Create an entry, checking its invariants. `CRLF` line breaks of `text`
    /// become `LF` and its blank lines are removed.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::InvalidSpan` if `span` starts before the
    /// origin or doesn't end strictly after it starts, and
    /// `TimelineError::EmptyText` if `text` is blank.
    pub fn new(
        id: CaptionId,
        span: TimeSpan,
        text: impl Into<CompactString>,
    ) -> Result<Self, TimelineError> {
        let entry = Self {
            id,
            span,
            text: normalize_text(&text.into()),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Shortcut for [`Self::new`] from offsets in seconds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`], plus `TimelineError::TimeCode` if an offset is
    /// not a valid time.
    pub fn from_secs(
        id: CaptionId,
        start: f64,
        end: f64,
        text: impl Into<CompactString>,
    ) -> Result<Self, TimelineError> {
        Self::new(id, TimeSpan::from_secs(start, end)?, text)
    }

    fn validate(&self) -> Result<(), TimelineError> {
        if self.span.start < TimePoint::ZERO || self.span.start >= self.span.end {
            return Err(TimelineError::InvalidSpan {
                id: self.id,
                span: self.span,
            });
        }
        if self.text.is_empty() {
            return Err(TimelineError::EmptyText(self.id));
        }
        Ok(())
    }

    /// Identifier of the entry.
    #[must_use]
    pub const fn id(&self) -> CaptionId {
        self.id
    }

    /// Display interval of the entry.
    #[must_use]
    pub const fn span(&self) -> &TimeSpan {
        &self.span
    }

    /// Start of the display interval.
    #[must_use]
    pub const fn start(&self) -> TimePoint {
        self.span.start
    }

    /// End of the display interval.
    #[must_use]
    pub const fn end(&self) -> TimePoint {
        self.span.end
    }

    /// Caption text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Apply `patch`, producing a new validated entry with the same id.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn patched(&self, patch: &CaptionPatch) -> Result<Self, TimelineError> {
        let span = TimeSpan::new(
            patch.start.unwrap_or(self.span.start),
            patch.end.unwrap_or(self.span.end),
        );
        let text = patch.text.as_ref().unwrap_or(&self.text).clone();
        Self::new(self.id, span, text)
    }
}

/// Lines of `text` that are not blank, joined by `LF`.
fn normalize_text(text: &str) -> CompactString {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .fold(CompactString::default(), |mut normalized, line| {
            if !normalized.is_empty() {
                normalized.push('\n');
            }
            normalized.push_str(line);
            normalized
        })
}

/// A partial change of a [`CaptionEntry`]. Unset fields are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptionPatch {
    start: Option<TimePoint>,
    end: Option<TimePoint>,
    text: Option<CompactString>,
}

impl CaptionPatch {
    /// Change the start time.
    #[must_use]
    pub fn start(mut self, start: TimePoint) -> Self {
        self.start = Some(start);
        self
    }

    /// Change the end time.
    #[must_use]
    pub fn end(mut self, end: TimePoint) -> Self {
        self.end = Some(end);
        self
    }

    /// Change the text.
    #[must_use]
    pub fn text(mut self, text: impl Into<CompactString>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Does the patch leave the entry untouched ?
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.text.is_none()
    }
}
