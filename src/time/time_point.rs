use core::fmt;

use super::TimeCodeError;

/// Slack allowed when flooring seconds to milliseconds, so that values like
/// `1.005` (stored as `1.00499999…`) still land on the intended millisecond.
const FLOOR_TOLERANCE_MS: f64 = 1e-6;

/// Define a time in milliseconds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimePoint(i64);

impl TimePoint {
    /// The origin of the video timeline.
    pub const ZERO: Self = Self(0);

    /// Create a `TimePoint` from miliseconds
    #[must_use]
    pub const fn from_msecs(time: i64) -> Self {
        Self(time)
    }

    /// Create a `TimePoint` from a non-negative number of seconds.
    ///
    /// Sub-millisecond remainders are truncated, never rounded.
    ///
    /// # Errors
    ///
    /// Will return `TimeCodeError::OutOfRange` if `secs` is negative, not a
    /// number, infinite, or too large to be counted in milliseconds.
    pub fn from_secs(secs: f64) -> Result<Self, TimeCodeError> {
        if !secs.is_finite() || secs < 0. {
            return Err(TimeCodeError::OutOfRange(secs));
        }
        let msecs = (secs * 1000. + FLOOR_TOLERANCE_MS).floor();
        cast::i64(msecs)
            .map(Self)
            .map_err(|_err| TimeCodeError::OutOfRange(secs))
    }

    /// Convert to seconds
    #[must_use]
    pub fn to_secs(self) -> f64 {
        self.0 as f64 / 1000.
    }

    /// Number of milliseconds since the origin.
    #[must_use]
    pub const fn msecs(self) -> i64 {
        self.0
    }

    const fn secs(self) -> i64 {
        self.0 / 1000
    }

    /// Total minutes, without wrapping at the hour.
    pub(crate) const fn mins(self) -> i64 {
        self.0 / (60 * 1000)
    }

    const fn hours(self) -> i64 {
        self.0 / (60 * 60 * 1000)
    }
    const fn mins_comp(self) -> i64 {
        self.mins() % 60
    }

    pub(crate) const fn secs_comp(self) -> i64 {
        self.secs() % 60
    }

    pub(crate) const fn msecs_comp(self) -> i64 {
        self.msecs() % 1000
    }

    /// Write `HH:MM:SS<separator>mmm`, as used by `SRT` and `WebVTT`.
    pub(crate) fn fmt_separator(self, f: &mut fmt::Formatter<'_>, separator: char) -> fmt::Result {
        let t = if self.0 < 0 { Self(-self.0) } else { self };
        write!(
            f,
            "{}{:02}:{:02}:{:02}{separator}{:03}",
            if self.0 < 0 { "-" } else { "" },
            t.hours(),
            t.mins_comp(),
            t.secs_comp(),
            t.msecs_comp()
        )
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_separator(f, ',')
    }
}
