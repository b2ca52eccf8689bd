use super::{TimeCodeError, TimePoint};

/// Define a time span with a start time and an end time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    /// Start time of the span
    pub start: TimePoint,
    /// End time of the span
    pub end: TimePoint,
}

impl TimeSpan {
    /// Create a new `TimeSpan` from a start and an end.
    #[must_use]
    pub const fn new(start: TimePoint, end: TimePoint) -> Self {
        Self { start, end }
    }

    /// Create a `TimeSpan` from start and end offsets in seconds.
    ///
    /// # Errors
    ///
    /// Will return `TimeCodeError::OutOfRange` if one of the offsets can't be
    /// converted in a [`TimePoint`].
    pub fn from_secs(start: f64, end: f64) -> Result<Self, TimeCodeError> {
        Ok(Self::new(TimePoint::from_secs(start)?, TimePoint::from_secs(end)?))
    }

    /// Length of the span in milliseconds, negative if `end` is before `start`.
    #[must_use]
    pub const fn duration_msecs(&self) -> i64 {
        self.end.msecs() - self.start.msecs()
    }

    /// Is `position` (in seconds) inside the span ? Both bounds are inclusive.
    #[must_use]
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start.to_secs() && position <= self.end.to_secs()
    }

    /// Do the two spans share more than a boundary instant ?
    /// Back-to-back spans (`a.end == b.start`) don't overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_closed_on_both_ends() {
        let span = TimeSpan::from_secs(2., 5.).unwrap();
        assert!(span.contains(2.0));
        assert!(span.contains(5.0));
        assert!(span.contains(3.7));
        assert!(!span.contains(1.999));
        assert!(!span.contains(5.001));
    }

    #[test]
    fn overlap() {
        let a = TimeSpan::from_secs(0., 5.).unwrap();
        let b = TimeSpan::from_secs(2., 8.).unwrap();
        let c = TimeSpan::from_secs(9., 10.).unwrap();
        let d = TimeSpan::from_secs(5., 6.).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }
}
