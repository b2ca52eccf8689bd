//! Compact `MM:SS.mmm` form used by the caption editor.
use std::fmt;

use super::{parse, TimeCodeError, TimePoint};

/// Extend `TimePoint` to implement the editor `Display`.
///
/// There is no hour component: minutes keep counting past 59.
#[repr(transparent)]
pub struct TimePointEditor(TimePoint);

impl From<TimePoint> for TimePointEditor {
    fn from(value: TimePoint) -> Self {
        Self(value)
    }
}

impl fmt::Display for TimePointEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0.msecs() < 0 { "-" } else { "" };
        let t = TimePoint::from_msecs(self.0.msecs().abs());
        write!(
            f,
            "{sign}{:02}:{:02}.{:03}",
            t.mins(),
            t.secs_comp(),
            t.msecs_comp()
        )
    }
}

/// Parse an editor time-code (`MM:SS.mmm`).
///
/// Minutes take one digit or more, seconds exactly two (`00` to `59`) and
/// milliseconds exactly three. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Will return `TimeCodeError::Malformed` if `input` doesn't have this shape.
pub fn parse_editor(input: &str) -> Result<TimePoint, TimeCodeError> {
    parse::complete(input.trim(), parse::editor_clock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(secs: f64) -> String {
        TimePointEditor::from(TimePoint::from_secs(secs).unwrap()).to_string()
    }

    #[test]
    fn format() {
        assert_eq!(editor(0.), "00:00.000");
        assert_eq!(editor(3.5), "00:03.500");
        assert_eq!(editor(61.042), "01:01.042");
        assert_eq!(editor(125. * 60. + 7.25), "125:07.250");
    }

    #[test]
    fn parse() {
        assert_eq!(parse_editor("00:03.500").unwrap().msecs(), 3500);
        assert_eq!(parse_editor("125:07.250").unwrap().msecs(), 7_507_250);
        assert_eq!(parse_editor(" 1:00.001 ").unwrap().msecs(), 60_001);
    }

    #[test]
    fn parse_rejects_malformed() {
        for input in [
            "", "00:03", "00:03.5", "0003.500", "00:60.000", "aa:03.500", "00:03.500x",
            "00:03,500", "-1:00.000",
        ] {
            assert_eq!(
                parse_editor(input),
                Err(TimeCodeError::Malformed(input.trim().to_owned())),
                "input: {input:?}"
            );
        }
    }

    #[test]
    fn round_trip_is_exact() {
        for msecs in (0..7_500_000).step_by(7_919) {
            let time = TimePoint::from_msecs(msecs);
            let text = TimePointEditor::from(time).to_string();
            assert_eq!(parse_editor(&text).unwrap(), time);
            assert_eq!(
                TimePoint::from_secs(time.to_secs()).unwrap(),
                time,
                "{text}"
            );
        }
    }
}
