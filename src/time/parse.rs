//! `nom` parsers for textual time-codes.

use log::trace;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char, one_of, space0, space1},
    combinator::{all_consuming, eof, map, map_res, rest, verify},
    error::Error,
    sequence::{delimited, preceded, terminated},
    Parser,
};

use super::{TimeCodeError, TimePoint, TimeSpan};

const MSECS_PER_SEC: i64 = 1000;
const MSECS_PER_MIN: i64 = 60 * MSECS_PER_SEC;
const MSECS_PER_HOUR: i64 = 60 * MSECS_PER_MIN;

/// Enough digits for any hour or minute count that fits in an `i64` of
/// milliseconds.
const MAX_COUNT_DIGITS: usize = 9;

/// Parse between `min` and `max` decimal digits as a number.
fn digits<'a>(
    min: usize,
    max: usize,
) -> impl Parser<&'a str, Output = i64, Error = Error<&'a str>> {
    map_res(
        take_while_m_n(min, max, |c: char| c.is_ascii_digit()),
        |digits: &str| digits.parse::<i64>(),
    )
}

/// Parse a two digits minute or second component (`00` to `59`).
fn sexagesimal<'a>() -> impl Parser<&'a str, Output = i64, Error = Error<&'a str>> {
    verify(digits(2, 2), |value: &i64| *value < 60)
}

/// Parse `SS<separator>mmm`, with `separator` one of `separators`.
fn seconds<'a>(
    separators: &'static str,
) -> impl Parser<&'a str, Output = i64, Error = Error<&'a str>> {
    map(
        (sexagesimal(), one_of(separators), digits(3, 3)),
        |(secs, _, msecs)| secs * MSECS_PER_SEC + msecs,
    )
}

/// Parse `H+:MM:SS<separator>mmm`.
fn clock<'a>(
    separators: &'static str,
) -> impl Parser<&'a str, Output = TimePoint, Error = Error<&'a str>> {
    map(
        (
            digits(1, MAX_COUNT_DIGITS),
            char(':'),
            sexagesimal(),
            char(':'),
            seconds(separators),
        ),
        |(hours, _, mins, _, msecs)| {
            TimePoint::from_msecs(hours * MSECS_PER_HOUR + mins * MSECS_PER_MIN + msecs)
        },
    )
}

/// `SRT` time-code. `HH:MM:SS,mmm`, a dot separator is tolerated.
pub(crate) fn srt_clock<'a>() -> impl Parser<&'a str, Output = TimePoint, Error = Error<&'a str>>
{
    clock(",.")
}

/// `WebVTT` time-code. `HH:MM:SS.mmm`, or `MM:SS.mmm` when hours are omitted.
pub(crate) fn vtt_clock<'a>() -> impl Parser<&'a str, Output = TimePoint, Error = Error<&'a str>>
{
    alt((
        clock("."),
        map((sexagesimal(), char(':'), seconds(".")), |(mins, _, msecs)| {
            TimePoint::from_msecs(mins * MSECS_PER_MIN + msecs)
        }),
    ))
}

/// Editor time-code. `M+:SS.mmm`, minutes are not bounded.
pub(crate) fn editor_clock<'a>(
) -> impl Parser<&'a str, Output = TimePoint, Error = Error<&'a str>> {
    map(
        (digits(1, MAX_COUNT_DIGITS), char(':'), seconds(".")),
        |(mins, _, msecs)| TimePoint::from_msecs(mins * MSECS_PER_MIN + msecs),
    )
}

/// Parse a cue timing line `<start> --> <end>`. Anything after the end
/// time-code must be separated by whitespace and is ignored (cue settings).
pub(crate) fn timing_line<'a, F, P>(
    time_code: F,
) -> impl Parser<&'a str, Output = TimeSpan, Error = Error<&'a str>>
where
    F: Fn() -> P,
    P: Parser<&'a str, Output = TimePoint, Error = Error<&'a str>>,
{
    map(
        terminated(
            (
                preceded(space0, time_code()),
                delimited(space0, tag("-->"), space0),
                time_code(),
            ),
            alt((eof, preceded(space1, rest))),
        ),
        |(start, _, end)| TimeSpan::new(start, end),
    )
}

/// Run `parser` on the whole of `input`.
pub(crate) fn complete<'a, O, P>(input: &'a str, parser: P) -> Result<O, TimeCodeError>
where
    P: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    all_consuming(parser)
        .parse(input)
        .map(|(_, out)| out)
        .map_err(|err| {
            trace!("Time-code parsing of '{input}' failed: {err}");
            TimeCodeError::Malformed(input.into())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srt_time_codes() {
        let parse = |input| complete(input, srt_clock()).map(TimePoint::msecs);
        assert_eq!(parse("00:00:01,500"), Ok(1500));
        assert_eq!(parse("00:01:30,000"), Ok(90_000));
        assert_eq!(parse("01:30:00,000"), Ok(5_400_000));
        assert_eq!(parse("00:00:00,100"), Ok(100));
        assert_eq!(parse("00:00:00.100"), Ok(100));
        assert_eq!(parse("123:00:00,000"), Ok(442_800_000));
        assert!(parse("00:00:invalid").is_err());
        assert!(parse("00:61:00,000").is_err());
        assert!(parse("00:00:01,5").is_err());
    }

    #[test]
    fn vtt_time_codes() {
        let parse = |input| complete(input, vtt_clock()).map(TimePoint::msecs);
        assert_eq!(parse("00:00:01.500"), Ok(1500));
        assert_eq!(parse("01:23.456"), Ok(83_456));
        assert_eq!(parse("02:00:00.000"), Ok(7_200_000));
        assert!(parse("00:00:01,500").is_err());
    }

    #[test]
    fn timing_lines() {
        let parse = |input| complete(input, timing_line(vtt_clock));
        let span = parse("00:00:01.000 --> 00:00:04.000").unwrap();
        assert_eq!((span.start.msecs(), span.end.msecs()), (1000, 4000));

        let span = parse("00:01.000 --> 00:04.000 align:start line:0").unwrap();
        assert_eq!((span.start.msecs(), span.end.msecs()), (1000, 4000));

        assert!(parse("00:00:01.000 --> 00:00:04.000garbage").is_err());
        assert!(parse("00:00:01.000 00:00:04.000").is_err());
        assert!(complete("00:00:01,000-->00:00:02,000", timing_line(srt_clock)).is_ok());
    }
}
