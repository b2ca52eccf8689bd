//! `WebVTT` functionality
use std::{fmt, io, sync::LazyLock};

use log::{debug, warn};
use regex::Regex;

use crate::{
    cue::{self, CodecError},
    time::{parse, TimePoint},
    timeline::{CaptionId, Timeline},
};

/// Extend `TimePoint` for implement `WebVTT` specific `Display`.
#[repr(transparent)]
pub struct TimePointVtt(TimePoint);

impl From<TimePoint> for TimePointVtt {
    fn from(value: TimePoint) -> Self {
        Self(value)
    }
}

impl fmt::Display for TimePointVtt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_separator(f, '.')
    }
}

/// Write `timeline` in `vtt` format: the `WEBVTT` header, a blank line, then
/// the cues sorted by start time with their 1-based position as identifier.
///
/// # Errors
///
/// Will return `Err` if writing in `writer` return an `Err`.
#[profiling::function]
pub fn write_vtt(timeline: &Timeline, writer: &mut impl io::Write) -> Result<(), io::Error> {
    writer.write_all(encode_vtt(timeline).as_bytes())
}

/// Encode `timeline` in `vtt` format.
#[must_use]
#[profiling::function]
pub fn encode_vtt(timeline: &Timeline) -> String {
    format!("WEBVTT\n\n{}", cue::encode_cues::<TimePointVtt>(timeline))
}

/// Is this block a comment, a style sheet or a region definition ?
fn is_metadata(first_line: &str) -> bool {
    ["NOTE", "STYLE", "REGION"].iter().any(|keyword| {
        first_line
            .strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t']))
    })
}

/// Decode a `vtt` file content. Captions get ids from 1, in file order.
///
/// Header text and metadata lines following `WEBVTT`, `NOTE`, `STYLE` and
/// `REGION` blocks, cue identifiers and cue settings are skipped.
///
/// # Errors
///
/// Will return `CodecError::MissingHeader` if the content doesn't start with
/// the `WEBVTT` line, or another `CodecError` if a cue is not valid.
///
/// # Panics
///
/// Panic if the Regex creation failed
#[profiling::function]
pub fn decode_vtt(input: &str) -> Result<Timeline, CodecError> {
    static SIGNATURE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new("^WEBVTT([ \t].*)?$").unwrap());

    let blocks = cue::blocks(input);
    let (header, blocks) = blocks.split_first().ok_or(CodecError::MissingHeader)?;
    if header.line != 1 || !SIGNATURE.is_match(header.first()) {
        return Err(CodecError::MissingHeader);
    }

    let mut entries = Vec::new();
    for block in blocks {
        if is_metadata(block.first()) {
            debug!("Skip '{}' block at line {}", block.first(), block.line);
            continue;
        }
        let timing = if cue::is_timing(block.first()) {
            0
        } else if block.lines.get(1).is_some_and(|line| cue::is_timing(line)) {
            1
        } else {
            warn!("Skip block without cue timing at line {}", block.line);
            continue;
        };
        let id = CaptionId::new(entries.len() as u64 + 1);
        entries.push(cue::cue_entry(block, timing, id, parse::vtt_clock)?);
    }

    debug!("Decoded {} vtt cues", entries.len());
    Ok(Timeline::from_entries(entries)?)
}
