//! `SubRip` (`*.srt`) functionality.
//!
//! ```text
//! 1
//! 00:00:00,000 --> 00:00:03,000
//! Hello
//!
//! 2
//! 00:00:04,000 --> 00:00:07,000
//! World
//! ```
use std::io;

use log::{debug, trace};

use crate::{
    cue::{self, CodecError},
    time::{parse, TimePoint},
    timeline::{CaptionId, Timeline},
};

/// Write `timeline` in `srt` format, cues sorted by start time and numbered
/// from 1.
///
/// # Errors
///
/// Will return `Err` if writing in `writer` return an `Err`.
#[profiling::function]
pub fn write_srt(timeline: &Timeline, writer: &mut impl io::Write) -> Result<(), io::Error> {
    writer.write_all(encode_srt(timeline).as_bytes())
}

/// Encode `timeline` in `srt` format.
#[must_use]
#[profiling::function]
pub fn encode_srt(timeline: &Timeline) -> String {
    cue::encode_cues::<TimePoint>(timeline)
}

/// Decode a `srt` file content. Captions get ids from 1, in file order.
///
/// The index line of a cue may be omitted. Nothing after the end time-code on
/// the timing line is kept.
///
/// # Errors
///
/// Will return a `CodecError` if a block is not a valid cue.
#[profiling::function]
pub fn decode_srt(input: &str) -> Result<Timeline, CodecError> {
    let entries = cue::blocks(input)
        .iter()
        .enumerate()
        .map(|(idx, block)| {
            let timing = if cue::is_timing(block.first()) {
                0
            } else {
                let index = block.first().trim();
                if index.parse::<u64>().is_err() {
                    return Err(CodecError::InvalidIndex {
                        line: block.line,
                        found: index.into(),
                    });
                }
                if !block.lines.get(1).is_some_and(|line| cue::is_timing(line)) {
                    trace!("Block at line {} has no timing: {:?}", block.line, block.lines);
                    return Err(CodecError::MissingTiming {
                        line: block.line + 1,
                        found: block.lines.get(1).copied().unwrap_or_default().into(),
                    });
                }
                1
            };
            cue::cue_entry(block, timing, CaptionId::new(idx as u64 + 1), parse::srt_clock)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Decoded {} srt cues", entries.len());
    Ok(Timeline::from_entries(entries)?)
}
