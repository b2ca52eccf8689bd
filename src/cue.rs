//! Text blocks shared by the `SRT` and `WebVTT` encodings.
//!
//! Both formats are a sequence of blocks separated by blank lines. A cue block
//! is an optional identifier line, a timing line and one or more text lines.
use compact_str::CompactString;
use log::trace;
use nom::{error::Error, Parser};
use thiserror::Error;

use crate::{
    time::{parse, TimeCodeError, TimePoint},
    timeline::{CaptionEntry, CaptionId, Timeline, TimelineError},
};

/// Error for `SRT` and `WebVTT` decoding. Line numbers are 1-based.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// The `WebVTT` signature line is missing.
    #[error("Missing 'WEBVTT' header")]
    MissingHeader,

    /// A `SRT` block doesn't start with a numeric index.
    #[error("Line {line}: invalid cue index '{found}'")]
    InvalidIndex {
        /// Line of the index.
        line: usize,
        /// Content of the line.
        found: String,
    },

    /// No timing line where one is expected.
    #[error("Line {line}: expected a cue timing line, found '{found}'")]
    MissingTiming {
        /// Line where the timing was expected.
        line: usize,
        /// Content of the line.
        found: String,
    },

    /// The timing line can't be parsed.
    #[error("Line {line}: malformed cue timing")]
    TimeCode {
        /// Line of the timing.
        line: usize,
        /// Parsing error.
        #[source]
        source: TimeCodeError,
    },

    /// The cue doesn't make a valid caption (empty text, end before start…).
    #[error("Line {line}: invalid cue")]
    Cue {
        /// Line of the timing.
        line: usize,
        /// Validation error.
        #[source]
        source: TimelineError,
    },

    /// Decoded captions can't form a timeline.
    #[error("Invalid decoded timeline")]
    Timeline(#[from] TimelineError),
}

/// Lines of a block, and the line number of the first one.
#[derive(Debug)]
pub(crate) struct Block<'a> {
    pub(crate) line: usize,
    pub(crate) lines: Vec<&'a str>,
}

impl Block<'_> {
    pub(crate) fn first(&self) -> &str {
        self.lines.first().copied().unwrap_or_default()
    }
}

/// Split `input` into blocks. Handles `LF` and `CRLF` endings, an optional
/// `UTF-8` BOM and runs of blank lines.
pub(crate) fn blocks(input: &str) -> Vec<Block<'_>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;
    for (idx, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            blocks.extend(current.take());
        } else {
            current
                .get_or_insert_with(|| Block {
                    line: idx + 1,
                    lines: Vec::new(),
                })
                .lines
                .push(line);
        }
    }
    blocks.extend(current);
    blocks
}

/// Build the caption of a cue, `timing` being the index of the timing line in
/// `block` and the text lines following it.
pub(crate) fn cue_entry<'a, F, P>(
    block: &Block<'a>,
    timing: usize,
    id: CaptionId,
    time_code: F,
) -> Result<CaptionEntry, CodecError>
where
    F: Fn() -> P,
    P: Parser<&'a str, Output = TimePoint, Error = Error<&'a str>>,
{
    let line = block.line + timing;
    let timing_line = block.lines.get(timing).copied().unwrap_or_default();
    let span = parse::complete(timing_line, parse::timing_line(time_code))
        .map_err(|source| CodecError::TimeCode { line, source })?;

    let text = block
        .lines
        .get(timing + 1..)
        .unwrap_or_default()
        .iter()
        .fold(CompactString::default(), |mut text, part| {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(part);
            text
        });
    trace!("Cue {id} at line {line}: {} --> {}", span.start, span.end);
    CaptionEntry::new(id, span, text).map_err(|source| CodecError::Cue { line, source })
}

/// Does `line` look like a cue timing line ?
pub(crate) fn is_timing(line: &str) -> bool {
    line.contains("-->")
}

/// Encode the cues of `timeline`, by ascending start time, with their 1-based
/// output index as identifier. `T` formats the time-codes.
pub(crate) fn encode_cues<T>(timeline: &Timeline) -> String
where
    T: From<TimePoint> + std::fmt::Display,
{
    timeline
        .sorted_by_start()
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let line_num = idx + 1;
            let start = T::from(entry.start());
            let end = T::from(entry.end());
            format!("{line_num}\n{start} --> {end}\n{}\n", entry.text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_blocks() {
        let input = "\u{feff}1\r\nA\r\n\r\n\r\n2\r\nB\r\nC\r\n   \r\n3\nD";
        let blocks = blocks(input);
        assert_eq!(blocks.len(), 3);
        assert_eq!((blocks[0].line, blocks[0].lines.clone()), (1, vec!["1", "A"]));
        assert_eq!((blocks[1].line, blocks[1].lines.clone()), (5, vec!["2", "B", "C"]));
        assert_eq!((blocks[2].line, blocks[2].first()), (9, "3"));
        assert!(super::blocks("\n\n").is_empty());
    }

    #[test]
    fn cue_text_keeps_lines() {
        let blocks = blocks("1\n00:00:01,000 --> 00:00:02,000\nOne\nTwo\n");
        let entry = cue_entry(&blocks[0], 1, CaptionId::new(1), parse::srt_clock).unwrap();
        assert_eq!(entry.text(), "One\nTwo");
        assert_eq!(entry.start().msecs(), 1000);
    }

    #[test]
    fn cue_errors_carry_line() {
        let blocks = blocks(
            "\n\n1\n00:00:01,000 --> 00:00:xx,000\nOne\n\n2\n00:00:03,000 --> 00:00:02,000\nTwo",
        );
        let error = cue_entry(&blocks[0], 1, CaptionId::new(1), parse::srt_clock).unwrap_err();
        assert!(matches!(error, CodecError::TimeCode { line: 4, .. }));
        let error = cue_entry(&blocks[1], 1, CaptionId::new(2), parse::srt_clock).unwrap_err();
        assert!(matches!(error, CodecError::Cue { line: 8, .. }));
    }
}
