//! This crate provides the timeline engine of a video captioning editor.
//!
//! - [`timeline`]: timed captions of a language track, their lookup and
//!   value-producing mutations.
//! - [`time`]: millisecond timestamps and their `SRT`, `WebVTT` and editor
//!   time-codes.
//! - [`style`]: presentation of the displayed caption.
//! - [`srt`] and [`webvtt`]: encoding and decoding of caption files.
//! - [`playback`]: the caption displayed at a playback position.
//! - [`export`] and [`capability`]: boundaries with file saving, transcription
//!   and video rendering, which are provided outside of this crate.
//!
//! [`EditingSession`] ties them together for one video.
//!
//! ```
//! use subline::{srt::encode_srt, timeline::{CaptionEntry, CaptionId, Timeline}};
//!
//! let timeline = Timeline::new()
//!     .insert(CaptionEntry::from_secs(CaptionId::new(1), 0., 3., "Hello").unwrap())
//!     .unwrap();
//! assert_eq!(encode_srt(&timeline), "1\n00:00:00,000 --> 00:00:03,000\nHello\n");
//! assert_eq!(timeline.find_active(3.0), Some(0));
//! ```

pub mod capability;
pub mod config;
mod cue;
mod errors;
pub mod export;
pub mod playback;
mod session;
pub mod srt;
pub mod style;
pub mod time;
pub mod timeline;
pub mod webvtt;

pub use cue::CodecError;
pub use errors::SublineError;
pub use session::{Boundary, EditingSession, RenderedCaption, VideoInfo};

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{srt, webvtt};

    /// Decode every fixture, encode it back and decode again: the captions
    /// must be unchanged.
    #[test]
    fn fixtures_round_trip() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut checked = 0;
        for path in glob::glob("./fixtures/*.*").unwrap() {
            let path = path.unwrap();
            let content = fs::read_to_string(&path).unwrap();
            let (decoded, encoded) = match path.extension().and_then(|ext| ext.to_str()) {
                Some("srt") => {
                    let decoded = srt::decode_srt(&content).unwrap();
                    let encoded = srt::encode_srt(&decoded);
                    (decoded, srt::decode_srt(&encoded).unwrap())
                }
                Some("vtt") => {
                    let decoded = webvtt::decode_vtt(&content).unwrap();
                    let encoded = webvtt::encode_vtt(&decoded);
                    (decoded, webvtt::decode_vtt(&encoded).unwrap())
                }
                _ => continue,
            };
            assert!(!decoded.is_empty(), "{} has no captions", path.display());
            let triples = |timeline: &crate::timeline::Timeline| {
                timeline
                    .sorted_by_start()
                    .into_iter()
                    .map(|e| (e.start(), e.end(), e.text().to_owned()))
                    .collect::<Vec<_>>()
            };
            assert_eq!(triples(&decoded), triples(&encoded), "{}", path.display());
            checked += 1;
        }
        assert!(checked >= 2);
    }
}
