//! Export of a caption track.
//!
//! Text exports are fully encoded here. Burning the captions into the video is
//! left to a [`crate::capability::CaptionRenderer`], which gets a
//! [`BurnInRequest`].
use std::{
    ffi::OsStr,
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;
use thiserror::Error;

use crate::{
    srt::encode_srt,
    style::Style,
    time::TimePoint,
    timeline::{Language, LanguageTrack, Timeline},
    webvtt::encode_vtt,
};

/// Error for export handling.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the exported file failed.
    #[error("Could not write '{path}'")]
    Io {
        /// Source error
        source: io::Error,
        /// Path of the file we tried to write
        path: PathBuf,
    },
}

/// Kind of export offered to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Video file with the captions drawn in the frames.
    BurnedInVideo,
    /// `SubRip` text file.
    Srt,
    /// `WebVTT` text file.
    Vtt,
}

impl ExportFormat {
    /// Every format, in the order they are offered.
    pub const ALL: [Self; 3] = [Self::BurnedInVideo, Self::Srt, Self::Vtt];

    /// Short name of the format.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BurnedInVideo => "Video with Subtitles",
            Self::Srt => "SRT File",
            Self::Vtt => "WebVTT File",
        }
    }

    /// One sentence description of the format.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::BurnedInVideo => "Embeds subtitles directly into the video file.",
            Self::Srt => "Standard subtitle format supported by most video players.",
            Self::Vtt => "Web Video Text Tracks format, optimal for online videos.",
        }
    }

    /// Extension of the produced file.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::BurnedInVideo => "mp4",
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }

    /// MIME type of the produced file.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::BurnedInVideo => "video/mp4",
            Self::Srt => "text/plain",
            Self::Vtt => "text/vtt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// File name of the video without its extension. Only the last extension is
/// removed: `talk.final.mp4` gives `talk.final`.
#[must_use]
pub fn base_name(video_file_name: &str) -> &str {
    Path::new(video_file_name)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(video_file_name)
}

/// Name of the exported file: `<base>_<language>.<ext>` for text formats,
/// `<base>_with_subtitles.mp4` for the burned-in video.
#[must_use]
pub fn export_file_name(
    video_file_name: &str,
    language: &Language,
    format: ExportFormat,
) -> String {
    let base = base_name(video_file_name);
    match format {
        ExportFormat::BurnedInVideo => format!("{base}_with_subtitles.{}", format.extension()),
        ExportFormat::Srt | ExportFormat::Vtt => {
            format!("{base}_{language}.{}", format.extension())
        }
    }
}

/// An encoded text file, ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of the content.
    pub mime_type: &'static str,
    /// Encoded captions.
    pub contents: String,
}

/// What an external renderer needs to burn the captions into the video.
#[derive(Clone, Debug)]
pub struct BurnInRequest {
    /// Name of the source video file.
    pub video_file_name: String,
    /// Name of the video to produce.
    pub output_name: String,
    /// Language of the captions.
    pub language: Language,
    /// Captions, as they were when the export was requested.
    pub timeline: Arc<Timeline>,
    /// Presentation of the captions.
    pub style: Style,
}

/// Result of [`export`].
#[derive(Clone, Debug)]
pub enum Export {
    /// A text file.
    Text(ExportArtifact),
    /// A video to render.
    BurnIn(BurnInRequest),
}

/// Export `track` in `format`. Works on a snapshot of the track timeline: later
/// edits don't change the result.
#[must_use]
pub fn export(
    format: ExportFormat,
    video_file_name: &str,
    track: &LanguageTrack,
    style: &Style,
) -> Export {
    let timeline = track.snapshot();
    let file_name = export_file_name(video_file_name, track.language(), format);
    info!(
        "Export {} captions of '{}' as {format}: {file_name}",
        timeline.len(),
        track.language()
    );
    let contents = match format {
        ExportFormat::Srt => encode_srt(&timeline),
        ExportFormat::Vtt => encode_vtt(&timeline),
        ExportFormat::BurnedInVideo => {
            return Export::BurnIn(BurnInRequest {
                video_file_name: video_file_name.into(),
                output_name: file_name,
                language: track.language().clone(),
                timeline,
                style: *style,
            })
        }
    };
    Export::Text(ExportArtifact {
        file_name,
        mime_type: format.mime_type(),
        contents,
    })
}

/// Destination of the exported text files (a download, a directory…).
pub trait ExportSink {
    /// Save `artifact`, returning where it went.
    ///
    /// # Errors
    ///
    /// Will return an `ExportError` if the artifact could not be saved.
    fn save(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError>;
}

/// Save exported files in a directory, under their suggested name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink writing in `dir`, which must exist.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectorySink {
    fn save(&mut self, artifact: &ExportArtifact) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(&artifact.file_name);
        fs::write(&path, &artifact.contents).map_err(|source| ExportError::Io {
            source,
            path: path.clone(),
        })?;
        info!("Saved '{}'", path.display());
        Ok(path)
    }
}

/// Video duration as `M:SS`, minutes are not bounded.
#[must_use]
pub fn format_duration(duration: TimePoint) -> String {
    let secs = duration.msecs().max(0) / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// What is about to be exported, as summarized to the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportSummary {
    /// Chosen format.
    pub format: ExportFormat,
    /// Language of the exported track.
    pub language: Language,
    /// Duration of the video.
    pub duration: TimePoint,
    /// Number of captions of the track.
    pub caption_count: usize,
}

impl ExportSummary {
    /// Summarize the export of `track` in `format`.
    #[must_use]
    pub fn new(format: ExportFormat, track: &LanguageTrack, duration: TimePoint) -> Self {
        Self {
            format,
            language: track.language().clone(),
            duration,
            caption_count: track.timeline().len(),
        }
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Format: {}", self.format)?;
        writeln!(f, "Language: {}", self.language)?;
        writeln!(f, "Video duration: {}", format_duration(self.duration))?;
        write!(f, "Subtitles: {}", self.caption_count)
    }
}
