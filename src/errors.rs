//! Custom error types.

use thiserror::Error;

/// A type representing errors that are specific to `subline`, as returned by
/// [`crate::EditingSession`] operations which span several modules.
#[derive(Debug, Error)]
pub enum SublineError {
    /// Error with a time-code
    #[error("Invalid time-code")]
    TimeCode(#[from] crate::time::TimeCodeError),

    /// Error with a timeline mutation
    #[error("Caption edition failed")]
    Timeline(#[from] crate::timeline::TimelineError),

    /// Error with the language tracks
    #[error("Caption track selection failed")]
    Track(#[from] crate::timeline::TrackError),

    /// Error with a style edit
    #[error("Style edition failed")]
    Style(#[from] crate::style::StyleError),

    /// Error during decoding of a caption file
    #[error("Caption file decoding failed")]
    Codec(#[from] crate::cue::CodecError),

    /// Error during export
    #[error("Export failed")]
    Export(#[from] crate::export::ExportError),

    /// Error with an external capability
    #[error("External task failed")]
    Capability(#[from] crate::capability::CapabilityError),

    /// Error with the configuration
    #[error("Configuration loading failed")]
    Config(#[from] crate::config::ConfigError),
}
