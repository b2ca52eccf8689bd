//! Long running tasks provided outside of this crate: transcription of a video
//! and rendering of a video with burned-in captions.
//!
//! Providers implement [`Transcriber`] or [`CaptionRenderer`]. They report
//! progress through a [`ProgressReporter`] and are driven by [`transcribe`]
//! and [`render_burn_in`], which add cancellation and error mapping.
use std::{error::Error as StdError, path::PathBuf};

use async_trait::async_trait;
use log::{info, trace, warn};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{export::BurnInRequest, time::TimePoint, timeline::LanguageTrack};

/// Error returned by a capability provider.
pub type ProviderError = Box<dyn StdError + Send + Sync>;

/// Error for external capabilities.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The transcription provider failed, no caption was produced.
    #[error("Transcription failed")]
    TranscriptionFailed(#[source] ProviderError),

    /// The renderer failed to produce the video.
    #[error("Rendering of the captioned video failed")]
    RenderFailed(#[source] ProviderError),

    /// The task was cancelled before completion.
    #[error("Task cancelled")]
    Cancelled,
}

/// A video to work on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSource {
    /// File name, as chosen by the user.
    pub file_name: String,
    /// Location of the video content.
    pub path: PathBuf,
}

impl VideoSource {
    /// Create a video source from its path, the file name is the last path
    /// component.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { file_name, path }
    }
}

/// Result of a transcription.
#[derive(Debug, Clone)]
pub struct Transcript {
    /// Captions of the spoken language.
    pub track: LanguageTrack,
    /// Total duration of the video.
    pub duration: TimePoint,
}

/// Sending side of a progress channel. Progress is a fraction in `[0, 1]` which
/// never goes backward.
#[derive(Debug)]
pub struct ProgressReporter(watch::Sender<f64>);

/// Create a progress channel, starting at `0`.
#[must_use]
pub fn progress_channel() -> (ProgressReporter, watch::Receiver<f64>) {
    let (tx, rx) = watch::channel(0.);
    (ProgressReporter(tx), rx)
}

impl ProgressReporter {
    /// Report `fraction` of the work as done. Values are clamped to `[0, 1]`,
    /// a value lower than the current progress is ignored.
    pub fn report(&self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let fraction = fraction.clamp(0., 1.);
        self.0.send_if_modified(|current| {
            if fraction > *current {
                *current = fraction;
                true
            } else {
                false
            }
        });
    }

    /// Mark the work as done.
    pub fn finish(&self) {
        self.report(1.);
    }

    /// Current progress.
    #[must_use]
    pub fn current(&self) -> f64 {
        *self.0.borrow()
    }
}

/// Produce the captions of a video.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe `video`.
    async fn transcribe(
        &self,
        video: &VideoSource,
        progress: &ProgressReporter,
    ) -> Result<Transcript, ProviderError>;
}

/// Produce a video with the captions drawn in its frames.
#[async_trait]
pub trait CaptionRenderer: Send + Sync {
    /// Render the video described by `request`, returning the produced file.
    async fn render(
        &self,
        request: &BurnInRequest,
        progress: &ProgressReporter,
    ) -> Result<PathBuf, ProviderError>;
}

/// Run `transcriber` on `video` until it completes or `cancel` is triggered.
///
/// # Errors
///
/// Will return `CapabilityError::Cancelled` if `cancel` was triggered first,
/// and `CapabilityError::TranscriptionFailed` if the provider failed. No
/// partial transcript is returned in both cases.
pub async fn transcribe(
    transcriber: &dyn Transcriber,
    video: &VideoSource,
    progress: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<Transcript, CapabilityError> {
    trace!("Transcribe '{}'", video.file_name);
    let transcript = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            warn!("Transcription of '{}' cancelled", video.file_name);
            return Err(CapabilityError::Cancelled);
        }
        result = transcriber.transcribe(video, progress) => {
            result.map_err(CapabilityError::TranscriptionFailed)?
        }
    };
    progress.finish();
    info!(
        "Transcribed '{}': {} captions in '{}'",
        video.file_name,
        transcript.track.timeline().len(),
        transcript.track.language()
    );
    Ok(transcript)
}

/// Run `renderer` on `request` until it completes or `cancel` is triggered.
///
/// # Errors
///
/// Will return `CapabilityError::Cancelled` if `cancel` was triggered first,
/// and `CapabilityError::RenderFailed` if the renderer failed.
pub async fn render_burn_in(
    renderer: &dyn CaptionRenderer,
    request: &BurnInRequest,
    progress: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<PathBuf, CapabilityError> {
    trace!("Render '{}'", request.output_name);
    let output = tokio::select! {
        biased;
        () = cancel.cancelled() => {
            warn!("Rendering of '{}' cancelled", request.output_name);
            return Err(CapabilityError::Cancelled);
        }
        result = renderer.render(request, progress) => {
            result.map_err(CapabilityError::RenderFailed)?
        }
    };
    progress.finish();
    info!("Rendered '{}'", output.display());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::{future, sync::Arc};

    use super::*;
    use crate::{
        export::{export, Export, ExportFormat},
        style::Style,
        timeline::{CaptionEntry, CaptionId, Timeline},
    };

    struct Scripted {
        fail: bool,
    }

    #[async_trait]
    impl Transcriber for Scripted {
        async fn transcribe(
            &self,
            video: &VideoSource,
            progress: &ProgressReporter,
        ) -> Result<Transcript, ProviderError> {
            progress.report(0.5);
            if self.fail {
                return Err(format!("no audio track in {}", video.file_name).into());
            }
            let timeline = Timeline::from_entries([CaptionEntry::from_secs(
                CaptionId::new(1),
                0.,
                2.,
                "Hello",
            )?])?;
            Ok(Transcript {
                track: LanguageTrack::new("English".into(), timeline),
                duration: TimePoint::from_msecs(10_000),
            })
        }
    }

    struct Stalled;

    #[async_trait]
    impl Transcriber for Stalled {
        async fn transcribe(
            &self,
            _video: &VideoSource,
            progress: &ProgressReporter,
        ) -> Result<Transcript, ProviderError> {
            progress.report(0.2);
            future::pending().await
        }
    }

    #[async_trait]
    impl CaptionRenderer for Stalled {
        async fn render(
            &self,
            _request: &BurnInRequest,
            _progress: &ProgressReporter,
        ) -> Result<PathBuf, ProviderError> {
            future::pending().await
        }
    }

    struct Renderer;

    #[async_trait]
    impl CaptionRenderer for Renderer {
        async fn render(
            &self,
            request: &BurnInRequest,
            progress: &ProgressReporter,
        ) -> Result<PathBuf, ProviderError> {
            progress.report(0.9);
            Ok(PathBuf::from("/out").join(&request.output_name))
        }
    }

    fn video() -> VideoSource {
        VideoSource::from_path("/videos/holiday.mp4")
    }

    fn burn_in_request() -> BurnInRequest {
        let track = LanguageTrack::new("English".into(), Timeline::new());
        match export(ExportFormat::BurnedInVideo, "holiday.mp4", &track, &Style::default()) {
            Export::BurnIn(request) => request,
            Export::Text(_) => unreachable!(),
        }
    }

    #[test]
    fn progress_is_monotonic() {
        let (reporter, rx) = progress_channel();
        reporter.report(0.4);
        reporter.report(0.2);
        assert_eq!(*rx.borrow(), 0.4);
        reporter.report(f64::NAN);
        reporter.report(3.);
        assert_eq!(reporter.current(), 1.);
        assert_eq!(video().file_name, "holiday.mp4");
    }

    #[tokio::test]
    async fn transcription_completes() {
        let (reporter, rx) = progress_channel();
        let transcript = transcribe(
            &Scripted { fail: false },
            &video(),
            &reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(transcript.track.timeline().len(), 1);
        assert_eq!(transcript.duration.msecs(), 10_000);
        assert_eq!(*rx.borrow(), 1.);
    }

    #[tokio::test]
    async fn transcription_failure_is_distinct() {
        let (reporter, rx) = progress_channel();
        let result = transcribe(
            &Scripted { fail: true },
            &video(),
            &reporter,
            &CancellationToken::new(),
        )
        .await;
        let Err(CapabilityError::TranscriptionFailed(source)) = result else {
            panic!("expected a transcription failure");
        };
        assert_eq!(source.to_string(), "no audio track in holiday.mp4");
        assert_eq!(*rx.borrow(), 0.5);
    }

    #[tokio::test]
    async fn cancellation_stops_tasks() {
        let (reporter, _rx) = progress_channel();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let result = transcribe(&Stalled, &video(), &reporter, &cancel).await;
        assert!(matches!(result, Err(CapabilityError::Cancelled)));
        assert!(reporter.current() < 1.);

        let result =
            render_burn_in(&Stalled, &burn_in_request(), &reporter, &cancel).await;
        assert!(matches!(result, Err(CapabilityError::Cancelled)));
    }

    #[tokio::test]
    async fn render_returns_output() {
        let (reporter, rx) = progress_channel();
        let renderer: Arc<dyn CaptionRenderer> = Arc::new(Renderer);
        let output = render_burn_in(
            renderer.as_ref(),
            &burn_in_request(),
            &reporter,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(output, PathBuf::from("/out/holiday_with_subtitles.mp4"));
        assert_eq!(*rx.borrow(), 1.);
    }
}
