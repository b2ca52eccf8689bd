//! Editing context of one video.
//!
//! An [`EditingSession`] owns everything the user edits: the caption tracks,
//! the shared style and the overlap policy. Several sessions can live side by
//! side, nothing is global.
use std::sync::Arc;

use compact_str::CompactString;
use log::{debug, info, warn};

use crate::{
    capability::Transcript,
    config::EditorConfig,
    export::{self, Export, ExportFormat, ExportSummary},
    playback::{self, PlaybackSurface},
    srt::decode_srt,
    style::{RenderAttributes, Style, StyleProperty},
    time::{parse_editor, TimePoint, TimePointEditor, TimeSpan},
    timeline::{
        CaptionEntry, CaptionId, CaptionPatch, Language, LanguageTrack, OverlapPolicy, Timeline,
        TimelineError, TrackSet,
    },
    webvtt::decode_vtt,
    SublineError,
};

/// The video being captioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    /// File name, with its extension.
    pub file_name: String,
    /// Total duration.
    pub duration: TimePoint,
}

/// A boundary of a caption display interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Start time.
    Start,
    /// End time.
    End,
}

/// The caption displayed at a playback position, with its presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedCaption {
    /// Document index of the caption in the current track.
    pub index: usize,
    /// Id of the caption.
    pub id: CaptionId,
    /// Text to display.
    pub text: CompactString,
    /// Presentation of the text.
    pub attributes: RenderAttributes,
}

/// Editing context of one video.
#[derive(Debug, Clone)]
pub struct EditingSession {
    video: VideoInfo,
    tracks: TrackSet,
    style: Style,
    policy: OverlapPolicy,
}

impl EditingSession {
    /// Create a session for `video` with `track` as current track. Style and
    /// overlap policy come from `config`.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::Overlap` if the policy is strict and the
    /// track has overlapping captions.
    pub fn new(
        video: VideoInfo,
        track: LanguageTrack,
        config: &EditorConfig,
    ) -> Result<Self, SublineError> {
        let policy = config.overlap_policy;
        let track = with_policy(track, policy)?;
        info!(
            "Open '{}' with {} captions in '{}'",
            video.file_name,
            track.timeline().len(),
            track.language()
        );
        Ok(Self {
            video,
            tracks: TrackSet::new(track),
            style: config.style,
            policy,
        })
    }

    /// Create a session from a completed transcription of `video_file_name`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_transcript(
        video_file_name: impl Into<String>,
        transcript: Transcript,
        config: &EditorConfig,
    ) -> Result<Self, SublineError> {
        let video = VideoInfo {
            file_name: video_file_name.into(),
            duration: transcript.duration,
        };
        Self::new(video, transcript.track, config)
    }

    /// The captioned video.
    #[must_use]
    pub const fn video(&self) -> &VideoInfo {
        &self.video
    }

    /// Caption tracks of the video.
    #[must_use]
    pub const fn tracks(&self) -> &TrackSet {
        &self.tracks
    }

    /// Captions of the current track.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        self.tracks.current().timeline()
    }

    /// Point-in-time copy of the current track captions.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Timeline> {
        self.tracks.current().snapshot()
    }

    /// Style shared by every track.
    #[must_use]
    pub const fn style(&self) -> &Style {
        &self.style
    }

    /// Overlap handling of the timelines.
    #[must_use]
    pub const fn overlap_policy(&self) -> OverlapPolicy {
        self.policy
    }

    fn commit(&mut self, timeline: Timeline) {
        self.tracks.current_mut().replace_timeline(timeline);
    }

    /// Apply `patch` to the caption `id` of the current track.
    ///
    /// # Errors
    ///
    /// Will return the `TimelineError` of [`Timeline::update`], the track is
    /// then unchanged.
    pub fn update_caption(
        &mut self,
        id: CaptionId,
        patch: &CaptionPatch,
    ) -> Result<(), SublineError> {
        let timeline = self.timeline().update(id, patch)?;
        self.commit(timeline);
        Ok(())
    }

    /// Set a boundary of the caption `id` from an editor time-code (`MM:SS.mmm`).
    ///
    /// # Errors
    ///
    /// Will return `TimeCodeError::Malformed` if `time_code` can't be parsed,
    /// or the errors of [`Self::update_caption`]. The caption keeps its
    /// previous value in both cases.
    pub fn edit_time_code(
        &mut self,
        id: CaptionId,
        boundary: Boundary,
        time_code: &str,
    ) -> Result<(), SublineError> {
        let time = parse_editor(time_code)?;
        let patch = match boundary {
            Boundary::Start => CaptionPatch::default().start(time),
            Boundary::End => CaptionPatch::default().end(time),
        };
        self.update_caption(id, &patch)
    }

    /// Editor time-code of a boundary of the caption `id`.
    #[must_use]
    pub fn time_code(&self, id: CaptionId, boundary: Boundary) -> Option<String> {
        let entry = self.timeline().find(id)?;
        let time = match boundary {
            Boundary::Start => entry.start(),
            Boundary::End => entry.end(),
        };
        Some(TimePointEditor::from(time).to_string())
    }

    /// Replace the text of the caption `id`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_caption`].
    pub fn edit_text(&mut self, id: CaptionId, text: &str) -> Result<(), SublineError> {
        self.update_caption(id, &CaptionPatch::default().text(text))
    }

    /// Add a caption to the current track, with a new id.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::IdsExhausted` if no new id is available, or
    /// the `TimelineError` of [`CaptionEntry::new`] or [`Timeline::insert`].
    pub fn add_caption(
        &mut self,
        start: TimePoint,
        end: TimePoint,
        text: &str,
    ) -> Result<CaptionId, SublineError> {
        let id = self.timeline().next_id()?;
        let entry = CaptionEntry::new(id, TimeSpan::new(start, end), text)?;
        self.insert_caption(entry)?;
        Ok(id)
    }

    /// Add `entry` to the current track.
    ///
    /// # Errors
    ///
    /// Will return the `TimelineError` of [`Timeline::insert`].
    pub fn insert_caption(&mut self, entry: CaptionEntry) -> Result<(), SublineError> {
        let timeline = self.timeline().insert(entry)?;
        self.commit(timeline);
        Ok(())
    }

    /// Split the caption `id` at `at`: it ends there and a new caption with the
    /// same text starts there. Returns the id of the new caption.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::EntryNotFound` if there is no such caption,
    /// `TimelineError::InvalidSpan` if `at` is not strictly inside it, and
    /// `TimelineError::IdsExhausted` if no new id is available.
    pub fn split_caption(
        &mut self,
        id: CaptionId,
        at: TimePoint,
    ) -> Result<CaptionId, SublineError> {
        let timeline = self.timeline();
        let entry = timeline.find(id).ok_or(TimelineError::EntryNotFound(id))?;
        let new_id = timeline.next_id()?;
        let second = CaptionEntry::new(new_id, TimeSpan::new(at, entry.end()), entry.text())?;
        let next = timeline
            .update(id, &CaptionPatch::default().end(at))?
            .insert(second)?;
        debug!("Split caption {id} at {at}, new caption {new_id}");
        self.commit(next);
        Ok(new_id)
    }

    /// Remove the caption `id` from the current track.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::EntryNotFound` if there is no such caption.
    pub fn remove_caption(&mut self, id: CaptionId) -> Result<(), SublineError> {
        let timeline = self.timeline().remove(id)?;
        self.commit(timeline);
        Ok(())
    }

    /// Replace the whole style.
    pub fn set_style(&mut self, style: Style) {
        debug!("Set style {style:?}");
        self.style = style;
    }

    /// Change one style property from its textual value.
    ///
    /// # Errors
    ///
    /// Will return the `StyleError` of [`Style::apply`], the style is then
    /// unchanged.
    pub fn edit_style(&mut self, property: StyleProperty, value: &str) -> Result<(), SublineError> {
        self.style.apply(property, value)?;
        debug!("Set style {property:?} to '{value}'");
        Ok(())
    }

    /// Add a caption track. The current track doesn't change.
    ///
    /// # Errors
    ///
    /// Will return `TrackError::DuplicateLanguage` if the language already has
    /// a track, or `TimelineError::Overlap` if the policy is strict and
    /// `timeline` has overlapping captions.
    pub fn add_language(
        &mut self,
        language: Language,
        timeline: Timeline,
    ) -> Result<(), SublineError> {
        let track = with_policy(LanguageTrack::new(language, timeline), self.policy)?;
        self.tracks.add(track)?;
        Ok(())
    }

    /// Add a caption track from the content of a `srt` or `vtt` file. The
    /// format is detected from the `WEBVTT` signature.
    ///
    /// # Errors
    ///
    /// Will return a `CodecError` if the content can't be decoded, or the
    /// errors of [`Self::add_language`].
    pub fn import_track(&mut self, language: Language, contents: &str) -> Result<(), SublineError> {
        let is_vtt = contents
            .trim_start_matches('\u{feff}')
            .starts_with("WEBVTT");
        let timeline = if is_vtt {
            decode_vtt(contents)?
        } else {
            decode_srt(contents)?
        };
        self.add_language(language, timeline)
    }

    /// Make the track of `language` the current one.
    ///
    /// # Errors
    ///
    /// Will return `TrackError::UnknownLanguage` if there is no such track.
    pub fn select_language(&mut self, language: &Language) -> Result<(), SublineError> {
        Ok(self.tracks.select(language)?)
    }

    /// The caption of the current track displayed at `position` (in seconds),
    /// with the current style.
    #[must_use]
    pub fn active_caption(&self, position: f64) -> Option<RenderedCaption> {
        let active = playback::active_caption(self.timeline(), position)?;
        Some(RenderedCaption {
            index: active.index,
            id: active.entry.id(),
            text: active.entry.text().into(),
            attributes: self.style.resolve(),
        })
    }

    /// Jump the playback to the start of the caption `id` and pause it.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::EntryNotFound` if there is no such caption.
    pub fn begin_editing(
        &self,
        id: CaptionId,
        surface: &mut impl PlaybackSurface,
    ) -> Result<(), SublineError> {
        if playback::begin_editing(self.timeline(), id, surface) {
            Ok(())
        } else {
            Err(TimelineError::EntryNotFound(id).into())
        }
    }

    /// Export the current track in `format`.
    #[must_use]
    pub fn export(&self, format: ExportFormat) -> Export {
        export::export(format, &self.video.file_name, self.tracks.current(), &self.style)
    }

    /// Summary of the export of the current track in `format`.
    #[must_use]
    pub fn export_summary(&self, format: ExportFormat) -> ExportSummary {
        ExportSummary::new(format, self.tracks.current(), self.video.duration)
    }
}

fn with_policy(
    track: LanguageTrack,
    policy: OverlapPolicy,
) -> Result<LanguageTrack, TimelineError> {
    if policy == OverlapPolicy::Permissive {
        let pairs = track.timeline().overlapping_pairs();
        if !pairs.is_empty() {
            warn!(
                "Track '{}' has {} overlapping caption pairs",
                track.language(),
                pairs.len()
            );
        }
    }
    if track.timeline().policy() == policy {
        return Ok(track);
    }
    let timeline = Timeline::clone(track.timeline()).with_policy(policy)?;
    Ok(LanguageTrack::new(track.language().clone(), timeline))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        playback::PlaybackCommand,
        style::{Anchor, FontSize},
        time::TimeCodeError,
        timeline::TrackError,
    };

    fn session(config: &EditorConfig) -> EditingSession {
        let timeline = Timeline::from_entries([
            CaptionEntry::from_secs(CaptionId::new(1), 0., 3., "Hello").unwrap(),
            CaptionEntry::from_secs(CaptionId::new(2), 4., 7., "World").unwrap(),
        ])
        .unwrap();
        let video = VideoInfo {
            file_name: "holiday.mp4".into(),
            duration: TimePoint::from_msecs(95_000),
        };
        EditingSession::new(video, LanguageTrack::new("English".into(), timeline), config).unwrap()
    }

    #[derive(Default)]
    struct Player(Vec<PlaybackCommand>);

    impl PlaybackSurface for Player {
        fn seek(&mut self, position: TimePoint) {
            self.0.push(PlaybackCommand::Seek(position));
        }
        fn pause(&mut self) {
            self.0.push(PlaybackCommand::Pause);
        }
    }

    #[test]
    fn edit_time_codes() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut session = session(&EditorConfig::default());
        let id = CaptionId::new(1);
        assert_eq!(session.time_code(id, Boundary::End).unwrap(), "00:03.000");

        session.edit_time_code(id, Boundary::End, "00:03.750").unwrap();
        assert_eq!(session.timeline().entries()[0].end().msecs(), 3750);

        let error = session.edit_time_code(id, Boundary::Start, "0:3.5").unwrap_err();
        assert!(matches!(
            error,
            SublineError::TimeCode(TimeCodeError::Malformed(_))
        ));
        let error = session.edit_time_code(id, Boundary::Start, "00:04.000").unwrap_err();
        assert!(matches!(
            error,
            SublineError::Timeline(TimelineError::InvalidSpan { .. })
        ));
        assert_eq!(session.timeline().entries()[0].start().msecs(), 0);
        assert_eq!(session.timeline().entries()[0].end().msecs(), 3750);
    }

    #[test]
    fn snapshots_are_isolated_from_edits() {
        let mut session = session(&EditorConfig::default());
        let snapshot = session.snapshot();
        session.edit_text(CaptionId::new(2), "Everyone").unwrap();
        assert_eq!(snapshot.entries()[1].text(), "World");
        assert_eq!(session.timeline().entries()[1].text(), "Everyone");
    }

    #[test]
    fn add_split_remove() {
        let mut session = session(&EditorConfig::default());
        let id = session
            .add_caption(TimePoint::from_msecs(8000), TimePoint::from_msecs(9000), "Bye")
            .unwrap();
        assert_eq!(id, CaptionId::new(3));

        let split = session
            .split_caption(CaptionId::new(2), TimePoint::from_msecs(5000))
            .unwrap();
        assert_eq!(split, CaptionId::new(4));
        let timeline = session.timeline();
        assert_eq!(timeline.find(CaptionId::new(2)).unwrap().end().msecs(), 5000);
        assert_eq!(timeline.find(split).unwrap().start().msecs(), 5000);
        assert_eq!(timeline.find(split).unwrap().text(), "World");
        assert!(session
            .split_caption(CaptionId::new(1), TimePoint::from_msecs(3000))
            .is_err());

        session.remove_caption(CaptionId::new(3)).unwrap();
        assert!(matches!(
            session.remove_caption(CaptionId::new(3)),
            Err(SublineError::Timeline(TimelineError::EntryNotFound(_)))
        ));
        assert_eq!(session.timeline().next_id(), Ok(CaptionId::new(5)));
    }

    #[test]
    fn no_id_left_after_largest() {
        let last = CaptionId::new(u64::MAX);
        let entry = CaptionEntry::from_secs(last, 0., 3., "Last").unwrap();
        let timeline = Timeline::from_entries([entry]).unwrap();
        let video = VideoInfo {
            file_name: "clip.mp4".into(),
            duration: TimePoint::from_msecs(10_000),
        };
        let track = LanguageTrack::new("English".into(), timeline);
        let mut session = EditingSession::new(video, track, &EditorConfig::default()).unwrap();

        let error = session
            .add_caption(TimePoint::from_msecs(5000), TimePoint::from_msecs(6000), "More")
            .unwrap_err();
        assert!(matches!(
            error,
            SublineError::Timeline(TimelineError::IdsExhausted(id)) if id == last
        ));
        assert!(matches!(
            session.split_caption(last, TimePoint::from_msecs(1000)),
            Err(SublineError::Timeline(TimelineError::IdsExhausted(_)))
        ));
        assert_eq!(session.timeline().len(), 1);
        assert_eq!(session.timeline().entries()[0].end().msecs(), 3000);
    }

    #[test]
    fn strict_policy_from_config() {
        let config = EditorConfig {
            overlap_policy: OverlapPolicy::Strict,
            ..EditorConfig::default()
        };
        let mut session = session(&config);
        assert_eq!(session.overlap_policy(), OverlapPolicy::Strict);
        assert!(matches!(
            session.add_caption(TimePoint::from_msecs(2000), TimePoint::from_msecs(5000), "Over"),
            Err(SublineError::Timeline(TimelineError::Overlap { .. }))
        ));
        let overlapping = Timeline::from_entries([
            CaptionEntry::from_secs(CaptionId::new(1), 0., 3., "A").unwrap(),
            CaptionEntry::from_secs(CaptionId::new(2), 1., 4., "B").unwrap(),
        ])
        .unwrap();
        assert!(session.add_language("French".into(), overlapping).is_err());
        assert_eq!(session.tracks().len(), 1);
    }

    #[test]
    fn style_applies_to_active_caption() {
        let mut session = session(&EditorConfig::default());
        assert!(session.active_caption(3.5).is_none());

        session.edit_style(StyleProperty::Size, "large").unwrap();
        session.edit_style(StyleProperty::Position, "middle").unwrap();
        session.edit_style(StyleProperty::BackgroundColor, "#202020").unwrap();
        assert!(session.edit_style(StyleProperty::Color, "red").is_err());

        let rendered = session.active_caption(5.).unwrap();
        assert_eq!(rendered.index, 1);
        assert_eq!(rendered.id, CaptionId::new(2));
        assert_eq!(rendered.text, "World");
        assert_eq!(rendered.attributes.font_size_px, 32);
        assert_eq!(rendered.attributes.anchor, Anchor::Middle);
        assert_eq!(rendered.attributes.background_color.to_string(), "#202020AA");
        assert_eq!(session.style().size, FontSize::Large);

        session.set_style(Style::default());
        assert_eq!(session.active_caption(5.).unwrap().attributes.font_size_px, 24);
    }

    #[test]
    fn language_tracks() {
        let mut session = session(&EditorConfig::default());
        session
            .import_track(
                "French".into(),
                "WEBVTT\n\n00:00.000 --> 00:03.000\nBonjour\n",
            )
            .unwrap();
        session
            .import_track("German".into(), "1\n00:00:00,000 --> 00:00:03,000\nHallo\n")
            .unwrap();
        assert!(matches!(
            session.import_track("Spanish".into(), "WEBVTT\n\n00:00.000 --> 00:03\nHola\n"),
            Err(SublineError::Codec(_))
        ));
        assert_eq!(session.tracks().len(), 3);

        session.select_language(&"French".into()).unwrap();
        assert_eq!(session.active_caption(1.).unwrap().text, "Bonjour");
        assert!(matches!(
            session.select_language(&"Japanese".into()),
            Err(SublineError::Track(TrackError::UnknownLanguage(_)))
        ));
        assert!(matches!(
            session.add_language("German".into(), Timeline::new()),
            Err(SublineError::Track(TrackError::DuplicateLanguage(_)))
        ));

        let Export::Text(artifact) = session.export(ExportFormat::Srt) else {
            panic!("srt export is a text file");
        };
        assert_eq!(artifact.file_name, "holiday_French.srt");
        assert_eq!(
            artifact.contents,
            "1\n00:00:00,000 --> 00:00:03,000\nBonjour\n"
        );
        let summary = session.export_summary(ExportFormat::Vtt);
        assert_eq!(summary.caption_count, 1);
        assert_eq!(export::format_duration(summary.duration), "1:35");
    }

    #[test]
    fn begin_editing_drives_player() {
        let session = session(&EditorConfig::default());
        let mut player = Player::default();
        session.begin_editing(CaptionId::new(2), &mut player).unwrap();
        assert_eq!(
            player.0,
            [
                PlaybackCommand::Seek(TimePoint::from_msecs(4000)),
                PlaybackCommand::Pause
            ]
        );
        assert!(session.begin_editing(CaptionId::new(7), &mut player).is_err());
    }
}
