use std::{fmt, sync::Arc};

use compact_str::CompactString;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Timeline;

/// Error for language track handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrackError {
    /// No track exists for this language.
    #[error("No caption track for language '{0}'")]
    UnknownLanguage(Language),

    /// A track already exists for this language.
    #[error("A caption track for language '{0}' already exists")]
    DuplicateLanguage(Language),
}

/// Language label of a caption track, as shown to the user (`English`, `fr`…).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(CompactString);

impl Language {
    /// Create a language from its label.
    #[must_use]
    pub fn new(label: impl Into<CompactString>) -> Self {
        Self(label.into())
    }

    /// The language label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Language {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A timeline and the language of its captions.
///
/// The timeline is kept behind an [`Arc`]: [`Self::snapshot`] hands out a
/// point-in-time copy that later edits don't affect.
#[derive(Debug, Clone)]
pub struct LanguageTrack {
    language: Language,
    timeline: Arc<Timeline>,
}

impl LanguageTrack {
    /// Create a track.
    #[must_use]
    pub fn new(language: Language, timeline: Timeline) -> Self {
        Self {
            language,
            timeline: Arc::new(timeline),
        }
    }

    /// Language of the captions.
    #[must_use]
    pub const fn language(&self) -> &Language {
        &self.language
    }

    /// Current timeline.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Shared handle on the current timeline.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Timeline> {
        Arc::clone(&self.timeline)
    }

    /// Install a new timeline value. Outstanding snapshots keep the old one.
    pub fn replace_timeline(&mut self, timeline: Timeline) {
        self.timeline = Arc::new(timeline);
    }
}

/// The caption tracks of one video. Never empty, exactly one track is current.
#[derive(Debug, Clone)]
pub struct TrackSet {
    tracks: Vec<LanguageTrack>,
    current: usize,
}

impl TrackSet {
    /// Create a set holding `first`, which becomes the current track.
    #[must_use]
    pub fn new(first: LanguageTrack) -> Self {
        Self {
            tracks: vec![first],
            current: 0,
        }
    }

    /// The current track.
    #[must_use]
    pub fn current(&self) -> &LanguageTrack {
        &self.tracks[self.current]
    }

    /// The current track, for edition.
    pub fn current_mut(&mut self) -> &mut LanguageTrack {
        &mut self.tracks[self.current]
    }

    /// Track of `language`, if any.
    #[must_use]
    pub fn get(&self, language: &Language) -> Option<&LanguageTrack> {
        self.tracks.iter().find(|track| track.language() == language)
    }

    /// Languages of the tracks, in insertion order.
    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.tracks.iter().map(LanguageTrack::language)
    }

    /// Number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always `false`, a set holds at least one track.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Add a track. The current track doesn't change.
    ///
    /// # Errors
    ///
    /// Will return `TrackError::DuplicateLanguage` if a track already exists
    /// for this language.
    pub fn add(&mut self, track: LanguageTrack) -> Result<(), TrackError> {
        if self.get(track.language()).is_some() {
            return Err(TrackError::DuplicateLanguage(track.language().clone()));
        }
        debug!("Add caption track '{}'", track.language());
        self.tracks.push(track);
        Ok(())
    }

    /// Make the track of `language` the current one.
    ///
    /// # Errors
    ///
    /// Will return `TrackError::UnknownLanguage` if no track exists for this
    /// language; the current track is kept.
    pub fn select(&mut self, language: &Language) -> Result<(), TrackError> {
        let index = self
            .tracks
            .iter()
            .position(|track| track.language() == language)
            .ok_or_else(|| TrackError::UnknownLanguage(language.clone()))?;
        debug!("Select caption track '{language}'");
        self.current = index;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::{CaptionEntry, CaptionId};

    fn track(label: &str, captions: usize) -> LanguageTrack {
        let entries = (0..captions).map(|i| {
            let start = i as f64 * 2.;
            CaptionEntry::from_secs(CaptionId::new(i as u64 + 1), start, start + 1., "text")
                .unwrap()
        });
        LanguageTrack::new(label.into(), Timeline::from_entries(entries).unwrap())
    }

    #[test]
    fn select_switches_current_track() {
        let mut tracks = TrackSet::new(track("English", 2));
        tracks.add(track("French", 3)).unwrap();
        assert_eq!(tracks.current().language().label(), "English");

        tracks.select(&"French".into()).unwrap();
        assert_eq!(tracks.current().timeline().len(), 3);
        assert_eq!(
            tracks.languages().map(Language::label).collect::<Vec<_>>(),
            ["English", "French"]
        );
    }

    #[test]
    fn unknown_and_duplicate_languages() {
        let mut tracks = TrackSet::new(track("English", 1));
        assert_eq!(
            tracks.select(&"German".into()),
            Err(TrackError::UnknownLanguage("German".into()))
        );
        assert_eq!(tracks.current().language().label(), "English");
        assert_eq!(
            tracks.add(track("English", 0)),
            Err(TrackError::DuplicateLanguage("English".into()))
        );
        assert_eq!(tracks.len(), 1);
        assert!(!tracks.is_empty());
    }

    #[test]
    fn snapshot_outlives_replacement() {
        let mut track = track("English", 2);
        let snapshot = track.snapshot();
        track.replace_timeline(Timeline::new());
        assert_eq!(snapshot.len(), 2);
        assert!(track.timeline().is_empty());
    }
}
