//! Synchronisation of the displayed caption with the playback position.
//!
//! Nothing here keeps state: the caller owns the previous result and passes it
//! back on the next tick.
use log::{debug, trace};

use crate::{
    time::TimePoint,
    timeline::{CaptionEntry, CaptionId, Timeline},
};

/// Index of the caption displayed at `position` (in seconds).
///
/// Same as [`Timeline::find_active`]: both ends are inclusive, and the first
/// entry in document order wins when several overlap.
#[must_use]
pub fn active_index(timeline: &Timeline, position: f64) -> Option<usize> {
    timeline.find_active(position)
}

/// The caption displayed at a playback position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveCaption<'a> {
    /// Document index of the entry.
    pub index: usize,
    /// The entry.
    pub entry: &'a CaptionEntry,
}

/// The caption displayed at `position`, if any.
#[must_use]
pub fn active_caption(timeline: &Timeline, position: f64) -> Option<ActiveCaption<'_>> {
    let index = active_index(timeline, position)?;
    timeline
        .get(index)
        .map(|entry| ActiveCaption { index, entry })
}

/// Result of a playback tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncUpdate {
    /// Index of the active caption.
    pub index: Option<usize>,
    /// Is `index` different from the previous tick ? Views scrolling to the
    /// active caption only need to react then.
    pub changed: bool,
}

/// Compute the active caption for a new playback `position`, `previous` being
/// the index returned by the previous tick.
#[must_use]
pub fn sync(timeline: &Timeline, previous: Option<usize>, position: f64) -> SyncUpdate {
    let index = active_index(timeline, position);
    let changed = index != previous;
    if changed {
        trace!("Active caption at {position}s: {previous:?} -> {index:?}");
    }
    SyncUpdate { index, changed }
}

/// Commands accepted by the video playback surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Move the playback to a position.
    Seek(TimePoint),
    /// Stop advancing the playback.
    Pause,
}

/// The video player, owned outside of this crate.
pub trait PlaybackSurface {
    /// Move the playback to `position`.
    fn seek(&mut self, position: TimePoint);
    /// Pause the playback.
    fn pause(&mut self);

    /// Run `command`.
    fn apply(&mut self, command: PlaybackCommand) {
        match command {
            PlaybackCommand::Seek(position) => self.seek(position),
            PlaybackCommand::Pause => self.pause(),
        }
    }
}

/// Commands to run on the playback surface when the edition of `entry` begins:
/// jump to its start and pause.
#[must_use]
pub fn editing_commands(entry: &CaptionEntry) -> [PlaybackCommand; 2] {
    [PlaybackCommand::Seek(entry.start()), PlaybackCommand::Pause]
}

/// Prepare the edition of the caption `id`: the playback jumps to its start
/// and pauses. Returns `false` if `timeline` has no such caption, the surface
/// is then left untouched.
pub fn begin_editing(
    timeline: &Timeline,
    id: CaptionId,
    surface: &mut impl PlaybackSurface,
) -> bool {
    let Some(entry) = timeline.find(id) else {
        return false;
    };
    debug!("Begin editing caption {id} at {}", entry.start());
    for command in editing_commands(entry) {
        surface.apply(command);
    }
    true
}
