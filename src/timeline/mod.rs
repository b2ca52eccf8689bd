//! Ordered collection of timed captions for one language track.
//!
//! Entries are kept in document (insertion) order. Playback lookups follow
//! that order, exports sort by start time on demand.
//!
//! Every mutation returns a new [`Timeline`] and leaves the receiver
//! untouched, so a reader holding the previous value keeps a consistent view.
//!
//! Overlapping entries are accepted by default ([`OverlapPolicy::Permissive`]).
//! [`OverlapPolicy::Strict`] rejects them on insertion and update.
mod entry;
mod track;

pub use entry::{CaptionEntry, CaptionId, CaptionPatch};
pub use track::{Language, LanguageTrack, TrackError, TrackSet};

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, slice};
use thiserror::Error;

use crate::time::{TimeCodeError, TimeSpan};

/// Error for timeline handling.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TimelineError {
    /// No entry has the requested id.
    #[error("No caption with id {0}")]
    EntryNotFound(CaptionId),

    /// An entry with the same id is already in the timeline.
    #[error("Caption id {0} is already used")]
    DuplicateId(CaptionId),

    /// The entry doesn't start at or after the origin, or doesn't end strictly
    /// after its start.
    #[error("Caption {id} has an invalid span: {} --> {}", span.start, span.end)]
    InvalidSpan {
        /// Id of the rejected entry.
        id: CaptionId,
        /// The rejected span.
        span: TimeSpan,
    },

    /// The entry text is blank.
    #[error("Caption {0} has no text")]
    EmptyText(CaptionId),

    /// The entry overlaps another one while [`OverlapPolicy::Strict`] is active.
    #[error("Caption {id} overlaps caption {other}")]
    Overlap {
        /// Id of the rejected entry.
        id: CaptionId,
        /// Id of the entry already in place.
        other: CaptionId,
    },

    /// Every id above the highest one in use is taken.
    #[error("No caption id left after {0}")]
    IdsExhausted(CaptionId),

    /// A time value couldn't be converted.
    #[error("Invalid caption time")]
    TimeCode(#[from] TimeCodeError),
}

/// How a [`Timeline`] treats overlapping entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Overlaps are accepted, the first entry in document order wins playback.
    #[default]
    Permissive,
    /// Insertions and updates creating an overlap are rejected.
    Strict,
}

/// The captions of one language track.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
    entries: Vec<CaptionEntry>,
    /// Highest id ever held by this timeline or its ancestors.
    last_id: u64,
    policy: OverlapPolicy,
}

impl Timeline {
    /// Create an empty, permissive timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a permissive timeline holding `entries` in the given order.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::DuplicateId` if two entries share an id.
    pub fn from_entries(
        entries: impl IntoIterator<Item = CaptionEntry>,
    ) -> Result<Self, TimelineError> {
        let entries: Vec<_> = entries.into_iter().collect();
        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(dup) = entries.iter().find(|entry| !seen.insert(entry.id())) {
            return Err(TimelineError::DuplicateId(dup.id()));
        }
        let last_id = entries.iter().map(|entry| entry.id().value()).max().unwrap_or(0);
        Ok(Self {
            entries,
            last_id,
            policy: OverlapPolicy::Permissive,
        })
    }

    /// Switch the overlap policy.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::Overlap` when switching to
    /// [`OverlapPolicy::Strict`] while entries already overlap.
    pub fn with_policy(mut self, policy: OverlapPolicy) -> Result<Self, TimelineError> {
        if policy == OverlapPolicy::Strict {
            if let Some(&(id, other)) = self.overlapping_pairs().first() {
                return Err(TimelineError::Overlap { id, other });
            }
        }
        self.policy = policy;
        Ok(self)
    }

    /// Current overlap policy.
    #[must_use]
    pub const fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the timeline empty ?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in document order.
    #[must_use]
    pub fn entries(&self) -> &[CaptionEntry] {
        &self.entries
    }

    /// Iterate entries in document order.
    pub fn iter(&self) -> slice::Iter<'_, CaptionEntry> {
        self.entries.iter()
    }

    /// Entry at `index` in document order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CaptionEntry> {
        self.entries.get(index)
    }

    /// Entry with the given id.
    #[must_use]
    pub fn find(&self, id: CaptionId) -> Option<&CaptionEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Document index of the entry with the given id.
    #[must_use]
    pub fn index_of(&self, id: CaptionId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// An id that was never used in this timeline, removed entries included.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::IdsExhausted` if the highest id ever held is
    /// `u64::MAX`.
    pub const fn next_id(&self) -> Result<CaptionId, TimelineError> {
        match self.last_id.checked_add(1) {
            Some(value) => Ok(CaptionId::new(value)),
            None => Err(TimelineError::IdsExhausted(CaptionId::new(self.last_id))),
        }
    }

    /// Index of the entry displayed at `position` (in seconds).
    ///
    /// Both ends of an entry are inclusive. When entries overlap, the first one
    /// in document order is returned.
    #[must_use]
    pub fn find_active(&self, position: f64) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.span().contains(position))
    }

    /// Replace the entry with id `id` by its patched version.
    ///
    /// The entry keeps its place in document order and is not compared to its
    /// neighbours, except for overlap under [`OverlapPolicy::Strict`].
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::EntryNotFound` if no entry has this id, or
    /// the error from [`CaptionEntry::patched`] if the result is invalid.
    pub fn update(&self, id: CaptionId, patch: &CaptionPatch) -> Result<Self, TimelineError> {
        let index = self.index_of(id).ok_or(TimelineError::EntryNotFound(id))?;
        let entry = self.entries[index].patched(patch)?;
        self.check_overlap(&entry)?;
        debug!("Update caption {id}: {patch:?}");

        let mut next = self.clone();
        next.entries[index] = entry;
        Ok(next)
    }

    /// Append `entry` at the end of the document order.
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::DuplicateId` if the id is already used.
    pub fn insert(&self, entry: CaptionEntry) -> Result<Self, TimelineError> {
        let id = entry.id();
        if self.find(id).is_some() {
            return Err(TimelineError::DuplicateId(id));
        }
        self.check_overlap(&entry)?;
        debug!("Insert caption {id} at {}", entry.start());

        let mut next = self.clone();
        next.last_id = next.last_id.max(id.value());
        next.entries.push(entry);
        Ok(next)
    }

    /// Remove the entry with id `id`. Its id won't be handed out again by
    /// [`Self::next_id`].
    ///
    /// # Errors
    ///
    /// Will return `TimelineError::EntryNotFound` if no entry has this id.
    pub fn remove(&self, id: CaptionId) -> Result<Self, TimelineError> {
        let index = self.index_of(id).ok_or(TimelineError::EntryNotFound(id))?;
        debug!("Remove caption {id}");

        let mut next = self.clone();
        next.entries.remove(index);
        Ok(next)
    }

    /// Entries sorted by start time. Entries starting together keep their
    /// document order.
    #[must_use]
    pub fn sorted_by_start(&self) -> Vec<&CaptionEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by_key(|entry| entry.start());
        sorted
    }

    /// Pairs of overlapping entries, ordered by start time.
    #[must_use]
    pub fn overlapping_pairs(&self) -> Vec<(CaptionId, CaptionId)> {
        let sorted = self.sorted_by_start();
        let mut pairs = Vec::new();
        for (i, first) in sorted.iter().enumerate() {
            pairs.extend(
                sorted[i + 1..]
                    .iter()
                    .take_while(|second| second.start() < first.end())
                    .filter(|second| first.span().overlaps(second.span()))
                    .map(|second| (first.id(), second.id())),
            );
        }
        pairs
    }

    fn check_overlap(&self, candidate: &CaptionEntry) -> Result<(), TimelineError> {
        if self.policy == OverlapPolicy::Permissive {
            return Ok(());
        }
        match self
            .entries
            .iter()
            .filter(|entry| entry.id() != candidate.id())
            .find(|entry| entry.span().overlaps(candidate.span()))
        {
            Some(other) => {
                trace!("Caption {} rejected, overlaps {}", candidate.id(), other.id());
                Err(TimelineError::Overlap {
                    id: candidate.id(),
                    other: other.id(),
                })
            }
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a CaptionEntry;
    type IntoIter = slice::Iter<'a, CaptionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
