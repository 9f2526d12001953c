//! Transcript entries and merge primitives
//!
//! The transcript is the ordered list of narrative/dialogue lines shown to
//! the player. Ordering is append-only and chronologically significant;
//! entries are not unique (a repeated greeting is two distinct lines), so
//! identity is positional rather than content-based.
//!
//! The merge helpers below encode the one place where content equality *is*
//! used: reconciling optimistic local-only entries against a freshly fetched
//! authoritative history. Server-persisted entries never go through content
//! matching - the fetch result replaces them wholesale.

use serde::{Deserialize, Serialize};

/// Canonical speaker names used by the normalizer and filters.
///
/// NPC entries use the NPC's display name as the speaker, so only the two
/// non-NPC speakers are fixed.
pub mod speakers {
    /// Speaker for lines originating from the player's own input.
    pub const PLAYER: &str = "Player";
    /// Speaker for narration, action results, sensory feedback, and errors.
    pub const SYSTEM: &str = "System";
    /// Fallback speaker when an NPC line carries no entity name.
    pub const UNKNOWN_NPC: &str = "NPC";
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Display name of whoever produced the line.
    pub speaker: String,
    /// The line itself, free text. May embed a JSON sensory payload.
    pub message: String,
}

impl TranscriptEntry {
    pub fn new(speaker: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            message: message.into(),
        }
    }

    /// A line spoken by the player.
    pub fn player(message: impl Into<String>) -> Self {
        Self::new(speakers::PLAYER, message)
    }

    /// A system/narration line.
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(speakers::SYSTEM, message)
    }

    /// Whether this entry matches another by (speaker, message) content.
    ///
    /// Content matching is a heuristic reserved for locally synthesized
    /// entries that have no server id yet.
    pub fn same_content(&self, other: &TranscriptEntry) -> bool {
        self.speaker == other.speaker && self.message == other.message
    }
}

/// Whether `entry` occurs anywhere in `history` by (speaker, message).
pub fn contains_entry(history: &[TranscriptEntry], entry: &TranscriptEntry) -> bool {
    history.iter().any(|e| e.same_content(entry))
}

/// Reconcile optimistic local-only entries against a fetched history.
///
/// The authoritative sequence always survives intact and in order. The
/// pending batch is judged by its *first* element: if that element already
/// appears anywhere in the fetched sequence, the server has persisted the
/// batch and the whole pending set is dropped; otherwise the batch is
/// prepended ahead of the fetched history.
///
/// This assumes no two distinct pending batches share an identical
/// (speaker, message) first entry, which holds for the single-user,
/// single-session flow that produces them.
pub fn merge_pending(
    fetched: Vec<TranscriptEntry>,
    pending: &[TranscriptEntry],
) -> Vec<TranscriptEntry> {
    let Some(first) = pending.first() else {
        return fetched;
    };

    if contains_entry(&fetched, first) {
        return fetched;
    }

    let mut merged = Vec::with_capacity(pending.len() + fetched.len());
    merged.extend_from_slice(pending);
    merged.extend(fetched);
    merged
}
