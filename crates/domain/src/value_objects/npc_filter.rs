//! Character-scoped transcript filtering
//!
//! Derives the sub-transcript of everything said to, by, or about a given
//! NPC. This is a string-matching heuristic, not a structural join: player
//! lines addressed to an NPC follow the canonical `"talk to {name}: ..."`
//! phrasing the client itself composes, so the filter looks for that pattern
//! rather than a conversation id. Messages that mention a name incidentally
//! can slip through, and reworded player lines can be missed; that behavior
//! is kept as-is until the backend stamps a conversation partner on each
//! message.

use crate::value_objects::transcript::{speakers, TranscriptEntry};

/// Ordered sub-transcript of entries involving `npc_name`.
///
/// Keeps entries where the NPC is the speaker, player lines addressed to the
/// NPC, and NPC reply lines. Ordering is preserved and the source slice is
/// never mutated.
pub fn filter_for_npc(history: &[TranscriptEntry], npc_name: &str) -> Vec<TranscriptEntry> {
    let addressed = format!("talk to {npc_name}");
    let said_to = format!("to {npc_name} said");

    history
        .iter()
        .filter(|entry| {
            entry.speaker == npc_name
                || (entry.speaker == speakers::PLAYER
                    && (entry.message.contains(&addressed) || entry.message.contains(&said_to)))
                || (entry.speaker == npc_name && entry.message.contains("reply"))
        })
        .cloned()
        .collect()
}
