//! Game state snapshot owned by the client
//!
//! The single `GameState` is created when a story is selected, replaced
//! wholesale on every authoritative action response, and destroyed on logout
//! or story deselection. Its `dialogue_history` is additionally reconciled
//! against the fetched message log; see the client crate's session store.
//!
//! Simple serde data structs with public fields - the invariants live in the
//! store that owns the value, not here.

use serde::{Deserialize, Serialize};

use crate::value_objects::transcript::TranscriptEntry;

/// An NPC present at the player's current location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcPresence {
    /// Display name, also used as the transcript speaker for this NPC.
    pub name: String,
    /// What the NPC is currently doing.
    #[serde(default)]
    pub event: String,
    /// Short personality line shown on the NPC card.
    #[serde(default)]
    pub personality: String,
}

/// Snapshot of the running game as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    /// Location key the player currently occupies.
    pub player_location: String,
    /// In-game clock, server-formatted.
    pub current_time: String,
    /// Prose description of the current location.
    pub location_description: String,
    /// Location keys reachable from here, in server order.
    #[serde(default)]
    pub connected_locations: Vec<String>,
    /// NPCs present at the current location.
    #[serde(default)]
    pub npcs_at_current_location: Vec<NpcPresence>,
    /// Ordered transcript of everything that has happened.
    #[serde(default)]
    pub dialogue_history: Vec<TranscriptEntry>,
}

impl GameState {
    /// Copy of this state with `dialogue_history` swapped out.
    ///
    /// The store mutates only by whole-value replacement, so transcript
    /// reconciliation produces a new state rather than editing in place.
    pub fn with_history(&self, dialogue_history: Vec<TranscriptEntry>) -> Self {
        Self {
            dialogue_history,
            ..self.clone()
        }
    }
}
