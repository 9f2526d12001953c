//! Server-side message log records
//!
//! A `GameMessage` is one immutable row of the authoritative, per-story
//! message log. The client only ever reads these; ids are unique and
//! monotonic within a story, and the history endpoint returns records in
//! creation order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Discriminant for the heterogeneous message schema.
///
/// The backend sends both a numeric `message_type` and this name; the name
/// is authoritative for the client. `Unknown` absorbs tags added server-side
/// before the client learns about them - normalization is fail-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Raw player input as submitted.
    UserInput,
    /// A line spoken by an NPC.
    NpcDialogue,
    /// Result of a world action (movement, interaction).
    SystemAction,
    /// Scene description through the senses, may embed a JSON payload.
    SensoryFeedback,
    /// Out-of-band information for the player.
    SystemInfo,
    /// A failure the server chose to narrate.
    ErrorMessage,
    /// Forward compatibility for tags this client does not know.
    #[serde(other)]
    Unknown,
}

impl MessageKind {
    /// Map the backend's numeric discriminant to a kind.
    ///
    /// The numeric codes predate the names and are kept in the payload for
    /// older readers; 1 through 6 match the declaration order above.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::UserInput,
            2 => Self::NpcDialogue,
            3 => Self::SystemAction,
            4 => Self::SensoryFeedback,
            5 => Self::SystemInfo,
            6 => Self::ErrorMessage,
            other => {
                tracing::debug!(code = other, "unrecognized message type code");
                Self::Unknown
            }
        }
    }
}

/// One record of the authoritative message log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMessage {
    /// Unique, monotonic per story.
    pub id: i64,
    pub user_id: i64,
    pub story_id: i64,
    pub session_id: String,
    /// Numeric discriminant; `message_type_name` is authoritative.
    pub message_type: i32,
    pub message_type_name: MessageKind,
    #[serde(default)]
    pub sub_type: Option<String>,
    pub content: String,
    /// Opaque structured payload; the client passes it through untouched.
    #[serde(default)]
    pub structured_data: Option<serde_json::Value>,
    #[serde(default)]
    pub related_entity: Option<i64>,
    /// NPC display name for `npc_dialogue` records.
    #[serde(default)]
    pub related_entity_name: Option<String>,
    #[serde(default)]
    pub location: Option<i64>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub game_time: Option<String>,
    #[serde(default)]
    pub message_metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// One page of the paginated history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageHistory {
    /// Records in creation order.
    pub messages: Vec<GameMessage>,
    pub total_count: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}
