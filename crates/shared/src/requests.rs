//! Request bodies and query parameters sent to the backend

use serde::{Deserialize, Serialize};

/// Body of `POST /process_action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessActionRequest {
    /// Free-text player action, e.g. `"talk to Alice: hi"`.
    pub action: String,
    pub story_id: i64,
}

/// Query parameters of `GET /stories/{id}/messages`.
///
/// `None` fields are omitted from the query string; the backend defaults
/// limit to 100 and offset to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHistoryQuery {
    pub session_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl MessageHistoryQuery {
    /// Render as a query string, empty when no parameter is set.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(session_id) = &self.session_id {
            parts.push(format!("session_id={session_id}"));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("offset={offset}"));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body of `POST /stories/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `PUT /stories/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStoryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One slot of an NPC's daily schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub event: String,
}

/// NPC definition submitted with a complete story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryNpc {
    pub name: String,
    pub personality: String,
    #[serde(default)]
    pub background: String,
    #[serde(default)]
    pub mood: String,
    /// Free-form relationship map, passed through untouched.
    #[serde(default)]
    pub relations: serde_json::Value,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
}

/// Location definition submitted with a complete story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryLocation {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub en_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub connections: Vec<String>,
}

/// Body of `POST /stories/create-complete` - a story together with its
/// NPCs, locations, and game configuration in one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompleteStoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub npcs: Vec<StoryNpc>,
    pub locations: Vec<StoryLocation>,
    pub game_config: crate::responses::StoryConfig,
}
