//! Response bodies received from the backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /game_state` and `POST /process_action`.
///
/// The snapshot's wire shape is identical to the domain type, so the domain
/// vocabulary is reused directly rather than duplicated here.
pub type GameStateSnapshot = taleweave_domain::GameState;

/// The authenticated user as the backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of a successful `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserInfo,
    pub access_token: String,
    pub token_type: String,
}

/// Body of a successful `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserInfo,
    pub message: String,
}

/// Per-story game configuration echoed by the story endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryConfig {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_place: String,
    #[serde(default)]
    pub init_time: String,
}

/// A story as listed by `GET /stories/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub creator_id: i64,
    #[serde(default)]
    pub game_config: StoryConfig,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
