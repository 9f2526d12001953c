//! Game API Port - typed boundary to the backend REST surface
//!
//! The backend is an external collaborator reached over JSON/HTTP. This
//! trait is the only way application services touch it, which keeps the
//! reconciliation logic testable against a mock.
//!
//! Note: the async methods use `async_trait` instead of returning
//! `Pin<Box<dyn Future>>` for better mockall compatibility.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use taleweave_domain::GameState;
use taleweave_shared::{
    CreateCompleteStoryRequest, CreateStoryRequest, LoginRequest, LoginResponse, MessageHistory,
    MessageHistoryQuery, ProcessActionRequest, RegisterRequest, RegisterResponse, Story,
    UpdateStoryRequest,
};

/// Errors crossing the HTTP boundary.
///
/// `AuthExpired` is special-cased by every caller: it clears the local
/// session and surfaces to the top level, never retried. Everything else is
/// a user-facing string as far as the merge state machine is concerned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure (unreachable host, timeout, broken pipe).
    #[error("network failure: {0}")]
    Network(String),

    /// 401 - the bearer credential is no longer accepted.
    #[error("credential expired, please sign in again")]
    AuthExpired,

    /// 403
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// 404
    #[error("not found: {0}")]
    NotFound(String),

    /// 5xx
    #[error("server fault: {0}")]
    Server(String),

    /// A 200 response whose body did not decode as expected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other non-success status.
    #[error("unexpected status {0}: {1}")]
    Unexpected(u16, String),
}

impl ApiError {
    /// Whether this error must force a logout.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

/// Port for the backend REST surface.
///
/// One method per endpoint the client consumes. Implementations attach the
/// bearer credential themselves; callers never see it.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GameApiPort: Send + Sync {
    /// `POST /auth/login` - no credential required.
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `POST /auth/register` - no credential required.
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError>;

    /// `GET /game_state?story_id=` - snapshot of the running game.
    async fn fetch_game_state(&self, story_id: i64) -> Result<GameState, ApiError>;

    /// `POST /process_action` - submit a player action, returns the updated
    /// snapshot. The snapshot's transcript is partial-trust; see the
    /// reconciliation controller.
    async fn process_action(&self, request: ProcessActionRequest) -> Result<GameState, ApiError>;

    /// `GET /stories/{id}/messages` - one page of the authoritative log.
    async fn fetch_messages(
        &self,
        story_id: i64,
        query: MessageHistoryQuery,
    ) -> Result<MessageHistory, ApiError>;

    /// `GET /stories/`
    async fn list_stories(&self) -> Result<Vec<Story>, ApiError>;

    /// `POST /stories/`
    async fn create_story(&self, request: CreateStoryRequest) -> Result<Story, ApiError>;

    /// `POST /stories/create-complete` - story plus NPCs and locations.
    async fn create_complete_story(
        &self,
        request: CreateCompleteStoryRequest,
    ) -> Result<Story, ApiError>;

    /// `PUT /stories/{id}`
    async fn update_story(
        &self,
        story_id: i64,
        request: UpdateStoryRequest,
    ) -> Result<Story, ApiError>;

    /// `DELETE /stories/{id}`
    async fn delete_story(&self, story_id: i64) -> Result<(), ApiError>;

    /// `GET /debug/{path}` - read-only introspection for the console view.
    async fn fetch_debug(&self, path: String) -> Result<Value, ApiError>;
}
