//! Application services
//!
//! Each service wraps the API port behind a focused interface. The session
//! store owns the single `GameState`; the game service orchestrates the
//! optimistic-update/refetch/merge cycle across the other two.

mod auth_service;
mod debug_service;
mod game_service;
mod history_service;
mod session_service;
mod story_service;

pub use auth_service::AuthService;
pub use debug_service::{ConsoleSnapshot, DebugService};
pub use game_service::{GameService, NpcChat, Phase, SubmitOutcome};
pub use history_service::HistoryService;
pub use session_service::SessionStore;
pub use story_service::StoryService;
