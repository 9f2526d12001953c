//! Taleweave client engine.
//!
//! This crate keeps a locally held transcript synchronized with the
//! authoritative message log of the game backend: optimistic local appends,
//! authoritative refetch after every mutating action, and merge of the two
//! without duplication or lost lines. The console binary in `main.rs` is a
//! thin composition root over the same services.

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::error::ServiceError;
pub use application::services::{
    AuthService, ConsoleSnapshot, DebugService, GameService, HistoryService, NpcChat, Phase,
    SessionStore, StoryService, SubmitOutcome,
};
pub use infrastructure::http_client::ApiAdapter;
pub use ports::outbound::{ApiError, BearerToken, GameApiPort};
