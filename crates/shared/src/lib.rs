//! Wire-format types for the Taleweave backend REST surface.
//!
//! These types mirror what the backend actually serializes, field for field.
//! The client and the backend must agree on them, so they live apart from
//! the domain crate: the domain owns meaning, this crate owns shape.

pub mod messages;
pub mod requests;
pub mod responses;

pub use messages::{GameMessage, MessageHistory, MessageKind};
pub use requests::{
    CreateCompleteStoryRequest, CreateStoryRequest, LoginRequest, MessageHistoryQuery,
    ProcessActionRequest, RegisterRequest, ScheduleSlot, StoryLocation, StoryNpc,
    UpdateStoryRequest,
};
pub use responses::{
    GameStateSnapshot, LoginResponse, RegisterResponse, Story, StoryConfig, UserInfo,
};
