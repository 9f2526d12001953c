//! Entities - domain objects with identity and lifecycle

mod game_state;

pub use game_state::{GameState, NpcPresence};
