pub mod entities;
pub mod error;
pub mod value_objects;

pub use entities::{GameState, NpcPresence};

pub use error::DomainError;

pub use value_objects::npc_filter::filter_for_npc;
pub use value_objects::sensory::{parse_sensory_payload, SensoryPayload};
pub use value_objects::transcript::{
    contains_entry, merge_pending, speakers, TranscriptEntry,
};
