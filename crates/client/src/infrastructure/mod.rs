//! Infrastructure adapters - concrete implementations of the outbound ports

pub mod http_client;
pub mod message_translator;

pub use http_client::ApiAdapter;
pub use message_translator::{translate_history, translate_message};
