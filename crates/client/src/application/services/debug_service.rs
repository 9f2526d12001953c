//! Developer console data
//!
//! Read-only introspection fetched from the backend's debug endpoints. The
//! two fetches run concurrently; neither touches the session store, so a
//! console refresh can overlap an in-flight action submit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::application::error::ServiceError;
use crate::ports::outbound::GameApiPort;

/// One refresh of the developer console.
#[derive(Debug, Clone)]
pub struct ConsoleSnapshot {
    /// Raw `/debug/locations` payload.
    pub locations: Value,
    /// Raw `/debug/npc_locations` payload.
    pub npcs: Value,
    pub fetched_at: DateTime<Utc>,
}

/// Service for the developer console view.
#[derive(Clone)]
pub struct DebugService {
    api: Arc<dyn GameApiPort>,
}

impl DebugService {
    pub fn new(api: Arc<dyn GameApiPort>) -> Self {
        Self { api }
    }

    /// Fetch both debug payloads concurrently.
    pub async fn console_snapshot(&self) -> Result<ConsoleSnapshot, ServiceError> {
        let (locations, npcs) = tokio::join!(
            self.api.fetch_debug("locations".to_string()),
            self.api.fetch_debug("npc_locations".to_string()),
        );

        Ok(ConsoleSnapshot {
            locations: locations?,
            npcs: npcs?,
            fetched_at: Utc::now(),
        })
    }
}
