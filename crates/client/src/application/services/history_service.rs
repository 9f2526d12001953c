//! History fetcher
//!
//! Retrieves the authoritative, paginated message log for a story and
//! flattens it into transcript entries. Server order is preserved end to
//! end; pagination is followed until the backend reports no more pages.

use std::sync::Arc;

use taleweave_domain::TranscriptEntry;
use taleweave_shared::{GameMessage, MessageHistory, MessageHistoryQuery};

use crate::infrastructure::message_translator::translate_history;
use crate::ports::outbound::{ApiError, GameApiPort};

/// Page size requested from the history endpoint.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Service for reading the authoritative message log.
#[derive(Clone)]
pub struct HistoryService {
    api: Arc<dyn GameApiPort>,
    session_id: Option<String>,
    page_size: u32,
}

impl HistoryService {
    pub fn new(api: Arc<dyn GameApiPort>) -> Self {
        Self {
            api,
            session_id: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Scope fetches to a single session instead of the whole story log.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Override the page size (for testing pagination).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Fetch a single page at the given offset.
    pub async fn fetch_page(
        &self,
        story_id: i64,
        offset: u32,
    ) -> Result<MessageHistory, ApiError> {
        let query = MessageHistoryQuery {
            session_id: self.session_id.clone(),
            limit: Some(self.page_size),
            offset: Some(offset),
        };
        self.api.fetch_messages(story_id, query).await
    }

    /// Fetch the complete log in server order, following pagination.
    pub async fn fetch_all(&self, story_id: i64) -> Result<Vec<GameMessage>, ApiError> {
        let mut messages = Vec::new();
        let mut offset = 0u32;

        loop {
            let page = self.fetch_page(story_id, offset).await?;
            let fetched = page.messages.len();
            tracing::debug!(story_id, offset, fetched, "history page fetched");

            messages.extend(page.messages);

            // An empty page with has_more set would loop forever; treat it
            // as the end of the log.
            if !page.has_more || fetched == 0 {
                break;
            }
            offset += fetched as u32;
        }

        Ok(messages)
    }

    /// Fetch the complete log and flatten it to transcript entries.
    pub async fn fetch_transcript(&self, story_id: i64) -> Result<Vec<TranscriptEntry>, ApiError> {
        let messages = self.fetch_all(story_id).await?;
        Ok(translate_history(&messages))
    }
}
