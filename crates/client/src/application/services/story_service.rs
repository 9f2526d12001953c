//! Story management passthrough
//!
//! Story CRUD is an external collaborator concern; this service only lends
//! it the typed port and the application error taxonomy. No state is kept
//! here - selecting a story is the game service's job.

use std::sync::Arc;

use taleweave_shared::{CreateCompleteStoryRequest, CreateStoryRequest, Story, UpdateStoryRequest};

use crate::application::error::ServiceError;
use crate::ports::outbound::GameApiPort;

/// Thin wrapper over the story endpoints.
#[derive(Clone)]
pub struct StoryService {
    api: Arc<dyn GameApiPort>,
}

impl StoryService {
    pub fn new(api: Arc<dyn GameApiPort>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Story>, ServiceError> {
        Ok(self.api.list_stories().await?)
    }

    pub async fn create(&self, request: CreateStoryRequest) -> Result<Story, ServiceError> {
        let story = self.api.create_story(request).await?;
        tracing::info!(story_id = story.id, name = %story.name, "story created");
        Ok(story)
    }

    /// Create a story together with its NPCs and locations in one call.
    pub async fn create_complete(
        &self,
        request: CreateCompleteStoryRequest,
    ) -> Result<Story, ServiceError> {
        let story = self.api.create_complete_story(request).await?;
        tracing::info!(story_id = story.id, name = %story.name, "complete story created");
        Ok(story)
    }

    pub async fn update(
        &self,
        story_id: i64,
        request: UpdateStoryRequest,
    ) -> Result<Story, ServiceError> {
        Ok(self.api.update_story(story_id, request).await?)
    }

    pub async fn delete(&self, story_id: i64) -> Result<(), ServiceError> {
        self.api.delete_story(story_id).await?;
        tracing::info!(story_id, "story deleted");
        Ok(())
    }
}
