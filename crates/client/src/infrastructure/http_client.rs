//! HTTP adapter for the game backend REST surface

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use taleweave_domain::GameState;
use taleweave_shared::{
    CreateCompleteStoryRequest, CreateStoryRequest, LoginRequest, LoginResponse, MessageHistory,
    MessageHistoryQuery, ProcessActionRequest, RegisterRequest, RegisterResponse, Story,
    UpdateStoryRequest,
};

use crate::ports::outbound::{ApiError, BearerToken, GameApiPort};

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001/api";

/// Client for the game backend.
#[derive(Clone)]
pub struct ApiAdapter {
    client: Client,
    base_url: String,
    token: BearerToken,
}

impl ApiAdapter {
    pub fn new(base_url: &str, token: BearerToken) -> Self {
        // Actions run through the server-side LLM and can be slow, so the
        // request timeout is generous.
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Create an adapter with a custom timeout (for testing).
    pub fn with_timeout(base_url: &str, token: BearerToken, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Create an adapter from the `TALEWEAVE_API_URL` environment variable,
    /// falling back to the default base URL.
    pub fn from_env(token: BearerToken) -> Self {
        let base_url =
            std::env::var("TALEWEAVE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url, token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.get().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.authorize(self.client.get(self.url(path))).await;
        decode(self.send(request).await?).await
    }

    async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(self.client.post(self.url(path)).json(body))
            .await;
        decode(self.send(request).await?).await
    }

    async fn put_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorize(self.client.put(self.url(path)).json(body))
            .await;
        decode(self.send(request).await?).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.authorize(self.client.delete(self.url(path))).await;
        self.send(request).await?;
        Ok(())
    }
}

/// Map a non-success status onto the error taxonomy.
///
/// Error bodies are probed for the backend's `{"detail": ...}` shape so the
/// surfaced string is the server's own wording when available.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = error_detail(response).await;
    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::AuthExpired,
        StatusCode::FORBIDDEN => ApiError::Forbidden(detail),
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        s if s.is_server_error() => ApiError::Server(detail),
        s => ApiError::Unexpected(s.as_u16(), detail),
    })
}

async fn error_detail(response: Response) -> String {
    let fallback = response.status().to_string();
    let Ok(text) = response.text().await else {
        return fallback;
    };

    serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .or_else(|| v.get("message"))
                .and_then(|d| d.as_str())
                .map(str::to_string)
        })
        .unwrap_or(if text.is_empty() { fallback } else { text })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json()
        .await
        .map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl GameApiPort for ApiAdapter {
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post_json("/auth/login", &request).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.post_json("/auth/register", &request).await
    }

    async fn fetch_game_state(&self, story_id: i64) -> Result<GameState, ApiError> {
        self.get_json(&format!("/game_state?story_id={story_id}"))
            .await
    }

    async fn process_action(&self, request: ProcessActionRequest) -> Result<GameState, ApiError> {
        self.post_json("/process_action", &request).await
    }

    async fn fetch_messages(
        &self,
        story_id: i64,
        query: MessageHistoryQuery,
    ) -> Result<MessageHistory, ApiError> {
        let path = format!("/stories/{story_id}/messages{}", query.to_query_string());
        self.get_json(&path).await
    }

    async fn list_stories(&self) -> Result<Vec<Story>, ApiError> {
        self.get_json("/stories/").await
    }

    async fn create_story(&self, request: CreateStoryRequest) -> Result<Story, ApiError> {
        self.post_json("/stories/", &request).await
    }

    async fn create_complete_story(
        &self,
        request: CreateCompleteStoryRequest,
    ) -> Result<Story, ApiError> {
        self.post_json("/stories/create-complete", &request).await
    }

    async fn update_story(
        &self,
        story_id: i64,
        request: UpdateStoryRequest,
    ) -> Result<Story, ApiError> {
        self.put_json(&format!("/stories/{story_id}"), &request).await
    }

    async fn delete_story(&self, story_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/stories/{story_id}")).await
    }

    async fn fetch_debug(&self, path: String) -> Result<Value, ApiError> {
        self.get_json(&format!("/debug/{path}")).await
    }
}
