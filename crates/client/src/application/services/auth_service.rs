//! Authentication session
//!
//! Token issuance lives server-side; this service only obtains, holds, and
//! clears the credential plus the signed-in user. The token cell is shared
//! with the HTTP adapter, so clearing it here de-authenticates every
//! subsequent request.

use std::sync::Arc;

use tokio::sync::Mutex;

use taleweave_shared::{LoginRequest, RegisterRequest, UserInfo};

use crate::application::error::ServiceError;
use crate::ports::outbound::{BearerToken, GameApiPort};

/// Holds the bearer credential and the authenticated user.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn GameApiPort>,
    token: BearerToken,
    user: Arc<Mutex<Option<UserInfo>>>,
}

impl AuthService {
    pub fn new(api: Arc<dyn GameApiPort>, token: BearerToken) -> Self {
        Self {
            api,
            token,
            user: Arc::new(Mutex::new(None)),
        }
    }

    /// Sign in and install the issued token.
    pub async fn login(&self, request: LoginRequest) -> Result<UserInfo, ServiceError> {
        let response = self.api.login(request).await?;
        self.token.set(response.access_token).await;
        *self.user.lock().await = Some(response.user.clone());
        tracing::info!(username = %response.user.username, "signed in");
        Ok(response.user)
    }

    /// Register a new account, then sign in with the same credentials.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserInfo, ServiceError> {
        let credentials = LoginRequest {
            username: request.username.clone(),
            password: request.password.clone(),
        };
        self.api.register(request).await?;
        self.login(credentials).await
    }

    /// Voluntary sign-out.
    pub async fn logout(&self) {
        self.clear_session().await;
        tracing::info!("signed out");
    }

    /// Drop the credential and the user without ceremony.
    ///
    /// Called on logout and whenever the backend reports the credential
    /// expired (401).
    pub async fn clear_session(&self) {
        self.token.clear().await;
        *self.user.lock().await = None;
    }

    pub async fn current_user(&self) -> Option<UserInfo> {
        self.user.lock().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.is_set().await
    }
}
