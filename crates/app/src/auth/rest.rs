//! Auth provider backed by a hosted GoTrue-style REST API.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{
    auth::{AuthError, AuthProvider, Credentials, Session, User, UserId},
    config::BackendConfig,
};

/// HTTP client for the hosted auth endpoints, holding the current session.
#[derive(Debug)]
pub struct RestAuthProvider {
    base_url: String,
    api_key: Zeroizing<String>,
    http: Client,
    session: RwLock<Option<Session>>,
}

impl RestAuthProvider {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url(),
            api_key: Zeroizing::new(config.backend_api_key.clone()),
            http: Client::new(),
            session: RwLock::new(None),
        }
    }

    /// Bearer token of the current session.
    pub async fn access_token(&self) -> Option<Zeroizing<String>> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    async fn request_session(
        &self,
        path: &str,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password.as_str(),
        });

        let response = self
            .http
            .post(self.endpoint(path))
            .header("apikey", self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(AuthError::UnexpectedResponse(format!(
                "{path} request failed with status {status}: {text}"
            )));
        }

        let parsed: SessionResponse = response.json().await?;
        let session = parsed.into_session();

        *self.session.write().await = Some(session.clone());

        Ok(session)
    }
}

#[async_trait]
impl AuthProvider for RestAuthProvider {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self
            .request_session("token?grant_type=password", credentials)
            .await?;

        info!(user = %session.user.id, "signed in");

        Ok(session)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.request_session("signup", credentials).await?;

        info!(user = %session.user.id, "signed up");

        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.write().await.take() else {
            return Err(AuthError::NotSignedIn);
        };

        let response = self
            .http
            .post(self.endpoint("logout"))
            .header("apikey", self.api_key.as_str())
            .bearer_auth(session.access_token.as_str())
            .send()
            .await?;

        // The local session is gone either way; a failed revoke only expires later.
        if !response.status().is_success() {
            debug!(status = %response.status(), "logout request was not accepted");
        }

        info!(user = %session.user.id, "signed out");

        Ok(())
    }

    async fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.user.clone())
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,

    #[serde(default)]
    expires_in: Option<i64>,

    user: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,

    #[serde(default)]
    email: Option<String>,
}

impl SessionResponse {
    fn into_session(self) -> Session {
        let expires_at = self.expires_in.and_then(|seconds| {
            Timestamp::now()
                .checked_add(SignedDuration::from_secs(seconds))
                .ok()
        });

        Session {
            user: User {
                id: UserId::from_uuid(self.user.id),
                email: self.user.email.unwrap_or_default(),
            },
            access_token: Zeroizing::new(self.access_token),
            expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn provider(url: &str) -> RestAuthProvider {
        RestAuthProvider::new(&BackendConfig {
            backend_url: url.to_string(),
            backend_api_key: "anon".to_string(),
        })
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let provider = provider("https://shop.example.com/");

        assert_eq!(
            provider.endpoint("signup"),
            "https://shop.example.com/auth/v1/signup"
        );
    }

    #[test]
    fn session_response_maps_user_and_expiry() -> TestResult {
        let body = serde_json::json!({
            "access_token": "token",
            "expires_in": 3600,
            "user": { "id": "0190a6f0-0000-7000-8000-000000000001", "email": "a@b.c" },
        });

        let session = serde_json::from_value::<SessionResponse>(body)?.into_session();

        assert_eq!(session.user.email, "a@b.c");
        assert_eq!(session.access_token.as_str(), "token");
        assert!(session.expires_at.is_some_and(|at| at > Timestamp::now()));

        Ok(())
    }

    #[tokio::test]
    async fn signed_out_provider_has_no_user() {
        let provider = provider("http://localhost:9999");

        assert!(provider.current_user().await.is_none());
        assert!(provider.access_token().await.is_none());
        assert!(matches!(
            provider.sign_out().await,
            Err(AuthError::NotSignedIn)
        ));
    }
}
