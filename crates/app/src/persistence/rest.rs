//! Persistence backed by a hosted PostgREST-style API.
//!
//! Each user's state is one JSON document in the `storefront_state` table,
//! keyed by `user_id` and written with an upsert.

use async_trait::async_trait;
use jiff::Timestamp;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shopfront::snapshot::UserSnapshot;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{
    auth::Session,
    config::BackendConfig,
    persistence::{PersistenceService, SyncError},
};

const TABLE: &str = "storefront_state";

/// HTTP client for the hosted storefront state table.
#[derive(Debug, Clone)]
pub struct RestPersistence {
    base_url: String,
    api_key: Zeroizing<String>,
    http: Client,
}

impl RestPersistence {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url(),
            api_key: Zeroizing::new(config.backend_api_key.clone()),
            http: Client::new(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{TABLE}", self.base_url)
    }
}

/// Requests are authorized as the session's user, falling back to the API key
/// when the session carries no token.
fn bearer<'a>(api_key: &'a str, session: &'a Session) -> &'a str {
    if session.access_token.is_empty() {
        api_key
    } else {
        session.access_token.as_str()
    }
}

#[async_trait]
impl PersistenceService for RestPersistence {
    async fn load_all(&self, session: &Session) -> Result<UserSnapshot, SyncError> {
        let user = session.user.id;

        let response = self
            .http
            .get(self.table_url())
            .query(&[
                ("user_id", format!("eq.{user}")),
                ("select", "state".to_string()),
            ])
            .header("apikey", self.api_key.as_str())
            .bearer_auth(bearer(&self.api_key, session))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(SyncError::UnexpectedResponse(format!(
                "load request failed with status {status}: {text}"
            )));
        }

        let rows: Vec<StateRow> = response.json().await?;

        debug!(%user, rows = rows.len(), "loaded storefront state");

        Ok(rows
            .into_iter()
            .next()
            .map(|row| row.state)
            .unwrap_or_default())
    }

    async fn replace_all(&self, session: &Session, snapshot: &UserSnapshot) -> Result<(), SyncError> {
        let user = session.user.id;

        let row = StateRowRef {
            user_id: user.into_uuid(),
            state: snapshot,
            updated_at: Timestamp::now(),
        };

        let response = self
            .http
            .post(self.table_url())
            .header("apikey", self.api_key.as_str())
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .bearer_auth(bearer(&self.api_key, session))
            .json(&[row])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(SyncError::UnexpectedResponse(format!(
                "replace request failed with status {status}: {text}"
            )));
        }

        debug!(%user, "replaced storefront state");

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct StateRow {
    state: UserSnapshot,
}

#[derive(Debug, Serialize)]
struct StateRowRef<'a> {
    user_id: Uuid,
    state: &'a UserSnapshot,
    updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::auth::{User, UserId};

    fn persistence() -> RestPersistence {
        RestPersistence::new(&BackendConfig {
            backend_url: "https://shop.example.com".to_string(),
            backend_api_key: "anon".to_string(),
        })
    }

    #[test]
    fn table_url_points_at_state_table() {
        assert_eq!(
            persistence().table_url(),
            "https://shop.example.com/rest/v1/storefront_state"
        );
    }

    #[test]
    fn access_token_replaces_api_key_as_bearer() {
        let mut session = Session {
            user: User {
                id: UserId::from_uuid(Uuid::now_v7()),
                email: "shopper@example.com".to_string(),
            },
            access_token: Zeroizing::new("jwt".to_string()),
            expires_at: None,
        };

        assert_eq!(bearer("anon", &session), "jwt");

        session.access_token = Zeroizing::new(String::new());

        assert_eq!(bearer("anon", &session), "anon");
    }

    #[test]
    fn state_row_reads_embedded_snapshot() -> TestResult {
        let rows: Vec<StateRow> = serde_json::from_str(r#"[{"state": {"cart_items": []}}]"#)?;

        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|row| row.state.is_empty()));

        Ok(())
    }
}
