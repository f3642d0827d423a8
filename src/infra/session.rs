//! Identity-provider adapter for session resolution.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::application::repos::{SessionError, SessionResolver};
use crate::domain::session::{Identity, Session};

/// Resolves sessions against the identity provider's session endpoint.
///
/// One GET per request carrying the visitor's session token; the provider
/// answers with the session snapshot or an empty payload. Resolution is
/// read-only and idempotent, so re-resolving within a request is safe.
pub struct ProviderSessionResolver {
    client: reqwest::Client,
    provider_url: Url,
}

impl ProviderSessionResolver {
    pub fn new(client: reqwest::Client, provider_url: Url) -> Self {
        Self {
            client,
            provider_url,
        }
    }

    fn session_endpoint(&self) -> Url {
        let mut url = self.provider_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("session");
        }
        url
    }
}

#[async_trait]
impl SessionResolver for ProviderSessionResolver {
    async fn resolve(&self, token: Option<&str>) -> Result<Session, SessionError> {
        let Some(token) = token else {
            return Ok(Session::Anonymous);
        };

        let response = self
            .client
            .get(self.session_endpoint())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|err| SessionError::unavailable(err.to_string()))?;

        // An expired or revoked token is a plain anonymous visit, not a
        // provider failure.
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(Session::Anonymous);
        }

        let response = response
            .error_for_status()
            .map_err(|err| SessionError::unavailable(err.to_string()))?;

        let wire: WireSession = response
            .json()
            .await
            .map_err(|err| SessionError::unavailable(err.to_string()))?;

        Ok(wire.into_session())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSession {
    #[serde(default)]
    user: Option<WireUser>,
    #[serde(default)]
    active_subscription: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

impl WireSession {
    fn into_session(self) -> Session {
        match self.user {
            Some(user) => Session::Authenticated(Identity {
                name: user.name,
                email: user.email,
                subscription: self
                    .active_subscription
                    .filter(|marker| !marker.is_empty()),
            }),
            None => Session::Anonymous,
        }
    }
}
