//! Payment-collaborator adapter: creates hosted checkouts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::application::repos::{CheckoutError, CheckoutGateway, CheckoutSession};
use crate::domain::session::Identity;

pub struct CheckoutClient {
    client: reqwest::Client,
    checkout_url: Url,
}

impl CheckoutClient {
    pub fn new(client: reqwest::Client, checkout_url: Url) -> Self {
        Self {
            client,
            checkout_url,
        }
    }
}

#[async_trait]
impl CheckoutGateway for CheckoutClient {
    async fn create_checkout(&self, identity: &Identity) -> Result<CheckoutSession, CheckoutError> {
        let payload = WireCheckoutRequest {
            email: &identity.email,
            name: &identity.name,
        };

        let response = self
            .client
            .post(self.checkout_url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|err| CheckoutError::unavailable(err.to_string()))?
            .error_for_status()
            .map_err(|err| CheckoutError::unavailable(err.to_string()))?;

        let wire: WireCheckoutResponse = response
            .json()
            .await
            .map_err(|err| CheckoutError::unavailable(err.to_string()))?;

        Ok(CheckoutSession { url: wire.url })
    }
}

#[derive(Debug, Serialize)]
struct WireCheckoutRequest<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireCheckoutResponse {
    url: String,
}
