//! PayPal REST vault client.
//!
//! Talks to `/v1/vault/credit-cards` with an OAuth2 client-credentials token
//! that is cached until shortly before it expires.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use creditcards_types::Credential;

use super::vault::{
    CreditCardVault, VaultConnector, VaultCreditCard, VaultError, VaultListOptions, VaultMode,
    VaultPage,
};

const CREDIT_CARDS_PATH: &str = "/v1/vault/credit-cards";
const TOKEN_PATH: &str = "/v1/oauth2/token";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Tokens are refreshed this long before PayPal says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// HTTP client for the PayPal credit card vault.
pub struct PayPalRestClient {
    http: Client,
    base_url: String,
    credential: Credential,
    token: Mutex<Option<AccessToken>>,
}

impl PayPalRestClient {
    /// Creates a client against `base_url` (no trailing slash needed).
    pub fn new(http: Client, base_url: impl Into<String>, credential: Credential) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential,
            token: Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn access_token(&self) -> Result<String, VaultError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let resp = self
            .http
            .post(self.url(TOKEN_PATH))
            .basic_auth(&self.credential.access_id, Some(&self.credential.access_key))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(VaultError::Auth(format!("HTTP {} - {}", status, body)));
        }

        let token: TokenResponse = resp.json().await?;
        let ttl = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        debug!("Obtained PayPal access token valid for {}s", ttl.as_secs());

        *cached = Some(AccessToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + ttl,
        });
        Ok(token.access_token)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, VaultError> {
        let token = self.access_token().await?;
        let resp = req.bearer_auth(token).send().await?;
        check_status(resp).await
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, VaultError> {
        let resp = self.send(req).await?;
        Ok(resp.json().await?)
    }
}

async fn check_status(resp: Response) -> Result<Response, VaultError> {
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        return Err(VaultError::NotFound);
    }
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or(body);
    Err(VaultError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl CreditCardVault for PayPalRestClient {
    #[instrument(skip(self), fields(page = options.page))]
    async fn list(&self, options: VaultListOptions) -> Result<VaultPage, VaultError> {
        let mut query = vec![
            ("page", options.page.to_string()),
            ("page_size", options.page_size.to_string()),
        ];
        if let Some(customer_id) = options.external_customer_id {
            query.push(("external_customer_id", customer_id));
        }

        let req = self.http.get(self.url(CREDIT_CARDS_PATH)).query(&query);
        self.send_json(req).await
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<VaultCreditCard, VaultError> {
        let req = self
            .http
            .get(self.url(&format!("{}/{}", CREDIT_CARDS_PATH, id)));
        self.send_json(req).await
    }

    #[instrument(skip(self, card))]
    async fn create(&self, card: VaultCreditCard) -> Result<VaultCreditCard, VaultError> {
        let req = self.http.post(self.url(CREDIT_CARDS_PATH)).json(&card);
        self.send_json(req).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), VaultError> {
        let req = self
            .http
            .delete(self.url(&format!("{}/{}", CREDIT_CARDS_PATH, id)));
        self.send(req).await?;
        Ok(())
    }
}

/// Connector producing [`PayPalRestClient`]s.
#[derive(Debug, Clone)]
pub struct PayPalRestConnector {
    base_url: Option<String>,
    timeout: Duration,
}

impl Default for PayPalRestConnector {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PayPalRestConnector {
    /// Overrides the environment's API root (used for local mocks).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl VaultConnector for PayPalRestConnector {
    fn connect(
        &self,
        mode: VaultMode,
        credential: &Credential,
    ) -> Result<Arc<dyn CreditCardVault>, VaultError> {
        let http = Client::builder().timeout(self.timeout).build()?;
        let base_url = self
            .base_url
            .clone()
            .unwrap_or_else(|| mode.base_url().to_string());

        Ok(Arc::new(PayPalRestClient::new(
            http,
            base_url,
            credential.clone(),
        )))
    }
}
