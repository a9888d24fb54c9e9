//! HTTP implementation of the remote data gateway
//!
//! Talks JSON to the Equilibrium backend API:
//!
//! - `GET  {base}/structure/` - flat list of structure nodes
//! - `GET  {base}/queue/`     - pending registrations
//! - `POST {base}/complete/`  - `{"user_id": n}` completes a registration

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::metrics;
use crate::models::{CompletionReceipt, CompletionRequest, Node, QueueEntry};
use crate::utils::retry::{with_retry_if, RetryConfig};
use crate::utils::{join_url, truncate_text};

use super::error::{GatewayError, GatewayResult};
use super::RemoteGateway;

const STRUCTURE_PATH: &str = "structure/";
const QUEUE_PATH: &str = "queue/";
const COMPLETE_PATH: &str = "complete/";

// ============================================================================
// Client Configuration
// ============================================================================

/// Configuration for the HTTP gateway
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, e.g. `http://localhost:8000/api`
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,

    /// Token sent as `Authorization: Token <token>`
    pub api_token: Option<String>,

    /// Retry policy for idempotent reads
    pub retry: RetryConfig,

    /// User agent string
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client config
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            api_token: None,
            retry: RetryConfig::default(),
            user_agent: format!("equilibrium-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set retry policy for reads
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

// ============================================================================
// HTTP Gateway
// ============================================================================

/// Gateway backed by `reqwest`
pub struct HttpGateway {
    config: ClientConfig,
    http_client: Client,
}

impl HttpGateway {
    /// Create a new gateway
    pub fn new(config: ClientConfig) -> GatewayResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GatewayError::Init(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, format!("Token {token}")),
            None => request,
        }
    }

    // Internal: GET with retry on transient failures
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = join_url(&self.config.base_url, path);
        let _timer = metrics::start_request_timer(path);

        let result = with_retry_if(
            &self.config.retry,
            || async {
                let response = self
                    .authorize(self.http_client.get(&url))
                    .send()
                    .await
                    .map_err(GatewayError::from)?;
                decode_response(response).await
            },
            GatewayError::is_transient,
        )
        .await;

        log_outcome("GET", path, &result);
        result
    }

    // Internal: single POST, never retried
    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        let url = join_url(&self.config.base_url, path);
        let _timer = metrics::start_request_timer(path);

        let result = match self
            .authorize(self.http_client.post(&url))
            .json(body)
            .send()
            .await
        {
            Ok(response) => decode_response(response).await,
            Err(e) => Err(GatewayError::from(e)),
        };

        log_outcome("POST", path, &result);
        result
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn fetch_structure(&self) -> GatewayResult<Vec<Node>> {
        self.get_json(STRUCTURE_PATH).await
    }

    async fn fetch_queue(&self) -> GatewayResult<Vec<QueueEntry>> {
        self.get_json(QUEUE_PATH).await
    }

    async fn submit_completion(&self, user_id: u64) -> GatewayResult<CompletionReceipt> {
        self.post_json(COMPLETE_PATH, &CompletionRequest { user_id })
            .await
    }
}

// ============================================================================
// Response handling
// ============================================================================

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(GatewayError::from)?;

    if status == StatusCode::UNAUTHORIZED {
        return Err(GatewayError::Unauthorized);
    }

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.detail)
            .unwrap_or_else(|_| truncate_text(&body, 200));
        return Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(GatewayError::from)
}

fn log_outcome<T>(method: &str, path: &str, result: &GatewayResult<T>) {
    match result {
        Ok(_) => {
            tracing::debug!(method, endpoint = path, "Gateway request succeeded");
            metrics::record_gateway_request(path, "success");
        }
        Err(e) => {
            tracing::warn!(method, endpoint = path, error = %e, "Gateway request failed");
            let outcome = match e.kind() {
                super::GatewayErrorKind::Decode => "decode_error",
                super::GatewayErrorKind::Transport => "transport_error",
            };
            metrics::record_gateway_request(path, outcome);
        }
    }
}
