//! HTTP dispatcher adapter

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::application::ports::Dispatcher;
use crate::domain::dispatch::{DispatchError, DispatchRequest, Endpoint};
use crate::domain::timeout::Timeout;

/// Posts each utterance as JSON to the configured endpoint
pub struct HttpDispatcher {
    endpoint: Endpoint,
    url: String,
    client: reqwest::Client,
}

impl HttpDispatcher {
    /// Create a dispatcher with the default timeout
    pub fn new(endpoint: Endpoint) -> Result<Self, DispatchError> {
        Self::with_timeout(endpoint, Timeout::default())
    }

    /// Create a dispatcher whose requests give up after `timeout`
    pub fn with_timeout(endpoint: Endpoint, timeout: Timeout) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout.as_std())
            .build()
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        Ok(Self {
            url: endpoint.url(),
            endpoint,
            client,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn classify(error: reqwest::Error) -> DispatchError {
        if error.is_timeout() {
            DispatchError::Timeout
        } else if error.is_connect() {
            DispatchError::Connect(error.to_string())
        } else {
            DispatchError::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn send(&self, request: &DispatchRequest) -> Result<(), DispatchError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let error = Self::classify(e);
                warn!(endpoint = %self.endpoint, error = %error, "Dispatch request failed");
                error
            })?;

        // The body is never read, only the status matters.
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "Endpoint rejected dispatch");
            return Err(DispatchError::Status(status.as_u16()));
        }

        debug!(endpoint = %self.endpoint, status = status.as_u16(), "Dispatch accepted");
        Ok(())
    }
}
