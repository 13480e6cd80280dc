//! HTTP transport built on reqwest.

use async_trait::async_trait;
use std::time::Duration;

use super::{AnalysisTransport, TransportError, TransportResponse};
use crate::config::RuntimeConfig;

/// Posts deal ids to `{base_url}/run` as a form.
///
/// No retries: every request starts a new analysis run on the service.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    run_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &RuntimeConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            run_url: config.run_url(),
            timeout: config.request_timeout,
        })
    }

    pub fn run_url(&self) -> &str {
        &self.run_url
    }

    fn classify(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Request(error.to_string())
        }
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn run(&self, deal_id: &str) -> Result<TransportResponse, TransportError> {
        tracing::debug!(url = %self.run_url, deal_id, "Posting analysis request");

        let response = self
            .client
            .post(&self.run_url)
            .form(&[("deal_id", deal_id)])
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        tracing::debug!(status, bytes = body.len(), "Analysis service responded");

        Ok(TransportResponse { status, body })
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_url_from_config() {
        let config = RuntimeConfig::default().with_base_url("http://analysis:5000/");
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.run_url(), "http://analysis:5000/run");
        assert_eq!(transport.name(), "http");
    }
}
