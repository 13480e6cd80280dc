//! Transport to the external analysis service.
//!
//! The submission controller only sees [`AnalysisTransport`]: one POST per
//! deal id, answered by a status code and a raw body. Decoding the body is
//! the controller's job.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::HttpTransport;

/// Network-level failures. An HTTP error status is not a transport error.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Request(String),
}

/// Raw answer from the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Runs an analysis for one deal.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// `POST /run` with the form field `deal_id`.
    async fn run(&self, deal_id: &str) -> Result<TransportResponse, TransportError>;

    /// Transport name for diagnostics.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: AnalysisTransport + ?Sized> AnalysisTransport for Arc<T> {
    async fn run(&self, deal_id: &str) -> Result<TransportResponse, TransportError> {
        (**self).run(deal_id).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
