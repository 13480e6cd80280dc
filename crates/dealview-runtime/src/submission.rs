//! Submission lifecycle: `Idle -> Submitting -> Success | Failure`.
//!
//! At most one request is in flight. Every submission gets a fresh request
//! id, and a response is applied only while the controller is still waiting
//! on that id. A response that arrives after `reset()` or after a newer
//! submission started is discarded.
//!
//! Transport, status and decode failures all end in `Failure` with a
//! readable message; nothing escapes `submit` as an error.

use chrono::{DateTime, Utc};
use dealview_core::{
    AnalysisResult, DecodeError, NoopObserver, RejectReason, ViewEvent, ViewObserver,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::transport::{AnalysisTransport, TransportError, TransportResponse};

/// Why a submission ended in `Failure`.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Failed to reach analysis service: {0}")]
    Transport(#[from] TransportError),

    #[error("Analysis service returned HTTP {status}{}", detail_suffix(.detail))]
    HttpStatus { status: u16, detail: Option<String> },

    #[error("Analysis result could not be decoded: {0}")]
    Decode(#[from] DecodeError),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(": {}", detail),
        None => String::new(),
    }
}

/// Lifecycle state of the submission controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Idle,

    Submitting {
        request_id: u64,
        deal_id: String,
    },

    Success {
        request_id: u64,
        deal_id: String,
        result: Arc<AnalysisResult>,
        received_at: DateTime<Utc>,
    },

    Failure {
        request_id: u64,
        deal_id: String,
        message: String,
    },
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting { .. })
    }

    pub fn result(&self) -> Option<&Arc<AnalysisResult>> {
        match self {
            SubmissionState::Success { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Failure { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Deal id of the current or last submission.
    pub fn deal_id(&self) -> Option<&str> {
        match self {
            SubmissionState::Idle => None,
            SubmissionState::Submitting { deal_id, .. }
            | SubmissionState::Success { deal_id, .. }
            | SubmissionState::Failure { deal_id, .. } => Some(deal_id.as_str()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting { .. } => "running",
            SubmissionState::Success { .. } => "success",
            SubmissionState::Failure { .. } => "failure",
        }
    }
}

/// What a call to [`SubmissionController::submit`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The response was applied; carries the resulting state
    Applied(SubmissionState),

    /// Nothing was sent
    Rejected(RejectReason),

    /// The response arrived after the controller moved on
    Discarded,
}

/// Decode a transport response into a result.
///
/// Non-2xx statuses fail with the service's `{"error": ...}` message when
/// the body carries one.
pub fn decode_response(response: &TransportResponse) -> Result<AnalysisResult, SubmitError> {
    if !response.is_success() {
        let detail = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string));
        return Err(SubmitError::HttpStatus {
            status: response.status,
            detail,
        });
    }

    Ok(AnalysisResult::from_json(&response.body)?)
}

struct Lifecycle {
    state: SubmissionState,
    last_request_id: u64,
}

/// Owns the submission lifecycle for one view.
pub struct SubmissionController<T> {
    transport: T,
    observer: Arc<dyn ViewObserver>,
    lifecycle: Mutex<Lifecycle>,
}

impl<T: AnalysisTransport> SubmissionController<T> {
    pub fn new(transport: T) -> Self {
        Self::with_observer(transport, Arc::new(NoopObserver))
    }

    pub fn with_observer(transport: T, observer: Arc<dyn ViewObserver>) -> Self {
        Self {
            transport,
            observer,
            lifecycle: Mutex::new(Lifecycle {
                state: SubmissionState::Idle,
                last_request_id: 0,
            }),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SubmissionState {
        self.lifecycle.lock().state.clone()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.lifecycle.lock().state.is_submitting()
    }

    /// Drop the current result or error and return to `Idle`.
    pub fn reset(&self) {
        self.lifecycle.lock().state = SubmissionState::Idle;
    }

    /// Run an analysis for `deal_id`.
    pub async fn submit(&self, deal_id: &str) -> SubmitOutcome {
        let request_id = match self.begin(deal_id) {
            Ok(request_id) => request_id,
            Err(reason) => {
                self.observer
                    .on_event(&ViewEvent::SubmissionRejected { reason });
                return SubmitOutcome::Rejected(reason);
            }
        };

        self.observer.on_event(&ViewEvent::SubmissionStarted {
            request_id,
            deal_id: deal_id.to_string(),
        });

        let decoded = match self.transport.run(deal_id).await {
            Ok(response) => decode_response(&response),
            Err(error) => Err(SubmitError::from(error)),
        };

        let next = match decoded {
            Ok(result) => SubmissionState::Success {
                request_id,
                deal_id: deal_id.to_string(),
                result: Arc::new(result),
                received_at: Utc::now(),
            },
            Err(error) => SubmissionState::Failure {
                request_id,
                deal_id: deal_id.to_string(),
                message: error.to_string(),
            },
        };

        self.finish(request_id, next)
    }

    fn begin(&self, deal_id: &str) -> Result<u64, RejectReason> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state.is_submitting() {
            return Err(RejectReason::InFlight);
        }
        if deal_id.is_empty() {
            return Err(RejectReason::EmptyDealId);
        }

        lifecycle.last_request_id += 1;
        let request_id = lifecycle.last_request_id;
        lifecycle.state = SubmissionState::Submitting {
            request_id,
            deal_id: deal_id.to_string(),
        };
        Ok(request_id)
    }

    fn finish(&self, request_id: u64, next: SubmissionState) -> SubmitOutcome {
        let applied = {
            let mut lifecycle = self.lifecycle.lock();
            let awaiting = match &lifecycle.state {
                SubmissionState::Submitting {
                    request_id: current,
                    ..
                } => *current == request_id,
                _ => false,
            };
            if awaiting {
                lifecycle.state = next.clone();
            }
            awaiting
        };

        if !applied {
            self.observer
                .on_event(&ViewEvent::StaleResponseDiscarded { request_id });
            return SubmitOutcome::Discarded;
        }

        match &next {
            SubmissionState::Failure { message, .. } => {
                self.observer.on_event(&ViewEvent::SubmissionFailed {
                    request_id,
                    message: message.clone(),
                })
            }
            _ => self
                .observer
                .on_event(&ViewEvent::SubmissionSucceeded { request_id }),
        }

        SubmitOutcome::Applied(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dealview_core::RecordingObserver;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    type Reply = Result<TransportResponse, TransportError>;

    const OK_BODY: &str = r#"{"result": {"deal_id": "DEAL123", "strategy": {"conservative": [], "moderate": [], "aggressive": []}}}"#;

    /// Answers from a fixed script.
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Reply>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisTransport for ScriptedTransport {
        async fn run(&self, _deal_id: &str) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Request("script exhausted".to_string())))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Holds each request open until the test releases it.
    struct GatedTransport {
        gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        calls: AtomicUsize,
    }

    impl GatedTransport {
        fn new(count: usize) -> (Self, Vec<oneshot::Sender<Reply>>) {
            let (senders, receivers): (Vec<_>, VecDeque<_>) =
                (0..count).map(|_| oneshot::channel()).unzip();
            let transport = Self {
                gates: Mutex::new(receivers),
                calls: AtomicUsize::new(0),
            };
            (transport, senders)
        }
    }

    #[async_trait]
    impl AnalysisTransport for GatedTransport {
        async fn run(&self, _deal_id: &str) -> Reply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().pop_front();
            match gate {
                Some(gate) => gate
                    .await
                    .unwrap_or_else(|_| Err(TransportError::Request("gate dropped".to_string()))),
                None => Err(TransportError::Request("no gate left".to_string())),
            }
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    async fn wait_until_submitting<T: AnalysisTransport>(controller: &SubmissionController<T>) {
        while controller.can_submit() {
            tokio::task::yield_now().await;
        }
    }

    fn ok_reply() -> Reply {
        Ok(TransportResponse::new(200, OK_BODY))
    }

    #[tokio::test]
    async fn test_success_applies_result() {
        let observer = RecordingObserver::new();
        let controller = SubmissionController::with_observer(
            ScriptedTransport::new(vec![ok_reply()]),
            observer.clone(),
        );

        assert_eq!(controller.state(), SubmissionState::Idle);
        let outcome = controller.submit("DEAL123").await;

        let SubmitOutcome::Applied(state) = outcome else {
            panic!("expected applied outcome, got {:?}", outcome);
        };
        assert_eq!(state.label(), "success");
        assert_eq!(
            state.result().unwrap().deal_id.as_deref(),
            Some("DEAL123")
        );
        assert_eq!(controller.state(), state);
        assert!(controller.can_submit());

        assert_eq!(
            observer.events(),
            vec![
                ViewEvent::SubmissionStarted {
                    request_id: 1,
                    deal_id: "DEAL123".to_string()
                },
                ViewEvent::SubmissionSucceeded { request_id: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_deal_id_is_rejected() {
        let transport = ScriptedTransport::new(vec![]);
        let controller = SubmissionController::new(transport);

        assert_eq!(
            controller.submit("").await,
            SubmitOutcome::Rejected(RejectReason::EmptyDealId)
        );
        assert_eq!(controller.transport().calls(), 0);
        assert_eq!(controller.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_transport_failure_message() {
        let controller = SubmissionController::new(ScriptedTransport::new(vec![Err(
            TransportError::Connect("connection refused".to_string()),
        )]));

        let state = controller.submit("DEAL123").await;
        let SubmitOutcome::Applied(state) = state else {
            panic!("expected applied outcome");
        };
        assert_eq!(
            state.error_message(),
            Some("Failed to reach analysis service: connection failed: connection refused")
        );
    }

    #[tokio::test]
    async fn test_http_status_failure_includes_service_error() {
        let controller = SubmissionController::new(ScriptedTransport::new(vec![
            Ok(TransportResponse::new(500, r#"{"error": "Deal not found"}"#)),
            Ok(TransportResponse::new(502, "<html>Bad Gateway</html>")),
        ]));

        controller.submit("DEAL404").await;
        assert_eq!(
            controller.state().error_message(),
            Some("Analysis service returned HTTP 500: Deal not found")
        );

        controller.submit("DEAL404").await;
        assert_eq!(
            controller.state().error_message(),
            Some("Analysis service returned HTTP 502")
        );
    }

    #[tokio::test]
    async fn test_decode_failures() {
        let controller = SubmissionController::new(ScriptedTransport::new(vec![
            Ok(TransportResponse::new(200, "<html>not json</html>")),
            Ok(TransportResponse::new(200, r#"{"result": {"rationale": {}}}"#)),
        ]));

        controller.submit("DEAL123").await;
        let message = controller.state().error_message().unwrap().to_string();
        assert!(message.starts_with("Analysis result could not be decoded: Response body is not valid JSON"));

        controller.submit("DEAL123").await;
        assert_eq!(
            controller.state().error_message(),
            Some("Analysis result could not be decoded: Missing required field: strategy")
        );
    }

    #[tokio::test]
    async fn test_failure_then_success_replaces_error() {
        let controller = SubmissionController::new(ScriptedTransport::new(vec![
            Err(TransportError::Timeout(std::time::Duration::from_secs(1))),
            ok_reply(),
        ]));

        controller.submit("DEAL123").await;
        assert_eq!(controller.state().label(), "failure");

        let outcome = controller.submit("DEAL123").await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Applied(SubmissionState::Success { request_id: 2, .. })
        ));
        assert!(controller.state().error_message().is_none());
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_noop() {
        let (transport, mut gates) = GatedTransport::new(1);
        let controller = Arc::new(SubmissionController::new(transport));

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("DEAL1").await }
        });
        wait_until_submitting(&controller).await;

        assert_eq!(
            controller.submit("DEAL2").await,
            SubmitOutcome::Rejected(RejectReason::InFlight)
        );
        assert_eq!(controller.transport().calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state().deal_id(), Some("DEAL1"));

        gates.remove(0).send(ok_reply()).unwrap();
        let outcome = first.await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Applied(SubmissionState::Success { .. })
        ));
    }

    #[tokio::test]
    async fn test_response_after_reset_is_discarded() {
        let observer = RecordingObserver::new();
        let (transport, mut gates) = GatedTransport::new(2);
        let controller = Arc::new(SubmissionController::with_observer(
            transport,
            observer.clone(),
        ));

        let stale = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("DEAL1").await }
        });
        wait_until_submitting(&controller).await;

        controller.reset();
        assert_eq!(controller.state(), SubmissionState::Idle);

        let fresh = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("DEAL2").await }
        });
        wait_until_submitting(&controller).await;

        let second_gate = gates.remove(1);
        gates.remove(0).send(ok_reply()).unwrap();
        assert_eq!(stale.await.unwrap(), SubmitOutcome::Discarded);
        assert_eq!(controller.state().deal_id(), Some("DEAL2"));
        assert!(controller.state().is_submitting());

        second_gate.send(ok_reply()).unwrap();
        let outcome = fresh.await.unwrap();
        assert!(matches!(
            outcome,
            SubmitOutcome::Applied(SubmissionState::Success { request_id: 2, .. })
        ));
        assert!(observer
            .events()
            .contains(&ViewEvent::StaleResponseDiscarded { request_id: 1 }));
    }

    #[tokio::test]
    async fn test_reset_clears_result() {
        let controller = SubmissionController::new(ScriptedTransport::new(vec![ok_reply()]));
        controller.submit("DEAL123").await;
        assert!(controller.state().result().is_some());

        controller.reset();
        assert_eq!(controller.state(), SubmissionState::Idle);
        assert!(controller.can_submit());
    }
}
