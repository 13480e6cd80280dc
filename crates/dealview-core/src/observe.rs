//! Observability hook for view and submission events.
//!
//! Components report what happened through an injected [`ViewObserver`]
//! instead of logging on their own. Applications pick the sink:
//! [`TracingObserver`] forwards to `tracing`, [`RecordingObserver`] keeps
//! events in memory, and [`NoopObserver`] drops them.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::schema::Fragment;
use crate::tier::Tier;
use crate::views::Tab;

/// Why a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Another submission is still in flight
    InFlight,
    /// The deal identifier was empty
    EmptyDealId,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::InFlight => "a submission is already in flight",
            RejectReason::EmptyDealId => "deal id is empty",
        }
    }
}

/// Something observable that happened in the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SubmissionStarted { request_id: u64, deal_id: String },
    SubmissionRejected { reason: RejectReason },
    SubmissionSucceeded { request_id: u64 },
    SubmissionFailed { request_id: u64, message: String },
    StaleResponseDiscarded { request_id: u64 },
    FragmentMissing { fragment: Fragment },
    TierMissing { tier: Tier },
    TabSelected { tab: Tab },
    TierSelected { tier: Tier },
    RationaleToggled { expanded: bool },
    DebugToggled { expanded: bool },
}

/// Receives view events.
pub trait ViewObserver: Send + Sync {
    fn on_event(&self, event: &ViewEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ViewObserver for NoopObserver {
    fn on_event(&self, _event: &ViewEvent) {}
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ViewObserver for TracingObserver {
    fn on_event(&self, event: &ViewEvent) {
        match event {
            ViewEvent::SubmissionStarted {
                request_id,
                deal_id,
            } => tracing::info!(request_id, deal_id = %deal_id, "Submission started"),
            ViewEvent::SubmissionRejected { reason } => {
                tracing::debug!(reason = reason.as_str(), "Submission rejected")
            }
            ViewEvent::SubmissionSucceeded { request_id } => {
                tracing::info!(request_id, "Submission succeeded")
            }
            ViewEvent::SubmissionFailed {
                request_id,
                message,
            } => tracing::warn!(request_id, error = %message, "Submission failed"),
            ViewEvent::StaleResponseDiscarded { request_id } => {
                tracing::debug!(request_id, "Discarded stale response")
            }
            ViewEvent::FragmentMissing { fragment } => {
                tracing::debug!(fragment = %fragment, "Fragment missing from result")
            }
            ViewEvent::TierMissing { tier } => {
                tracing::warn!(tier = %tier, "Strategy tier missing from result")
            }
            ViewEvent::TabSelected { tab } => tracing::trace!(tab = ?tab, "Tab selected"),
            ViewEvent::TierSelected { tier } => tracing::trace!(tier = %tier, "Tier selected"),
            ViewEvent::RationaleToggled { expanded } => {
                tracing::trace!(expanded, "Rationale toggled")
            }
            ViewEvent::DebugToggled { expanded } => {
                tracing::trace!(expanded, "Debug trace toggled")
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ViewObserver for RecordingObserver {
    fn on_event(&self, event: &ViewEvent) {
        self.events.lock().push(event.clone());
    }
}
