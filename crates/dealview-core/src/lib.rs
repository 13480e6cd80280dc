//! # dealview-core
//!
//! Deterministic rendering of deal negotiation analysis results.
//!
//! This crate turns an analysis payload into a display tree, answering:
//! - Which recommendations apply at the chosen risk posture?
//! - What drove the strategy?
//! - What context, knowledge and gaps informed it?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same result and view state always produce the same tree
//! 2. **No IO**: Decoding and rendering never touch the network or filesystem
//! 3. **Degrades locally**: An absent fragment only affects its own view
//! 4. **Verbatim**: Payload text is shown as-is, never reinterpreted
//!
//! ## Example
//!
//! ```rust,ignore
//! use dealview_core::{report_from_json, Tab, TextRenderer, Tier};
//!
//! let mut report = report_from_json(&body)?;
//! report.select_tier(Tier::Aggressive);
//! report.select_tab(Tab::Gaps);
//!
//! print!("{}", TextRenderer::default().render(&report.render()));
//! ```

pub mod display;
pub mod observe;
pub mod panel;
pub mod report;
pub mod schema;
pub mod strategy;
pub mod tier;
pub mod views;

// Re-export main types at crate root
pub use display::{Accent, Node, PlainStyle, Role, SelectorOption, Style, TextRenderer};
pub use observe::{
    NoopObserver, RecordingObserver, RejectReason, TracingObserver, ViewEvent, ViewObserver,
};
pub use panel::TabbedPanel;
pub use report::Report;
pub use schema::{AnalysisResult, DecodeError, Fragment, Recommendation, Strategy};
pub use strategy::StrategySelector;
pub use tier::{Tier, TierPresentation};
pub use views::{
    ContextSummaryView, DebugTraceView, DomainKnowledgeView, InformationGapsView, SubView, Tab,
};

use std::sync::Arc;
use thiserror::Error;

/// Errors raised by view interactions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Unknown tier: {0} (expected conservative, moderate or aggressive)")]
    UnknownTier(String),

    #[error("Unknown tab: {0} (expected context, knowledge, gaps or debug)")]
    UnknownTab(String),

    #[error("This result carries no rationale")]
    RationaleUnavailable,
}

/// Decode a response body into a fresh report.
///
/// This is the main entry point for rendering a stored or received payload.
pub fn report_from_json(body: &str) -> Result<Report, DecodeError> {
    report_from_json_with_observer(body, Arc::new(NoopObserver))
}

/// Decode a response body and report view events to `observer`.
pub fn report_from_json_with_observer(
    body: &str,
    observer: Arc<dyn ViewObserver>,
) -> Result<Report, DecodeError> {
    let result = AnalysisResult::from_json(body)?;
    Ok(Report::with_observer(Arc::new(result), observer))
}
