//! # dealview-runtime
//!
//! Submission lifecycle and transport for dealview.
//!
//! This crate owns the only suspending operation of the viewer: sending a
//! deal id to the analysis service and applying its answer. Rendering stays
//! in `dealview-core` and never waits on the network.
//!
//! ## Important
//!
//! - At most one submission is in flight per controller
//! - A response is applied only if it belongs to the current submission
//! - Every failure ends as a `Failure` state with a readable message
//!
//! ## Example
//!
//! ```rust,ignore
//! use dealview_runtime::{HttpTransport, RuntimeConfig, SubmissionController, SubmitOutcome};
//!
//! let config = RuntimeConfig::from_yaml_file("dealview.yaml")?;
//! let controller = SubmissionController::new(HttpTransport::new(&config)?);
//!
//! if let SubmitOutcome::Applied(state) = controller.submit("DEAL123").await {
//!     println!("{}", state.label());
//! }
//! ```

pub mod config;
pub mod submission;
pub mod transport;

// Re-export main types at crate root
pub use config::{ConfigError, RuntimeConfig, BASE_URL_ENV};
pub use submission::{
    decode_response, SubmissionController, SubmissionState, SubmitError, SubmitOutcome,
};
pub use transport::{AnalysisTransport, TransportError, TransportResponse};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
