//! The analysis result contract.
//!
//! Analysis payloads are JSON documents produced by the negotiation analysis
//! service. This module defines their typed shape and the parse/validate step
//! that turns a response body into an [`AnalysisResult`] or a [`DecodeError`].

mod parser;
mod validate;

pub use parser::{
    unwrap_result, AnalysisResult, ClientSummary, ComparableDeal, ComparableDealsSummary,
    ContextSummary, DealSummary, DecodeError, Fragment, InformationGap, KnowledgeChunk,
    KnowledgeEntry, NegotiationContext, Recommendation, Strategy, StrategyRationale,
};
pub use validate::validate_result_schema;

use serde::{Deserialize, Deserializer};

/// Deserialize a value that may be `null`, falling back to its default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
