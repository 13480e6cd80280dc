//! Analysis result parsing from JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use thiserror::Error;

use super::null_as_default;
use super::validate::validate_result_schema;
use crate::tier::Tier;

/// Errors that can occur when decoding an analysis result.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Response body is not valid JSON: {0}")]
    Json(serde_json::Error),

    #[error("Analysis result must be a JSON object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Analysis result failed schema validation: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Analysis result has an unexpected shape: {0}")]
    Shape(serde_json::Error),
}

/// A single recommendation within a risk tier.
///
/// Confidence and risk are display labels ("High", "Low", ...), never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendation: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub rationale: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub impact: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence_level: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_level: String,
}

/// Recommendations grouped by risk tier.
///
/// A tier that is absent or `null` in the payload is a producer error. It is
/// kept as `None` so it can be reported, and reads back as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conservative: Option<Vec<Recommendation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderate: Option<Vec<Recommendation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggressive: Option<Vec<Recommendation>>,
}

impl Strategy {
    fn slot(&self, tier: Tier) -> &Option<Vec<Recommendation>> {
        match tier {
            Tier::Conservative => &self.conservative,
            Tier::Moderate => &self.moderate,
            Tier::Aggressive => &self.aggressive,
        }
    }

    /// Recommendations for a tier, empty when the tier is missing.
    pub fn tier(&self, tier: Tier) -> &[Recommendation] {
        self.slot(tier).as_deref().unwrap_or(&[])
    }

    /// Tiers the producer left out of the payload.
    pub fn missing_tiers(&self) -> Vec<Tier> {
        Tier::ALL
            .into_iter()
            .filter(|tier| self.slot(*tier).is_none())
            .collect()
    }
}

/// Narrative justification for the strategy tiers and the overall decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyRationale {
    #[serde(default)]
    pub conservative_rationale: Option<String>,

    #[serde(default)]
    pub moderate_rationale: Option<String>,

    #[serde(default)]
    pub aggressive_rationale: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub decision_factors: Vec<String>,

    #[serde(default)]
    pub client_history_impact: Option<String>,

    #[serde(default)]
    pub comparable_deals_impact: Option<String>,

    #[serde(default)]
    pub risk_profile_considerations: Option<String>,
}

impl StrategyRationale {
    /// Rationale text for one tier.
    pub fn for_tier(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::Conservative => self.conservative_rationale.as_deref(),
            Tier::Moderate => self.moderate_rationale.as_deref(),
            Tier::Aggressive => self.aggressive_rationale.as_deref(),
        }
    }
}

/// Summary of the deal under negotiation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealSummary {
    #[serde(default)]
    pub coverage_terms: Option<String>,

    #[serde(default)]
    pub risk_profile: Option<String>,

    #[serde(default)]
    pub premium_structure: Option<String>,

    #[serde(default)]
    pub line_of_business: Option<String>,

    #[serde(default)]
    pub territory: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub key_risk_factors: Vec<String>,

    #[serde(default)]
    pub current_offer_details: Option<String>,
}

/// Summary of the client relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    #[serde(default)]
    pub relationship_duration: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub prior_negotiation_history: Vec<String>,

    #[serde(default)]
    pub claim_history: Option<String>,

    #[serde(default)]
    pub payment_history: Option<String>,

    #[serde(default)]
    pub negotiation_style: Option<String>,
}

/// Where the negotiation currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationContext {
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_objections: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub discussion_progress: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub offer_history: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub client_priorities: Vec<String>,
}

/// A previously closed deal used as a benchmark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparableDeal {
    #[serde(default)]
    pub reference_deal_id: Option<String>,

    #[serde(default)]
    pub similarity_reason: Option<String>,

    #[serde(default)]
    pub outcome_summary: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub key_learnings: Vec<String>,
}

/// Comparable deals and market insight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparableDealsSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub similar_deals: Vec<ComparableDeal>,

    #[serde(default)]
    pub market_trends: Option<String>,

    #[serde(default)]
    pub benchmark_insights: Option<String>,
}

/// The four context sub-records plus synthesized insights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSummary {
    #[serde(default)]
    pub deal_summary: Option<DealSummary>,

    #[serde(default)]
    pub client_summary: Option<ClientSummary>,

    #[serde(default)]
    pub negotiation_context: Option<NegotiationContext>,

    #[serde(default)]
    pub comparable_deals: Option<ComparableDealsSummary>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub key_insights: Vec<String>,
}

/// A chunk of a domain knowledge document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    #[serde(default)]
    pub chunk_id: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub source_doc_id: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
}

impl KnowledgeChunk {
    /// Human-readable name of the source document, if the producer supplied one.
    pub fn source_name(&self) -> Option<&str> {
        self.metadata.get("source_name").and_then(Value::as_str)
    }
}

/// A piece of domain knowledge the analysis relied on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default)]
    pub chunk: Option<KnowledgeChunk>,

    #[serde(default)]
    pub relevance_reason: Option<String>,

    #[serde(default)]
    pub application_context: Option<String>,
}

impl KnowledgeEntry {
    /// First line of the chunk text, when there is one.
    pub fn title(&self) -> Option<&str> {
        self.chunk
            .as_ref()
            .and_then(|chunk| chunk.text.as_deref())
            .and_then(|text| text.lines().next())
            .filter(|line| !line.trim().is_empty())
    }
}

/// Information the analysis lacked, with a recommended action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformationGap {
    #[serde(default)]
    pub gap_description: Option<String>,

    #[serde(default)]
    pub recommended_action: Option<String>,

    /// 1 is the highest priority. Kept as the producer wrote it.
    #[serde(default)]
    pub priority: Option<Number>,

    #[serde(default)]
    pub impact_on_strategy: Option<String>,
}

/// Optional top-level sections of an analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    Rationale,
    ContextSummary,
    DomainKnowledge,
    InformationGaps,
    DebugTrace,
}

impl Fragment {
    pub const ALL: [Fragment; 5] = [
        Fragment::Rationale,
        Fragment::ContextSummary,
        Fragment::DomainKnowledge,
        Fragment::InformationGaps,
        Fragment::DebugTrace,
    ];

    /// The payload field this fragment is read from.
    pub fn as_str(self) -> &'static str {
        match self {
            Fragment::Rationale => "rationale",
            Fragment::ContextSummary => "context_summary",
            Fragment::DomainKnowledge => "relevant_domain_knowledge",
            Fragment::InformationGaps => "information_gaps",
            Fragment::DebugTrace => "reasoning_steps/used_domain_chunks/decision_basis",
        }
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete analysis result.
///
/// Immutable once decoded. Everything except `strategy` is optional and
/// degrades independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Echo of the submitted deal identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,

    /// Recommendations per risk tier
    pub strategy: Strategy,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<StrategyRationale>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_summary: Option<ContextSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevant_domain_knowledge: Option<Vec<KnowledgeEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub information_gaps: Option<Vec<InformationGap>>,

    /// Overall confidence label ("High", "Medium", "Low")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_confidence: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub next_steps: Vec<String>,

    // Raw diagnostics, displayed verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_steps: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_domain_chunks: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_basis: Option<Value>,
}

impl AnalysisResult {
    /// Decode a response body.
    ///
    /// Accepts either a bare result or one wrapped as `{ "result": ... }`.
    pub fn from_json(body: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(body).map_err(DecodeError::Json)?;
        Self::from_value(value)
    }

    /// Decode an already parsed JSON document.
    pub fn from_value(value: Value) -> Result<Self, DecodeError> {
        let document = unwrap_result(value);

        let Some(object) = document.as_object() else {
            return Err(DecodeError::NotAnObject);
        };

        if object.get("strategy").map_or(true, Value::is_null) {
            return Err(DecodeError::MissingField("strategy".to_string()));
        }

        validate_result_schema(&document).map_err(DecodeError::Schema)?;

        serde_json::from_value(document).map_err(DecodeError::Shape)
    }

    /// Whether an optional fragment is present.
    pub fn has_fragment(&self, fragment: Fragment) -> bool {
        match fragment {
            Fragment::Rationale => self.rationale.is_some(),
            Fragment::ContextSummary => self.context_summary.is_some(),
            Fragment::DomainKnowledge => self.relevant_domain_knowledge.is_some(),
            Fragment::InformationGaps => self.information_gaps.is_some(),
            Fragment::DebugTrace => {
                self.reasoning_steps.is_some()
                    || self.used_domain_chunks.is_some()
                    || self.decision_basis.is_some()
            }
        }
    }

    /// Fragments absent from this result.
    pub fn missing_fragments(&self) -> Vec<Fragment> {
        Fragment::ALL
            .into_iter()
            .filter(|fragment| !self.has_fragment(*fragment))
            .collect()
    }

    /// Tiers absent from `strategy`.
    pub fn missing_tiers(&self) -> Vec<Tier> {
        self.strategy.missing_tiers()
    }
}

/// Strip the `{ "result": ... }` envelope the analysis service adds.
///
/// Documents without a `result` key are returned unchanged.
pub fn unwrap_result(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("result") => {
            map.remove("result").unwrap_or(Value::Null)
        }
        other => other,
    }
}
