//! JSON Schema validation for analysis results.
//!
//! Results are checked against `schema/analysis_result.schema.json` before
//! they are deserialized, so a malformed payload becomes a decode error
//! instead of a partially typed object.

use std::sync::OnceLock;

const RESULT_SCHEMA_JSON: &str = include_str!("../../schema/analysis_result.schema.json");

static RESULT_VALIDATOR: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn compile() -> Result<jsonschema::Validator, String> {
    let schema: serde_json::Value = serde_json::from_str(RESULT_SCHEMA_JSON)
        .map_err(|e| format!("Result schema is not valid JSON: {}", e))?;
    jsonschema::options()
        .build(&schema)
        .map_err(|e| format!("Result schema does not compile: {}", e))
}

/// The compiled validator, built on first use.
fn get_validator() -> Result<&'static jsonschema::Validator, String> {
    RESULT_VALIDATOR
        .get_or_init(compile)
        .as_ref()
        .map_err(Clone::clone)
}

/// Validate an (unwrapped) analysis result against the schema.
///
/// Returns every violation as "<message> at <instance path>".
pub fn validate_result_schema(result_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(result_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_compiles() {
        assert!(get_validator().is_ok());
    }

    #[test]
    fn test_minimal_result_passes_schema() {
        let value = serde_json::json!({
            "strategy": { "conservative": [], "moderate": [], "aggressive": [] }
        });
        assert!(validate_result_schema(&value).is_ok());
    }

    #[test]
    fn test_missing_strategy_fails() {
        let value = serde_json::json!({ "rationale": {} });
        assert!(validate_result_schema(&value).is_err());
    }

    #[test]
    fn test_recommendation_fields_must_be_strings() {
        let value = serde_json::json!({
            "strategy": {
                "moderate": [{ "recommendation": "Hold", "confidence_level": 0.9 }]
            }
        });
        let errors = validate_result_schema(&value).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("/strategy/moderate/0/confidence_level"));
    }

    #[test]
    fn test_gap_priority_must_be_integer() {
        let value = serde_json::json!({
            "strategy": {},
            "information_gaps": [{ "gap_description": "No loss runs", "priority": "high" }]
        });
        assert!(validate_result_schema(&value).is_err());
    }

    #[test]
    fn test_unknown_fields_are_allowed() {
        let value = serde_json::json!({
            "strategy": {},
            "success": true,
            "information_needs": ["loss runs"]
        });
        assert!(validate_result_schema(&value).is_ok());
    }

    #[test]
    fn test_full_result_passes_schema() {
        let value = serde_json::json!({
            "deal_id": "DEAL123",
            "overall_confidence": "Medium",
            "next_steps": ["Request loss runs"],
            "strategy": {
                "conservative": [{
                    "recommendation": "Hold current premium",
                    "rationale": "Long relationship",
                    "impact": "Protects margin",
                    "confidence_level": "High",
                    "risk_level": "Low"
                }],
                "moderate": [],
                "aggressive": []
            },
            "rationale": {
                "conservative_rationale": "Client values stability",
                "moderate_rationale": "Some flexibility exists",
                "aggressive_rationale": "Market is hardening",
                "decision_factors": ["claim history", "market trend"],
                "client_history_impact": "Few claims",
                "comparable_deals_impact": "Peers accepted increases",
                "risk_profile_considerations": "Moderate cat exposure"
            },
            "context_summary": {
                "deal_summary": {
                    "coverage_terms": "Property all-risk",
                    "key_risk_factors": ["coastal exposure"]
                },
                "client_summary": { "prior_negotiation_history": [] },
                "negotiation_context": { "current_objections": ["price"] },
                "comparable_deals": {
                    "similar_deals": [{
                        "reference_deal_id": "DEAL042",
                        "key_learnings": ["bundle coverage"]
                    }],
                    "market_trends": "Rates up 8%"
                },
                "key_insights": []
            },
            "relevant_domain_knowledge": [{
                "chunk": { "chunk_id": "doc1_chunk_0", "text": "Title\nBody", "metadata": {} },
                "relevance_reason": "Pricing",
                "application_context": "Renewal"
            }],
            "information_gaps": [{
                "gap_description": "No loss runs",
                "recommended_action": "Request them",
                "priority": 1,
                "impact_on_strategy": "Limits pricing"
            }],
            "reasoning_steps": ["step 1"],
            "used_domain_chunks": [{ "chunk_id": "doc1_chunk_0" }],
            "decision_basis": []
        });
        assert!(validate_result_schema(&value).is_ok());
    }
}
