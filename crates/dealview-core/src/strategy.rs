//! Strategy selector: risk-tier selection and rationale disclosure.
//!
//! The selector owns two pieces of state:
//! 1. `selected_tier`, defaulting to moderate, picks which recommendation
//!    list is displayed
//! 2. `rationale_expanded`, defaulting to collapsed, discloses the
//!    tier-specific rationale when the result carries one
//!
//! The decision drivers block is rendered separately and never depends on
//! either piece of state.

use crate::display::{Node, SelectorOption};
use crate::schema::{AnalysisResult, Recommendation, StrategyRationale};
use crate::tier::Tier;
use crate::views::optional_field;
use crate::ViewError;

/// Tier selection and rationale disclosure state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StrategySelector {
    selected: Tier,
    rationale_expanded: bool,
}

impl StrategySelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_tier(&self) -> Tier {
        self.selected
    }

    pub fn rationale_expanded(&self) -> bool {
        self.rationale_expanded
    }

    /// Select the tier whose recommendations are displayed.
    pub fn select_tier(&mut self, tier: Tier) {
        self.selected = tier;
    }

    /// Flip the rationale disclosure.
    ///
    /// Fails without changing state when the result has no rationale.
    pub fn toggle_rationale(&mut self, result: &AnalysisResult) -> Result<bool, ViewError> {
        if result.rationale.is_none() {
            return Err(ViewError::RationaleUnavailable);
        }
        self.rationale_expanded = !self.rationale_expanded;
        Ok(self.rationale_expanded)
    }

    /// Recommendations of the selected tier.
    pub fn recommendations<'a>(&self, result: &'a AnalysisResult) -> &'a [Recommendation] {
        result.strategy.tier(self.selected)
    }

    /// Render the tier selector, the selected recommendations and the
    /// rationale disclosure.
    pub fn render(&self, result: &AnalysisResult) -> Node {
        let tier = self.selected;
        let mut children = vec![tier_selector(tier)];

        let recommendations = self.recommendations(result);
        if recommendations.is_empty() {
            children.push(Node::placeholder(format!(
                "No {} recommendations available",
                tier
            )));
        } else {
            children.extend(
                recommendations
                    .iter()
                    .map(|rec| recommendation_card(tier, rec)),
            );
        }

        if let Some(rationale) = &result.rationale {
            let label = if self.rationale_expanded {
                "Hide rationale"
            } else {
                "Show rationale"
            };
            children.push(Node::toggle(label, self.rationale_expanded));

            if self.rationale_expanded {
                children.push(tier_rationale(tier, rationale));
            }
        }

        Node::section("Strategy Options", children)
    }
}

/// The tier selector control.
pub fn tier_selector(selected: Tier) -> Node {
    Node::Selector {
        options: Tier::ALL
            .iter()
            .map(|tier| SelectorOption {
                label: tier.label().to_string(),
                accent: tier.accent(),
                selected: *tier == selected,
            })
            .collect(),
    }
}

/// A recommendation card accented with its tier's color.
pub fn recommendation_card(tier: Tier, rec: &Recommendation) -> Node {
    let title = if rec.recommendation.is_empty() {
        "Untitled recommendation"
    } else {
        rec.recommendation.as_str()
    };

    let children = [
        ("Rationale", &rec.rationale),
        ("Impact", &rec.impact),
        ("Confidence", &rec.confidence_level),
        ("Risk", &rec.risk_level),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| Node::field(label, value.as_str()))
    .collect();

    Node::card(tier.accent(), title, children)
}

fn tier_rationale(tier: Tier, rationale: &StrategyRationale) -> Node {
    let body = match rationale.for_tier(tier) {
        Some(text) => Node::text(text),
        None => Node::placeholder(format!("No rationale provided for the {} tier", tier)),
    };
    Node::card(tier.accent(), format!("{} Rationale", tier.label()), vec![body])
}

/// Decision factors and the three impact statements.
///
/// Rendered once per result, whatever tier is selected.
pub fn decision_drivers(result: &AnalysisResult) -> Node {
    let Some(rationale) = &result.rationale else {
        return Node::section(
            "Decision Drivers",
            vec![Node::placeholder("No rationale available")],
        );
    };

    let factors = if rationale.decision_factors.is_empty() {
        Node::placeholder("No decision factors listed")
    } else {
        Node::tags(rationale.decision_factors.clone())
    };

    let mut children = vec![factors];
    children.extend(
        [
            optional_field(
                "Client History Impact",
                rationale.client_history_impact.as_ref(),
            ),
            optional_field(
                "Comparable Deals Impact",
                rationale.comparable_deals_impact.as_ref(),
            ),
            optional_field(
                "Risk Profile Considerations",
                rationale.risk_profile_considerations.as_ref(),
            ),
        ]
        .into_iter()
        .flatten(),
    );

    Node::section("Decision Drivers", children)
}
