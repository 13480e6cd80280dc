//! Deal context sub-view.
//!
//! Shows the four context sub-records verbatim: deal summary, client
//! summary, negotiation context and comparable deals. A missing sub-record
//! gets a local "Not provided" line; its siblings still render.

use crate::display::{Accent, Node};
use crate::schema::{
    AnalysisResult, ClientSummary, ComparableDeal, ComparableDealsSummary, ContextSummary,
    DealSummary, NegotiationContext,
};

use super::{labelled_list, optional_field, SubView, Tab};

const NOT_PROVIDED: &str = "Not provided";

/// Renders `context_summary`.
pub struct ContextSummaryView;

impl ContextSummaryView {
    pub fn new() -> Self {
        Self
    }

    fn deal_summary(&self, deal: Option<&DealSummary>) -> Node {
        let Some(deal) = deal else {
            return Node::section("Deal Summary", vec![Node::placeholder(NOT_PROVIDED)]);
        };

        let mut children: Vec<Node> = [
            optional_field("Coverage", deal.coverage_terms.as_ref()),
            optional_field("Risk", deal.risk_profile.as_ref()),
            optional_field("Premium", deal.premium_structure.as_ref()),
            optional_field("Line of Business", deal.line_of_business.as_ref()),
            optional_field("Territory", deal.territory.as_ref()),
            optional_field("Offer", deal.current_offer_details.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect();
        children.push(labelled_list("Key Risk Factors", &deal.key_risk_factors));

        Node::section("Deal Summary", children)
    }

    fn client_summary(&self, client: Option<&ClientSummary>) -> Node {
        let Some(client) = client else {
            return Node::section("Client Summary", vec![Node::placeholder(NOT_PROVIDED)]);
        };

        let mut children: Vec<Node> = [
            optional_field("Relationship", client.relationship_duration.as_ref()),
            optional_field("Claims", client.claim_history.as_ref()),
            optional_field("Payments", client.payment_history.as_ref()),
            optional_field("Style", client.negotiation_style.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect();
        children.push(labelled_list(
            "Prior Negotiations",
            &client.prior_negotiation_history,
        ));

        Node::section("Client Summary", children)
    }

    fn negotiation_context(&self, negotiation: Option<&NegotiationContext>) -> Node {
        let Some(negotiation) = negotiation else {
            return Node::section("Negotiation Context", vec![Node::placeholder(NOT_PROVIDED)]);
        };

        Node::section(
            "Negotiation Context",
            vec![
                labelled_list("Client Objections", &negotiation.current_objections),
                labelled_list("Discussion Progress", &negotiation.discussion_progress),
                labelled_list("Offer History", &negotiation.offer_history),
                labelled_list("Client Priorities", &negotiation.client_priorities),
            ],
        )
    }

    fn comparable_deals(&self, comparables: Option<&ComparableDealsSummary>) -> Node {
        let Some(comparables) = comparables else {
            return Node::section("Comparable Deals", vec![Node::placeholder(NOT_PROVIDED)]);
        };

        let mut children: Vec<Node> = [
            optional_field("Market Trends", comparables.market_trends.as_ref()),
            optional_field("Benchmarks", comparables.benchmark_insights.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if comparables.similar_deals.is_empty() {
            children.push(Node::placeholder("No similar deals listed"));
        } else {
            children.extend(comparables.similar_deals.iter().map(comparable_deal_card));
        }

        Node::section("Comparable Deals", children)
    }

    fn render_context(&self, context: &ContextSummary) -> Node {
        let mut sections = vec![
            self.deal_summary(context.deal_summary.as_ref()),
            self.client_summary(context.client_summary.as_ref()),
            self.negotiation_context(context.negotiation_context.as_ref()),
            self.comparable_deals(context.comparable_deals.as_ref()),
        ];

        if !context.key_insights.is_empty() {
            sections.push(Node::section(
                "Key Insights",
                vec![Node::list(context.key_insights.clone())],
            ));
        }

        Node::group(sections)
    }
}

fn comparable_deal_card(deal: &ComparableDeal) -> Node {
    let title = match (&deal.reference_deal_id, &deal.similarity_reason) {
        (Some(id), Some(reason)) => format!("{} - {}", id, reason),
        (Some(id), None) => id.clone(),
        (None, Some(reason)) => reason.clone(),
        (None, None) => "Unreferenced deal".to_string(),
    };

    let mut children = Vec::new();
    if let Some(outcome) = &deal.outcome_summary {
        children.push(Node::text(outcome.as_str()));
    }
    children.push(labelled_list("Key Learnings", &deal.key_learnings));

    Node::card(Accent::Neutral, title, children)
}

impl Default for ContextSummaryView {
    fn default() -> Self {
        Self::new()
    }
}

impl SubView for ContextSummaryView {
    fn tab(&self) -> Tab {
        Tab::Context
    }

    fn render(&self, result: &AnalysisResult) -> Option<Node> {
        result
            .context_summary
            .as_ref()
            .map(|context| self.render_context(context))
    }
}
