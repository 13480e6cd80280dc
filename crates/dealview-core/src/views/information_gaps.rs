//! Information gaps sub-view.

use crate::display::{Accent, Node};
use crate::schema::{AnalysisResult, InformationGap};

use super::{optional_field, SubView, Tab};

/// Renders `information_gaps` as flagged blocks, in payload order.
pub struct InformationGapsView;

impl InformationGapsView {
    pub fn new() -> Self {
        Self
    }

    fn gap_block(&self, gap: &InformationGap) -> Node {
        let description = gap
            .gap_description
            .as_deref()
            .unwrap_or("Unspecified information gap");

        let children = [
            optional_field("Recommended Action", gap.recommended_action.as_ref()),
            optional_field("Impact", gap.impact_on_strategy.as_ref()),
            gap.priority
                .as_ref()
                .map(|priority| Node::field("Priority", priority.to_string())),
        ]
        .into_iter()
        .flatten()
        .collect();

        Node::card(Accent::Amber, format!("! {}", description), children)
    }
}

impl Default for InformationGapsView {
    fn default() -> Self {
        Self::new()
    }
}

impl SubView for InformationGapsView {
    fn tab(&self) -> Tab {
        Tab::Gaps
    }

    fn render(&self, result: &AnalysisResult) -> Option<Node> {
        let gaps = result.information_gaps.as_ref()?;

        if gaps.is_empty() {
            return Some(Node::placeholder("No information gaps identified"));
        }

        Some(Node::group(
            gaps.iter().map(|gap| self.gap_block(gap)).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::TextRenderer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_gap_renders_as_flagged_block() {
        let result = AnalysisResult::from_value(json!({
            "strategy": { "conservative": [], "moderate": [], "aggressive": [] },
            "information_gaps": [{
                "gap_description": "No loss runs for 2023",
                "recommended_action": "Request loss runs from broker",
                "priority": 1,
                "impact_on_strategy": "Pricing confidence is limited"
            }]
        }))
        .unwrap();

        let node = InformationGapsView::new().render(&result).unwrap();
        let text = TextRenderer::default().render(&node);
        assert_eq!(
            text,
            "| ! No loss runs for 2023\n\
             | Recommended Action: Request loss runs from broker\n\
             | Impact: Pricing confidence is limited\n\
             | Priority: 1\n"
        );
        assert!(matches!(
            node.children()[0],
            Node::Card { accent: Accent::Amber, .. }
        ));
    }

    #[test]
    fn test_gap_with_only_description() {
        let result = AnalysisResult::from_value(json!({
            "strategy": {},
            "information_gaps": [{ "gap_description": "Unknown broker commission" }]
        }))
        .unwrap();

        let node = InformationGapsView::new().render(&result).unwrap();
        assert_eq!(
            node.children()[0],
            Node::card(Accent::Amber, "! Unknown broker commission", vec![])
        );
    }

    #[test]
    fn test_out_of_range_priority_is_shown_verbatim() {
        let result = AnalysisResult::from_value(json!({
            "strategy": {},
            "information_gaps": [
                { "gap_description": "No loss runs", "priority": 1.0 },
                { "gap_description": "No broker notes", "priority": 18446744073709551615u64 }
            ]
        }))
        .unwrap();

        let node = InformationGapsView::new().render(&result).unwrap();
        let text = TextRenderer::default().render(&node);
        assert!(text.contains("| Priority: 1.0\n"));
        assert!(text.contains("| Priority: 18446744073709551615\n"));
    }

    #[test]
    fn test_absent_gaps_render_nothing() {
        let result = AnalysisResult::from_value(json!({ "strategy": {} })).unwrap();
        assert!(InformationGapsView::new().render(&result).is_none());
    }
}
