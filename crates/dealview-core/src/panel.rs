//! Tabbed panel over the optional result fragments.
//!
//! Exactly one tab is active at a time. Switching tabs only changes which
//! sub-view is rendered; sub-view state (the debug disclosure) is kept for
//! the lifetime of the panel.

use crate::display::{Accent, Node, SelectorOption};
use crate::schema::AnalysisResult;
use crate::views::{
    ContextSummaryView, DebugTraceView, DomainKnowledgeView, InformationGapsView, SubView, Tab,
};

/// Active tab plus the stateful debug sub-view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabbedPanel {
    active: Tab,
    debug: DebugTraceView,
}

impl TabbedPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active = tab;
    }

    /// Flip the debug trace disclosure and return the new state.
    pub fn toggle_debug(&mut self) -> bool {
        self.debug.toggle()
    }

    pub fn debug_expanded(&self) -> bool {
        self.debug.is_expanded()
    }

    fn view(&self, tab: Tab) -> &dyn SubView {
        match tab {
            Tab::Context => &ContextSummaryView,
            Tab::Knowledge => &DomainKnowledgeView,
            Tab::Gaps => &InformationGapsView,
            Tab::Debug => &self.debug,
        }
    }

    /// The tab bar with the active tab marked.
    pub fn tab_bar(&self) -> Node {
        Node::Selector {
            options: Tab::ALL
                .iter()
                .map(|tab| SelectorOption {
                    label: tab.label().to_string(),
                    accent: Accent::Blue,
                    selected: *tab == self.active,
                })
                .collect(),
        }
    }

    /// Content of the active tab, or its placeholder when the fragment is
    /// absent.
    pub fn render_active(&self, result: &AnalysisResult) -> Node {
        let tab = self.active;
        let body = self
            .view(tab)
            .render(result)
            .unwrap_or_else(|| Node::placeholder(tab.placeholder()));
        Node::section(tab.label(), vec![body])
    }

    pub fn render(&self, result: &AnalysisResult) -> Node {
        Node::group(vec![self.tab_bar(), self.render_active(result)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bare_result() -> AnalysisResult {
        AnalysisResult::from_value(json!({
            "strategy": { "conservative": [], "moderate": [], "aggressive": [] }
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults_to_context_tab() {
        let panel = TabbedPanel::new();
        assert_eq!(panel.active_tab(), Tab::Context);
        assert!(!panel.debug_expanded());
    }

    #[test]
    fn test_every_tab_shows_placeholder_when_absent() {
        let result = bare_result();
        let mut panel = TabbedPanel::new();

        for tab in Tab::ALL {
            panel.select_tab(tab);
            let node = panel.render_active(&result);
            assert_eq!(
                node,
                Node::section(tab.label(), vec![Node::placeholder(tab.placeholder())])
            );
        }
    }

    #[test]
    fn test_views_report_their_tab() {
        let panel = TabbedPanel::new();
        for tab in Tab::ALL {
            assert_eq!(panel.view(tab).tab(), tab);
        }
    }

    #[test]
    fn test_missing_fragment_leaves_other_tabs_working() {
        let result = AnalysisResult::from_value(json!({
            "strategy": { "conservative": [], "moderate": [], "aggressive": [] },
            "information_gaps": [{ "gap_description": "Loss runs", "recommended_action": "Request them" }]
        }))
        .unwrap();
        let mut panel = TabbedPanel::new();

        assert!(panel
            .render(&result)
            .contains_placeholder("No context summary available"));

        panel.select_tab(Tab::Gaps);
        let node = panel.render(&result);
        assert!(!node.contains_placeholder("No information gaps available"));
        assert!(node.find(&|n| matches!(n, Node::Card { .. })).is_some());
    }

    #[test]
    fn test_debug_state_survives_tab_switch() {
        let result = AnalysisResult::from_value(json!({
            "strategy": {},
            "reasoning_steps": ["step"]
        }))
        .unwrap();
        let mut panel = TabbedPanel::new();
        panel.select_tab(Tab::Debug);
        assert!(panel.toggle_debug());

        panel.select_tab(Tab::Knowledge);
        panel.select_tab(Tab::Debug);
        assert!(panel.debug_expanded());
        assert!(panel
            .render(&result)
            .find_section("Reasoning Steps")
            .is_some());
    }

    #[test]
    fn test_tab_bar_marks_active_tab() {
        let mut panel = TabbedPanel::new();
        panel.select_tab(Tab::Knowledge);

        let Node::Selector { options } = panel.tab_bar() else {
            panic!("tab bar must be a selector node");
        };
        let selected: Vec<_> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(selected, vec!["Domain Knowledge"]);
    }
}
