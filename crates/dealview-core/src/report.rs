//! The composed report for one analysis result.
//!
//! A [`Report`] owns the view state for a single result: tier selection,
//! rationale disclosure, active tab and debug disclosure. A new result always
//! gets a new report, so view state never leaks between results.

use std::sync::Arc;

use crate::display::Node;
use crate::observe::{NoopObserver, ViewEvent, ViewObserver};
use crate::panel::TabbedPanel;
use crate::schema::AnalysisResult;
use crate::strategy::{decision_drivers, StrategySelector};
use crate::tier::Tier;
use crate::views::{labelled_list, optional_field, Tab};
use crate::ViewError;

/// View state bound to one immutable result.
pub struct Report {
    result: Arc<AnalysisResult>,
    selector: StrategySelector,
    panel: TabbedPanel,
    observer: Arc<dyn ViewObserver>,
}

impl Report {
    pub fn new(result: Arc<AnalysisResult>) -> Self {
        Self::with_observer(result, Arc::new(NoopObserver))
    }

    /// Build a report and announce every absent tier and fragment.
    pub fn with_observer(result: Arc<AnalysisResult>, observer: Arc<dyn ViewObserver>) -> Self {
        for tier in result.missing_tiers() {
            observer.on_event(&ViewEvent::TierMissing { tier });
        }
        for fragment in result.missing_fragments() {
            observer.on_event(&ViewEvent::FragmentMissing { fragment });
        }

        Self {
            result,
            selector: StrategySelector::new(),
            panel: TabbedPanel::new(),
            observer,
        }
    }

    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    pub fn selector(&self) -> &StrategySelector {
        &self.selector
    }

    pub fn panel(&self) -> &TabbedPanel {
        &self.panel
    }

    pub fn select_tier(&mut self, tier: Tier) {
        self.selector.select_tier(tier);
        self.observer.on_event(&ViewEvent::TierSelected { tier });
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.panel.select_tab(tab);
        self.observer.on_event(&ViewEvent::TabSelected { tab });
    }

    pub fn toggle_rationale(&mut self) -> Result<bool, ViewError> {
        let expanded = self.selector.toggle_rationale(&self.result)?;
        self.observer
            .on_event(&ViewEvent::RationaleToggled { expanded });
        Ok(expanded)
    }

    pub fn toggle_debug(&mut self) -> bool {
        let expanded = self.panel.toggle_debug();
        self.observer.on_event(&ViewEvent::DebugToggled { expanded });
        expanded
    }

    /// Deal id, overall confidence and next steps, when any are present.
    fn overview(&self) -> Option<Node> {
        let result = &self.result;
        let mut children: Vec<Node> = [
            optional_field("Deal", result.deal_id.as_ref()),
            optional_field("Overall Confidence", result.overall_confidence.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !result.next_steps.is_empty() {
            children.push(labelled_list("Next Steps", &result.next_steps));
        }

        if children.is_empty() {
            None
        } else {
            Some(Node::section("Analysis Overview", children))
        }
    }

    /// The whole report as a display tree.
    pub fn render(&self) -> Node {
        let mut children = Vec::with_capacity(4);
        children.extend(self.overview());
        children.push(self.selector.render(&self.result));
        children.push(decision_drivers(&self.result));
        children.push(self.panel.render(&self.result));
        Node::group(children)
    }
}
