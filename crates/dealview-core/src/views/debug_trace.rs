//! Debug trace sub-view.
//!
//! The only sub-view with state: a disclosure toggle that starts collapsed.
//! When expanded it prints the raw diagnostic sequences as pretty JSON and
//! never interprets them.

use serde_json::Value;

use crate::display::Node;
use crate::schema::{AnalysisResult, Fragment};

use super::{SubView, Tab};

/// Renders `reasoning_steps`, `used_domain_chunks` and `decision_basis`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugTraceView {
    expanded: bool,
}

impl DebugTraceView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Flip the disclosure and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    fn toggle_label(&self) -> &'static str {
        if self.expanded {
            "Hide debug output"
        } else {
            "Show debug output"
        }
    }
}

fn pretty(value: Option<&Value>) -> String {
    match value {
        Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        None => "[]".to_string(),
    }
}

impl SubView for DebugTraceView {
    fn tab(&self) -> Tab {
        Tab::Debug
    }

    fn render(&self, result: &AnalysisResult) -> Option<Node> {
        if !result.has_fragment(Fragment::DebugTrace) {
            return None;
        }

        let mut children = vec![Node::toggle(self.toggle_label(), self.expanded)];

        if self.expanded {
            let sequences = [
                ("Reasoning Steps", result.reasoning_steps.as_ref()),
                ("Used Domain Chunks", result.used_domain_chunks.as_ref()),
                ("Decision Basis", result.decision_basis.as_ref()),
            ];
            children.extend(sequences.into_iter().map(|(title, value)| {
                Node::section(title, vec![Node::preformatted(pretty(value))])
            }));
        }

        Some(Node::group(children))
    }
}
