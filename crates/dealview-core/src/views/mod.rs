//! Sub-view renderers for the tabbed panel.
//!
//! Each sub-view maps one optional payload fragment to a display tree. A
//! sub-view returns `None` when its fragment is absent; the panel then shows
//! the tab's placeholder instead.
//!
//! | Tab | Fragment | Renderer |
//! |-----|----------|----------|
//! | Deal Context | `context_summary` | [`ContextSummaryView`] |
//! | Domain Knowledge | `relevant_domain_knowledge` | [`DomainKnowledgeView`] |
//! | Information Gaps | `information_gaps` | [`InformationGapsView`] |
//! | Debug Trace | `reasoning_steps`, `used_domain_chunks`, `decision_basis` | [`DebugTraceView`] |

mod context_summary;
mod debug_trace;
mod domain_knowledge;
mod information_gaps;

pub use context_summary::ContextSummaryView;
pub use debug_trace::DebugTraceView;
pub use domain_knowledge::DomainKnowledgeView;
pub use information_gaps::InformationGapsView;

use std::fmt;
use std::str::FromStr;

use crate::display::Node;
use crate::schema::{AnalysisResult, Fragment};
use crate::ViewError;

/// A tab of the tabbed panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Context,
    Knowledge,
    Gaps,
    Debug,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 4] = [Tab::Context, Tab::Knowledge, Tab::Gaps, Tab::Debug];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Context => "Deal Context",
            Tab::Knowledge => "Domain Knowledge",
            Tab::Gaps => "Information Gaps",
            Tab::Debug => "Debug Trace",
        }
    }

    /// Fixed content shown when the tab's fragment is absent.
    pub fn placeholder(self) -> &'static str {
        match self {
            Tab::Context => "No context summary available",
            Tab::Knowledge => "No domain knowledge available",
            Tab::Gaps => "No information gaps available",
            Tab::Debug => "No debug trace available",
        }
    }

    /// The payload fragment this tab displays.
    pub fn fragment(self) -> Fragment {
        match self {
            Tab::Context => Fragment::ContextSummary,
            Tab::Knowledge => Fragment::DomainKnowledge,
            Tab::Gaps => Fragment::InformationGaps,
            Tab::Debug => Fragment::DebugTrace,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "context" | "deal-context" | "deal context" => Ok(Tab::Context),
            "knowledge" | "domain-knowledge" | "domain knowledge" => Ok(Tab::Knowledge),
            "gaps" | "information-gaps" | "information gaps" => Ok(Tab::Gaps),
            "debug" | "debug-trace" | "debug trace" => Ok(Tab::Debug),
            _ => Err(ViewError::UnknownTab(s.to_string())),
        }
    }
}

/// Renders one payload fragment for a tab.
pub trait SubView {
    /// The tab this view is shown under.
    fn tab(&self) -> Tab;

    /// Render the fragment, or `None` when it is absent from `result`.
    fn render(&self, result: &AnalysisResult) -> Option<Node>;
}

/// A "Label: value" line, omitted when the value is absent.
pub(crate) fn optional_field(label: &str, value: Option<&String>) -> Option<Node> {
    value.map(|value| Node::field(label, value.as_str()))
}

/// A titled bullet list. Empty lists still show their title.
pub(crate) fn labelled_list(title: &str, items: &[String]) -> Node {
    let body = if items.is_empty() {
        Node::placeholder("None listed")
    } else {
        Node::list(items.to_vec())
    };
    Node::section(title, vec![body])
}
