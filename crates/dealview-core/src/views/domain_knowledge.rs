//! Domain knowledge sub-view.

use crate::display::{Accent, Node};
use crate::schema::{AnalysisResult, KnowledgeEntry};

use super::{optional_field, SubView, Tab};

/// Title used when a knowledge entry has no source text.
pub const UNTITLED_KNOWLEDGE: &str = "Knowledge Chunk";

/// Renders `relevant_domain_knowledge`, one card per entry.
pub struct DomainKnowledgeView;

impl DomainKnowledgeView {
    pub fn new() -> Self {
        Self
    }

    fn entry_card(&self, entry: &KnowledgeEntry) -> Node {
        let title = entry.title().unwrap_or(UNTITLED_KNOWLEDGE);
        let source = entry
            .chunk
            .as_ref()
            .and_then(|chunk| chunk.source_name())
            .map(|name| Node::field("Source", name));

        let children = [
            source,
            optional_field("Relevance", entry.relevance_reason.as_ref()),
            optional_field("Application", entry.application_context.as_ref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        Node::card(Accent::Blue, title, children)
    }
}

impl Default for DomainKnowledgeView {
    fn default() -> Self {
        Self::new()
    }
}

impl SubView for DomainKnowledgeView {
    fn tab(&self) -> Tab {
        Tab::Knowledge
    }

    fn render(&self, result: &AnalysisResult) -> Option<Node> {
        let entries = result.relevant_domain_knowledge.as_ref()?;

        if entries.is_empty() {
            return Some(Node::placeholder("No knowledge entries were used"));
        }

        Some(Node::group(
            entries.iter().map(|entry| self.entry_card(entry)).collect(),
        ))
    }
}
