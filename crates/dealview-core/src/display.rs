//! Display representation produced by the renderers.
//!
//! Renderers never format text directly. They build a [`Node`] tree and a
//! [`TextRenderer`] turns it into lines, with a pluggable [`Style`] deciding
//! how headings, labels and accents are painted.

use serde::Serialize;

/// Semantic color of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Neutral,
    Green,
    Yellow,
    Red,
    Blue,
    Amber,
}

/// One option of a selector control (tier buttons, tab bar).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorOption {
    pub label: String,
    pub accent: Accent,
    pub selected: bool,
}

/// A node of the display tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Nodes rendered one after another at the same depth
    Group { children: Vec<Node> },

    /// A titled block whose children are indented
    Section { title: String, children: Vec<Node> },

    /// A "Label: value" line
    Field { label: String, value: String },

    /// Free text, possibly multi-line
    Text { text: String },

    /// Bulleted list
    List { items: Vec<String> },

    /// Inline tag set
    Tags { tags: Vec<String> },

    /// A block with an accent bar down its left edge
    Card {
        accent: Accent,
        title: String,
        children: Vec<Node>,
    },

    /// A row of selectable options
    Selector { options: Vec<SelectorOption> },

    /// A disclosure control
    Toggle { label: String, expanded: bool },

    /// Verbatim text, never wrapped or restyled
    Preformatted { text: String },

    /// Fallback content where data is absent or empty
    Placeholder { text: String },
}

impl Node {
    pub fn group(children: Vec<Node>) -> Self {
        Node::Group { children }
    }

    pub fn section(title: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Section {
            title: title.into(),
            children,
        }
    }

    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        Node::Field {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn list(items: Vec<String>) -> Self {
        Node::List { items }
    }

    pub fn tags(tags: Vec<String>) -> Self {
        Node::Tags { tags }
    }

    pub fn card(accent: Accent, title: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Card {
            accent,
            title: title.into(),
            children,
        }
    }

    pub fn toggle(label: impl Into<String>, expanded: bool) -> Self {
        Node::Toggle {
            label: label.into(),
            expanded,
        }
    }

    pub fn preformatted(text: impl Into<String>) -> Self {
        Node::Preformatted { text: text.into() }
    }

    pub fn placeholder(text: impl Into<String>) -> Self {
        Node::Placeholder { text: text.into() }
    }

    /// Direct children of container nodes.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Group { children }
            | Node::Section { children, .. }
            | Node::Card { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the first node matching `predicate`.
    pub fn find(&self, predicate: &dyn Fn(&Node) -> bool) -> Option<&Node> {
        if predicate(self) {
            return Some(self);
        }
        self.children()
            .iter()
            .find_map(|child| child.find(predicate))
    }

    /// The section with the given title, anywhere in the tree.
    pub fn find_section(&self, title: &str) -> Option<&Node> {
        self.find(&|node| matches!(node, Node::Section { title: t, .. } if t == title))
    }

    /// Whether a placeholder with this exact text appears in the tree.
    pub fn contains_placeholder(&self, text: &str) -> bool {
        self.find(&|node| matches!(node, Node::Placeholder { text: t } if t == text))
            .is_some()
    }
}

/// Role of a text span, used by [`Style`] to pick its appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Heading,
    Label,
    Muted,
    Accent(Accent),
    Selected(Accent),
}

/// Styling policy applied while rendering text.
pub trait Style {
    fn paint(&self, text: &str, role: Role) -> String;
}

/// Leaves text unstyled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyle;

impl Style for PlainStyle {
    fn paint(&self, text: &str, _role: Role) -> String {
        text.to_string()
    }
}

const INDENT: &str = "  ";

/// Writes a display tree as indented text lines.
pub struct TextRenderer<'a> {
    style: &'a dyn Style,
}

impl Default for TextRenderer<'static> {
    fn default() -> Self {
        Self { style: &PlainStyle }
    }
}

impl<'a> TextRenderer<'a> {
    pub fn new(style: &'a dyn Style) -> Self {
        Self { style }
    }

    /// Render a tree to text. Every line ends with a newline.
    pub fn render(&self, node: &Node) -> String {
        let mut lines = Vec::new();
        self.write(node, "", &mut lines);

        let mut out = String::new();
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    fn write(&self, node: &Node, indent: &str, lines: &mut Vec<String>) {
        let paint = |text: &str, role| self.style.paint(text, role);

        match node {
            Node::Group { children } => {
                for child in children {
                    self.write(child, indent, lines);
                }
            }
            Node::Section { title, children } => {
                lines.push(format!("{}{}", indent, paint(title, Role::Heading)));
                let nested = format!("{}{}", indent, INDENT);
                for child in children {
                    self.write(child, &nested, lines);
                }
            }
            Node::Field { label, value } => {
                let label = paint(&format!("{}:", label), Role::Label);
                let mut value_lines = value.lines();
                let first = value_lines.next().unwrap_or("");
                lines.push(format!("{}{} {}", indent, label, first).trim_end().to_string());
                for rest in value_lines {
                    lines.push(format!("{}{}{}", indent, INDENT, rest));
                }
            }
            Node::Text { text } => {
                for line in text.lines() {
                    lines.push(format!("{}{}", indent, line));
                }
            }
            Node::List { items } => {
                for item in items {
                    lines.push(format!("{}- {}", indent, item));
                }
            }
            Node::Tags { tags } => {
                let rendered: Vec<String> = tags
                    .iter()
                    .map(|tag| paint(&format!("[{}]", tag), Role::Accent(Accent::Blue)))
                    .collect();
                lines.push(format!("{}{}", indent, rendered.join(" ")));
            }
            Node::Card {
                accent,
                title,
                children,
            } => {
                let bar = paint("|", Role::Accent(*accent));
                lines.push(format!("{}{} {}", indent, bar, paint(title, Role::Heading)));
                let mut inner = Vec::new();
                for child in children {
                    self.write(child, "", &mut inner);
                }
                for line in inner {
                    lines.push(format!("{}{} {}", indent, bar, line).trim_end().to_string());
                }
            }
            Node::Selector { options } => {
                let last = options.len().saturating_sub(1);
                let rendered: Vec<String> = options
                    .iter()
                    .enumerate()
                    .map(|(i, option)| {
                        if option.selected {
                            paint(&format!("[{}]", option.label), Role::Selected(option.accent))
                        } else if i == last {
                            // Last option carries no trailing pad.
                            paint(&format!(" {}", option.label), Role::Accent(option.accent))
                        } else {
                            paint(&format!(" {} ", option.label), Role::Accent(option.accent))
                        }
                    })
                    .collect();
                lines.push(format!("{}{}", indent, rendered.join(" ")));
            }
            Node::Toggle { label, expanded } => {
                let marker = if *expanded { "[-]" } else { "[+]" };
                lines.push(format!("{}{} {}", indent, marker, label));
            }
            Node::Preformatted { text } => {
                for line in text.lines() {
                    lines.push(format!("{}{}", indent, line));
                }
            }
            Node::Placeholder { text } => {
                lines.push(format!("{}{}", indent, paint(text, Role::Muted)));
            }
        }
    }
}
