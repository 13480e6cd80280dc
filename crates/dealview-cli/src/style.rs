//! Terminal colors for rendered reports.

use dealview_core::{Accent, Role, Style};
use owo_colors::OwoColorize;

/// Paints roles with ANSI escapes. Tier accents follow the tier table.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiStyle;

fn colorize(text: &str, accent: Accent) -> String {
    match accent {
        Accent::Neutral => text.to_string(),
        Accent::Green => text.green().to_string(),
        Accent::Yellow => text.yellow().to_string(),
        Accent::Red => text.red().to_string(),
        Accent::Blue => text.blue().to_string(),
        Accent::Amber => text.truecolor(255, 176, 0).to_string(),
    }
}

impl Style for AnsiStyle {
    fn paint(&self, text: &str, role: Role) -> String {
        match role {
            Role::Heading => text.bold().to_string(),
            Role::Label => text.cyan().to_string(),
            Role::Muted => text.dimmed().italic().to_string(),
            Role::Accent(accent) => colorize(text, accent),
            Role::Selected(accent) => colorize(text, accent).bold().reversed().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealview_core::{Node, PlainStyle, TextRenderer, Tier};

    #[test]
    fn test_neutral_accent_is_unstyled() {
        assert_eq!(AnsiStyle.paint("|", Role::Accent(Accent::Neutral)), "|");
    }

    #[test]
    fn test_tier_accents_are_colored() {
        for tier in Tier::ALL {
            let painted = AnsiStyle.paint(tier.label(), Role::Accent(tier.accent()));
            assert!(painted.contains("\u{1b}["));
            assert!(painted.contains(tier.label()));
        }
    }

    #[test]
    fn test_styled_and_plain_text_match_once_escapes_are_removed() {
        let tree = Node::section(
            "Strategy Options",
            vec![Node::field("Impact", "Lower margin")],
        );
        let plain = TextRenderer::new(&PlainStyle).render(&tree);
        let styled = TextRenderer::new(&AnsiStyle).render(&tree);

        assert_ne!(plain, styled);
        assert_eq!(strip_ansi(&styled), plain);
    }

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }
}
