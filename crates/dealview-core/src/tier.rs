//! Risk tiers and their presentation.
//!
//! Every renderer that needs tier styling reads it from [`Tier::presentation`],
//! so the selector control and the recommendation cards always agree.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::display::Accent;
use crate::ViewError;

/// A risk posture under which recommendations are grouped.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

/// Presentation attributes for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPresentation {
    pub tier: Tier,
    pub label: &'static str,
    pub accent: Accent,
}

static PRESENTATIONS: [TierPresentation; 3] = [
    TierPresentation {
        tier: Tier::Conservative,
        label: "Conservative",
        accent: Accent::Green,
    },
    TierPresentation {
        tier: Tier::Moderate,
        label: "Moderate",
        accent: Accent::Yellow,
    },
    TierPresentation {
        tier: Tier::Aggressive,
        label: "Aggressive",
        accent: Accent::Red,
    },
];

impl Tier {
    /// All tiers in selector order.
    pub const ALL: [Tier; 3] = [Tier::Conservative, Tier::Moderate, Tier::Aggressive];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Conservative => "conservative",
            Tier::Moderate => "moderate",
            Tier::Aggressive => "aggressive",
        }
    }

    pub fn presentation(self) -> &'static TierPresentation {
        &PRESENTATIONS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.presentation().label
    }

    pub fn accent(self) -> Accent {
        self.presentation().accent
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" | "c" => Ok(Tier::Conservative),
            "moderate" | "m" => Ok(Tier::Moderate),
            "aggressive" | "a" => Ok(Tier::Aggressive),
            _ => Err(ViewError::UnknownTier(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tier_is_moderate() {
        assert_eq!(Tier::default(), Tier::Moderate);
    }

    #[test]
    fn test_presentation_table_is_indexed_by_tier() {
        for tier in Tier::ALL {
            assert_eq!(tier.presentation().tier, tier);
        }
    }

    #[test]
    fn test_tier_accents() {
        assert_eq!(Tier::Conservative.accent(), Accent::Green);
        assert_eq!(Tier::Moderate.accent(), Accent::Yellow);
        assert_eq!(Tier::Aggressive.accent(), Accent::Red);
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("Aggressive".parse::<Tier>(), Ok(Tier::Aggressive));
        assert_eq!(" c ".parse::<Tier>(), Ok(Tier::Conservative));
        assert!(matches!(
            "reckless".parse::<Tier>(),
            Err(ViewError::UnknownTier(_))
        ));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Tier::Moderate).unwrap(), "\"moderate\"");
    }
}
