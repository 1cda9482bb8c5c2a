//! Core types for the persona system.
//!
//! A persona is a named visitor archetype mapped to exactly one hero-banner
//! variant. The declaration order of the enum is load-bearing: it is the
//! canonical tie-break order for the decision engine and the rotation order
//! for the auto-cycle scheduler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// The four visitor personas the engine can select between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    /// Direct buyer — ready to purchase, shown the bold variant.
    BuyNow,
    /// Researcher — comparing models, shown spec cards.
    Compare,
    /// Gamer — arrived from gaming content, shown the dark variant.
    Gaming,
    /// Deal hunter — price-sensitive, shown the flash-sale variant.
    Budget,
}

impl Persona {
    /// Slug used in signal values, session storage, and CLI args.
    pub fn slug(&self) -> &'static str {
        match self {
            Persona::BuyNow => "buy_now",
            Persona::Compare => "compare",
            Persona::Gaming => "gaming",
            Persona::Budget => "budget",
        }
    }

    /// Human-readable display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::BuyNow => "Direct Buyer",
            Persona::Compare => "Researcher",
            Persona::Gaming => "Gamer",
            Persona::Budget => "Deal Hunter",
        }
    }

    /// All personas in declaration order (the canonical tie-break order).
    pub fn all() -> &'static [Persona] {
        &[
            Persona::BuyNow,
            Persona::Compare,
            Persona::Gaming,
            Persona::Budget,
        ]
    }

    /// Position of this persona in declaration order.
    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|p| p == self)
            .unwrap_or(0)
    }

    /// The next persona in rotation order, wrapping around.
    pub fn next(&self) -> Persona {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy_now" | "buy-now" | "buynow" => Ok(Persona::BuyNow),
            "compare" => Ok(Persona::Compare),
            "gaming" => Ok(Persona::Gaming),
            "budget" => Ok(Persona::Budget),
            _ => Err(format!(
                "Unknown persona '{}'. Valid: buy_now, compare, gaming, budget",
                s
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_slug() {
        assert_eq!(Persona::BuyNow.slug(), "buy_now");
        assert_eq!(Persona::Compare.slug(), "compare");
        assert_eq!(Persona::Gaming.slug(), "gaming");
        assert_eq!(Persona::Budget.slug(), "budget");
    }

    #[test]
    fn test_persona_from_str() {
        assert_eq!("buy_now".parse::<Persona>().unwrap(), Persona::BuyNow);
        assert_eq!("buy-now".parse::<Persona>().unwrap(), Persona::BuyNow);
        assert_eq!("GAMING".parse::<Persona>().unwrap(), Persona::Gaming);
        assert!("unknown".parse::<Persona>().is_err());
    }

    #[test]
    fn test_persona_all_order() {
        let all = Persona::all();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], Persona::BuyNow);
        assert_eq!(all[1], Persona::Compare);
        assert_eq!(all[2], Persona::Gaming);
        assert_eq!(all[3], Persona::Budget);
    }

    #[test]
    fn test_persona_next_wraps() {
        assert_eq!(Persona::BuyNow.next(), Persona::Compare);
        assert_eq!(Persona::Compare.next(), Persona::Gaming);
        assert_eq!(Persona::Gaming.next(), Persona::Budget);
        assert_eq!(Persona::Budget.next(), Persona::BuyNow);
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Persona::BuyNow).unwrap();
        assert_eq!(json, "\"buy_now\"");
        let parsed: Persona = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Persona::BuyNow);
    }
}
