//! Rule table — intent matchers and referrer bonuses.
//!
//! Pure data: each persona maps to a content pattern, and each referrer
//! category maps to per-persona score bonuses. The matchers are pluggable
//! through this table; the engine never sees a regex directly.

use regex::Regex;

use crate::persona::Persona;
use crate::signal::ReferrerCategory;

/// Traffic-source fragments used to re-derive a referrer category from a
/// utm_source value, tested in precedence order.
const SOURCE_SEARCH: &[&str] = &["google", "bing", "duckduckgo", "yahoo"];
const SOURCE_SOCIAL: &[&str] = &["reddit", "twitter", "facebook", "instagram", "tiktok", "x.com"];
const SOURCE_EMAIL: &[&str] = &["mail", "newsletter", "email"];

// ─────────────────────────────────────────────────────────────────
// Rule Table
// ─────────────────────────────────────────────────────────────────

/// Static mapping of persona → content pattern, plus referrer bonuses.
pub struct RuleTable {
    rules: Vec<(Persona, Regex)>,
}

impl RuleTable {
    /// Compile the built-in rule set. The patterns are literals; a failure
    /// to compile is a programming error caught by the test suite.
    pub fn new() -> Self {
        let patterns: &[(Persona, &str)] = &[
            (Persona::BuyNow, r"\b(buy|purchase|order|add.to.cart|shop|get)\b"),
            (
                Persona::Compare,
                r"\b(compare|vs|best|review|top|benchmark|rating)\b",
            ),
            (
                Persona::Gaming,
                r"\b(game|gaming|fps|esport|rgb|rtx|gamer|competitive)\b",
            ),
            (
                Persona::Budget,
                r"\b(cheap|deal|sale|discount|budget|save|affordable|price)\b",
            ),
        ];

        let rules = patterns
            .iter()
            .map(|(persona, pattern)| {
                let regex = Regex::new(pattern).expect("built-in rule pattern is valid");
                (*persona, regex)
            })
            .collect();

        Self { rules }
    }

    /// Match the normalized text against every persona's pattern, returning
    /// the matched fragment for each hit.
    pub fn matches<'t>(&self, text: &'t str) -> Vec<(Persona, &'t str)> {
        self.rules
            .iter()
            .filter_map(|(persona, regex)| regex.find(text).map(|m| (*persona, m.as_str())))
            .collect()
    }

    /// Per-persona score bonuses for a referrer category.
    pub fn referrer_bonus(category: ReferrerCategory) -> &'static [(Persona, i64)] {
        match category {
            ReferrerCategory::Search => &[(Persona::BuyNow, 1), (Persona::Compare, 2)],
            ReferrerCategory::Social => &[(Persona::Gaming, 2)],
            ReferrerCategory::Email => &[(Persona::Budget, 2)],
            ReferrerCategory::Direct => &[(Persona::BuyNow, 1)],
            ReferrerCategory::Other => &[],
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-derive a referrer category from a traffic-source-like value
/// (e.g. utm_source). Precedence: search > social > email > direct.
pub fn classify_traffic_source(value: &str) -> ReferrerCategory {
    let contains_any = |fragments: &[&str]| fragments.iter().any(|f| value.contains(f));
    if contains_any(SOURCE_SEARCH) {
        ReferrerCategory::Search
    } else if contains_any(SOURCE_SOCIAL) {
        ReferrerCategory::Social
    } else if contains_any(SOURCE_EMAIL) {
        ReferrerCategory::Email
    } else {
        ReferrerCategory::Direct
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_compile() {
        let table = RuleTable::new();
        assert_eq!(table.rules.len(), 4);
    }

    #[test]
    fn test_single_persona_match() {
        let table = RuleTable::new();
        let hits = table.matches("ready to buy this monitor");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, Persona::BuyNow);
        assert_eq!(hits[0].1, "buy");
    }

    #[test]
    fn test_multi_persona_match() {
        let table = RuleTable::new();
        let hits = table.matches("best 4k monitor deal cheap");
        let personas: Vec<_> = hits.iter().map(|(p, _)| *p).collect();
        assert_eq!(personas, vec![Persona::Compare, Persona::Budget]);
    }

    #[test]
    fn test_word_boundaries() {
        let table = RuleTable::new();
        // "get" inside "gadget" must not match
        assert!(table.matches("gadget roundup").is_empty());
        assert_eq!(table.matches("get one now").len(), 1);
    }

    #[test]
    fn test_referrer_bonus_table() {
        assert_eq!(
            RuleTable::referrer_bonus(ReferrerCategory::Search),
            &[(Persona::BuyNow, 1), (Persona::Compare, 2)]
        );
        assert_eq!(
            RuleTable::referrer_bonus(ReferrerCategory::Social),
            &[(Persona::Gaming, 2)]
        );
        assert!(RuleTable::referrer_bonus(ReferrerCategory::Other).is_empty());
    }

    #[test]
    fn test_classify_traffic_source_precedence() {
        assert_eq!(classify_traffic_source("google"), ReferrerCategory::Search);
        assert_eq!(classify_traffic_source("reddit"), ReferrerCategory::Social);
        assert_eq!(
            classify_traffic_source("spring_newsletter"),
            ReferrerCategory::Email
        );
        assert_eq!(classify_traffic_source("flyer"), ReferrerCategory::Direct);
        // search wins over email when both fragments appear
        assert_eq!(
            classify_traffic_source("gmail.google.com"),
            ReferrerCategory::Search
        );
    }
}
