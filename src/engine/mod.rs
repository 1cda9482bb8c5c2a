//! Decision engine — turns collected signals into a persona decision.
//!
//! The engine never fails: a remote delegate error, an unparseable value,
//! or an empty signal set all degrade to a lower-confidence local decision.

mod decision;
mod remote;
mod rules;

pub use decision::{
    Decision, CONFIDENCE_FALLBACK, CONFIDENCE_OVERRIDE, CONFIDENCE_PREVIEW,
};
pub use remote::RemoteDelegate;
pub use rules::{classify_traffic_source, RuleTable};

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::persona::Persona;
use crate::signal::{ReferrerCategory, Signal, SignalSource, WEIGHT_SESSION};

// ─────────────────────────────────────────────────────────────────
// Decision Engine
// ─────────────────────────────────────────────────────────────────

/// Scores signals against the rule table and picks the winning persona.
pub struct DecisionEngine {
    fallback: Persona,
    rules: RuleTable,
    remote: Option<RemoteDelegate>,
}

impl DecisionEngine {
    pub fn new(fallback: Persona) -> Self {
        Self {
            fallback,
            rules: RuleTable::new(),
            remote: None,
        }
    }

    /// Attach a remote delegate. The delegate is consulted first on every
    /// decision; local scoring remains the authority when it fails.
    pub fn with_remote(mut self, remote: RemoteDelegate) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Produce a decision from the collected signals. Infallible: every
    /// failure path lands on a valid persona.
    pub async fn decide(&self, signals: Vec<Signal>) -> Decision {
        if let Some(ref remote) = self.remote {
            match remote.decide(&signals).await {
                Ok(decision) => return decision,
                Err(e) => {
                    warn!(error = %e, "Remote decision failed, scoring locally");
                }
            }
        }
        self.decide_local(signals)
    }

    /// Local scoring path, also used directly by the one-shot CLI when no
    /// remote endpoint is configured.
    pub fn decide_local(&self, signals: Vec<Signal>) -> Decision {
        // Explicit override short-circuits scoring entirely.
        if let Some(forced) = forced_persona(&signals) {
            debug!(persona = %forced, "Persona forced by URL override");
            return Decision::forced(forced, signals);
        }

        let mut scores: BTreeMap<Persona, i64> =
            Persona::all().iter().map(|p| (*p, 0)).collect();
        let mut reasons = Vec::new();

        // Session continuity: a strong bonus for the previously chosen
        // persona, applied before per-signal scoring.
        let session = signals
            .iter()
            .find(|s| s.source == SignalSource::Session && s.key == "persona");
        if let Some(sig) = session {
            if let Ok(prior) = sig.value.parse::<Persona>() {
                *scores.entry(prior).or_insert(0) += WEIGHT_SESSION;
                reasons.push(format!(
                    "Session: continuing \"{}\" from previous page",
                    prior.slug()
                ));
            }
        }

        for signal in &signals {
            let text = signal.value.to_lowercase();

            // Content patterns run against every signal's value
            for (persona, fragment) in self.rules.matches(&text) {
                *scores.entry(persona).or_insert(0) += signal.weight;
                reasons.push(format!(
                    "{} contains \"{}\" -> {} (+{})",
                    signal.key,
                    fragment,
                    persona.slug(),
                    signal.weight
                ));
            }

            // Referrer bonus, from the explicit category signal or
            // re-derived from a traffic-source value
            let category = if signal.source == SignalSource::Referrer && signal.key == "type" {
                ReferrerCategory::parse(&signal.value)
            } else if signal.key == "utm_source" {
                Some(classify_traffic_source(&text))
            } else {
                None
            };
            if let Some(category) = category {
                let label = if signal.key == "utm_source" {
                    "utm_source"
                } else {
                    "referrer"
                };
                self.apply_bonus(label, category, &mut scores, &mut reasons);
            }
        }

        // First-declared persona wins ties, so only a strictly greater
        // score may displace the current winner.
        let mut winner = Persona::all()[0];
        let mut top = scores.get(&winner).copied().unwrap_or(0);
        for persona in &Persona::all()[1..] {
            let score = scores.get(persona).copied().unwrap_or(0);
            if score > top {
                winner = *persona;
                top = score;
            }
        }

        if top > 0 {
            debug!(persona = %winner, score = top, "Local scoring selected a persona");
            Decision::scored(winner, top, reasons, scores, signals)
        } else {
            debug!(fallback = %self.fallback, "No signal scored, using fallback persona");
            Decision::fallback(self.fallback, signals)
        }
    }

    fn apply_bonus(
        &self,
        label: &str,
        category: ReferrerCategory,
        scores: &mut BTreeMap<Persona, i64>,
        reasons: &mut Vec<String>,
    ) {
        for (persona, bonus) in RuleTable::referrer_bonus(category) {
            *scores.entry(*persona).or_insert(0) += bonus;
            reasons.push(format!(
                "{} -> {} -> {} (+{})",
                label,
                category,
                persona.slug(),
                bonus
            ));
        }
    }
}

/// Extract a valid forced persona from the URL signals, if present.
fn forced_persona(signals: &[Signal]) -> Option<Persona> {
    signals
        .iter()
        .find(|s| s.source == SignalSource::Url && s.key == "persona")
        .and_then(|s| s.value.parse().ok())
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{
        WEIGHT_PERSONA_OVERRIDE, WEIGHT_REFERRER_KNOWN, WEIGHT_REFERRER_OTHER, WEIGHT_URL_PARAM,
    };

    fn engine() -> DecisionEngine {
        DecisionEngine::new(Persona::BuyNow)
    }

    #[test]
    fn test_forced_override_wins() {
        let signals = vec![
            Signal::url("persona", "gaming", WEIGHT_PERSONA_OVERRIDE),
            Signal::url("utm_term", "buy buy buy", WEIGHT_URL_PARAM),
        ];
        let d = engine().decide_local(signals);
        assert_eq!(d.persona, Persona::Gaming);
        assert_eq!(d.confidence, 99);
        assert_eq!(
            d.summary(),
            "Persona override: \"gaming\" from URL parameter."
        );
    }

    #[test]
    fn test_invalid_override_falls_through_to_scoring() {
        let signals = vec![
            Signal::url("persona", "whale", WEIGHT_PERSONA_OVERRIDE),
            Signal::url("utm_term", "compare monitors", WEIGHT_URL_PARAM),
        ];
        let d = engine().decide_local(signals);
        assert_eq!(d.persona, Persona::Compare);
        assert_ne!(d.confidence, 99);
    }

    #[test]
    fn test_empty_signals_fall_back() {
        let d = engine().decide_local(Vec::new());
        assert_eq!(d.persona, Persona::BuyNow);
        assert_eq!(d.confidence, 60);
        assert_eq!(
            d.summary(),
            "No intent signals detected; showing default variant."
        );
    }

    #[test]
    fn test_url_param_scoring() {
        let signals = vec![Signal::url("utm_term", "buy 4k monitor", WEIGHT_URL_PARAM)];
        let d = engine().decide_local(signals);
        assert_eq!(d.persona, Persona::BuyNow);
        // score 3 -> 65 + 7*3 = 86
        assert_eq!(d.confidence, 86);
        assert_eq!(d.reasons, vec!["utm_term contains \"buy\" -> buy_now (+3)"]);
        assert_eq!(d.scores[&Persona::BuyNow], 3);
    }

    #[test]
    fn test_tie_breaks_by_declaration_order() {
        // "best" hits compare, "deal" and "cheap" hit budget once (one match
        // per rule), so both score 1 from the page signal
        let signals = vec![Signal::page("best 4k monitor deal cheap")];
        let d = engine().decide_local(signals);
        assert_eq!(d.scores[&Persona::Compare], 1);
        assert_eq!(d.scores[&Persona::Budget], 1);
        assert_eq!(d.persona, Persona::Compare);
        assert_eq!(d.confidence, 72);
    }

    #[test]
    fn test_session_continuity_bonus() {
        let signals = vec![Signal::session("budget")];
        let d = engine().decide_local(signals);
        assert_eq!(d.persona, Persona::Budget);
        // +5 continuity bonus, +5 from the value matching the budget pattern
        assert_eq!(d.scores[&Persona::Budget], 10);
        assert_eq!(
            d.reasons,
            vec![
                "Session: continuing \"budget\" from previous page",
                "persona contains \"budget\" -> budget (+5)",
            ]
        );
    }

    #[test]
    fn test_direct_visit_gets_buy_now_bonus() {
        let signals = vec![Signal::referrer("direct", WEIGHT_REFERRER_OTHER)];
        let d = engine().decide_local(signals);
        assert_eq!(d.persona, Persona::BuyNow);
        assert_eq!(d.scores[&Persona::BuyNow], 1);
        assert_eq!(d.confidence, 72);
        assert_eq!(d.reasons, vec!["referrer -> direct -> buy_now (+1)"]);
    }

    #[test]
    fn test_referrer_bonus_applied() {
        let signals = vec![Signal::referrer("search", WEIGHT_REFERRER_KNOWN)];
        let d = engine().decide_local(signals);
        assert_eq!(d.scores[&Persona::BuyNow], 1);
        assert_eq!(d.scores[&Persona::Compare], 2);
        assert_eq!(d.persona, Persona::Compare);
        assert_eq!(
            d.reasons,
            vec![
                "referrer -> search -> buy_now (+1)",
                "referrer -> search -> compare (+2)",
            ]
        );
    }

    #[test]
    fn test_utm_source_rederives_category() {
        let signals = vec![
            Signal::url("utm_source", "Reddit", WEIGHT_URL_PARAM),
            Signal::referrer("other", WEIGHT_REFERRER_OTHER),
        ];
        let d = engine().decide_local(signals);
        assert_eq!(d.persona, Persona::Gaming);
        assert_eq!(d.scores[&Persona::Gaming], 2);
        assert!(d
            .reasons
            .contains(&"utm_source -> social -> gaming (+2)".to_string()));
    }

    #[test]
    fn test_combined_scenario() {
        // Session continuity (+5), search referrer (+1 buy_now, +2 compare),
        // page mentions "review" (+1), session value matches the compare
        // pattern (+5): compare totals 13
        let signals = vec![
            Signal::referrer("search", WEIGHT_REFERRER_KNOWN),
            Signal::page("voltedge 32 review /monitors"),
            Signal::session("compare"),
        ];
        let d = engine().decide_local(signals);
        assert_eq!(d.persona, Persona::Compare);
        assert_eq!(d.scores[&Persona::Compare], 13);
        // 65 + 7*13, capped at 99
        assert_eq!(d.confidence, 99);
        assert_eq!(d.reasons.len(), 5);
        assert_eq!(
            d.reasons[0],
            "Session: continuing \"compare\" from previous page"
        );
    }

    #[tokio::test]
    async fn test_decide_without_remote_matches_local() {
        let signals = vec![Signal::url("query", "cheap deal", WEIGHT_URL_PARAM)];
        let d = engine().decide(signals.clone()).await;
        let local = engine().decide_local(signals);
        assert_eq!(d.persona, local.persona);
        assert_eq!(d.persona, Persona::Budget);
    }

    #[tokio::test]
    async fn test_remote_failure_falls_back_to_local() {
        // Nothing listens on this port, so the delegate errors immediately
        let remote = RemoteDelegate::new(
            "http://127.0.0.1:1/decide",
            std::time::Duration::from_millis(250),
        );
        let engine = DecisionEngine::new(Persona::BuyNow).with_remote(remote);

        let signals = vec![Signal::url("query", "cheap deal", WEIGHT_URL_PARAM)];
        let d = engine.decide(signals.clone()).await;
        let local = engine.decide_local(signals);

        assert_eq!(d.persona, Persona::Budget);
        assert_eq!(d.confidence, local.confidence);
        assert_eq!(d.reasons, local.reasons);
    }
}
