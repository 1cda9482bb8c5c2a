//! Signal collector
//!
//! Pulls raw observations from the page environment and session store.
//! Extraction only; no scoring. Never fails: unreadable sources simply
//! contribute no signal.

use std::sync::Arc;

use tracing::trace;
use url::Url;

use crate::session::SharedSessionStore;

use super::environment::PageEnvironment;
use super::types::{
    ReferrerCategory, Signal, WEIGHT_PERSONA_OVERRIDE, WEIGHT_REFERRER_KNOWN,
    WEIGHT_REFERRER_OTHER, WEIGHT_URL_PARAM,
};

/// URL parameters the collector recognizes, in reason-trail order.
const RECOGNIZED_PARAMS: &[&str] = &[
    "utm_source",
    "utm_term",
    "utm_campaign",
    "utm_medium",
    "query",
    "ref",
    "persona",
];

/// Referrer host fragments, tested in precedence order.
const SEARCH_HOSTS: &[&str] = &["google", "bing", "duckduckgo", "yahoo"];
const SOCIAL_HOSTS: &[&str] = &["reddit", "twitter", "x.com", "facebook", "instagram", "tiktok"];
const EMAIL_HOSTS: &[&str] = &["mail", "outlook", "gmail"];

// ─────────────────────────────────────────────────────────────────
// Signal Collector
// ─────────────────────────────────────────────────────────────────

/// Gathers the full signal sequence for one decision cycle.
pub struct SignalCollector {
    env: Arc<dyn PageEnvironment>,
    session: SharedSessionStore,
}

impl SignalCollector {
    pub fn new(env: Arc<dyn PageEnvironment>, session: SharedSessionStore) -> Self {
        Self { env, session }
    }

    /// Collect all signals, in order: URL parameters, referrer category,
    /// page context, session continuity. The order only affects the
    /// human-readable reason trail, not the score.
    pub fn collect(&self) -> Vec<Signal> {
        let mut signals = Vec::new();
        signals.extend(self.from_url());
        signals.extend(self.from_referrer());
        signals.extend(self.from_page());
        signals.extend(self.from_session());
        trace!(count = signals.len(), "Signals collected");
        signals
    }

    /// URL parameters: at most one signal per recognized parameter name.
    /// The explicit `persona` parameter carries the override weight.
    fn from_url(&self) -> Vec<Signal> {
        let Some(raw) = self.env.page_url() else {
            return Vec::new();
        };
        let Ok(parsed) = Url::parse(&raw) else {
            trace!(url = %raw, "Page URL did not parse, skipping URL signals");
            return Vec::new();
        };

        let mut out = Vec::new();
        for key in RECOGNIZED_PARAMS {
            let value = parsed
                .query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned());
            if let Some(value) = value {
                if value.is_empty() {
                    continue;
                }
                let weight = if *key == "persona" {
                    WEIGHT_PERSONA_OVERRIDE
                } else {
                    WEIGHT_URL_PARAM
                };
                out.push(Signal::url(*key, value, weight));
            }
        }
        out
    }

    /// Referrer category: exactly one signal, defaulting to "direct".
    fn from_referrer(&self) -> Vec<Signal> {
        let referrer = self
            .env
            .referrer()
            .map(|r| r.to_lowercase())
            .unwrap_or_default();

        if referrer.is_empty() {
            return vec![Signal::referrer(
                ReferrerCategory::Direct.as_str(),
                WEIGHT_REFERRER_OTHER,
            )];
        }

        let category = classify_referrer(&referrer);
        let weight = match category {
            ReferrerCategory::Search | ReferrerCategory::Social | ReferrerCategory::Email => {
                WEIGHT_REFERRER_KNOWN
            }
            _ => WEIGHT_REFERRER_OTHER,
        };
        vec![Signal::referrer(category.as_str(), weight)]
    }

    /// Page context: title, meta description, first heading, and path,
    /// joined and lower-cased.
    fn from_page(&self) -> Vec<Signal> {
        let path = self
            .env
            .page_url()
            .and_then(|raw| Url::parse(&raw).ok().map(|u| u.path().to_string()))
            .unwrap_or_default();

        let text = [
            self.env.page_title().unwrap_or_default(),
            self.env.meta_description().unwrap_or_default(),
            self.env.first_heading().unwrap_or_default(),
            path,
        ]
        .join(" ")
        .to_lowercase();

        vec![Signal::page(text)]
    }

    /// Session continuity: zero or one signal, present only when a valid
    /// persona id was stored previously.
    fn from_session(&self) -> Vec<Signal> {
        match self.session.get() {
            Some(stored) if stored.parse::<crate::persona::Persona>().is_ok() => {
                vec![Signal::session(stored)]
            }
            _ => Vec::new(),
        }
    }
}

/// Categorize a referrer URL. Precedence: search > social > email > other.
pub fn classify_referrer(referrer: &str) -> ReferrerCategory {
    let contains_any = |hosts: &[&str]| hosts.iter().any(|h| referrer.contains(h));
    if contains_any(SEARCH_HOSTS) {
        ReferrerCategory::Search
    } else if contains_any(SOCIAL_HOSTS) {
        ReferrerCategory::Social
    } else if contains_any(EMAIL_HOSTS) {
        ReferrerCategory::Email
    } else {
        ReferrerCategory::Other
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
