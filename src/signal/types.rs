//! Signal types — weighted observations about the current visitor.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Signal Weights
// ─────────────────────────────────────────────────────────────────

/// Weight of an explicit `persona` URL parameter (the forced override).
pub const WEIGHT_PERSONA_OVERRIDE: i64 = 10;

/// Weight of an ordinary recognized URL parameter.
pub const WEIGHT_URL_PARAM: i64 = 3;

/// Weight of a session-persisted persona choice.
pub const WEIGHT_SESSION: i64 = 5;

/// Weight of a categorized referrer (search, social, email).
pub const WEIGHT_REFERRER_KNOWN: i64 = 2;

/// Weight of a direct or uncategorized referrer.
pub const WEIGHT_REFERRER_OTHER: i64 = 1;

/// Weight of the page context signal.
pub const WEIGHT_PAGE_CONTEXT: i64 = 1;

// ─────────────────────────────────────────────────────────────────
// Signal
// ─────────────────────────────────────────────────────────────────

/// Where a signal was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    /// URL query parameter.
    Url,
    /// Referrer category.
    Referrer,
    /// Page text context.
    Page,
    /// Session-persisted prior choice.
    Session,
}

impl fmt::Display for SignalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalSource::Url => "url",
            SignalSource::Referrer => "referrer",
            SignalSource::Page => "page",
            SignalSource::Session => "session",
        };
        write!(f, "{}", s)
    }
}

/// One weighted observation about the current visitor or page.
///
/// Produced fresh for each decision cycle and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Where the signal was observed.
    pub source: SignalSource,

    /// Observation name (e.g. "utm_term", "type", "context", "persona").
    pub key: String,

    /// Raw observed value.
    pub value: String,

    /// Contribution added to a persona's score on a rule match.
    pub weight: i64,
}

impl Signal {
    pub fn new(
        source: SignalSource,
        key: impl Into<String>,
        value: impl Into<String>,
        weight: i64,
    ) -> Self {
        Self {
            source,
            key: key.into(),
            value: value.into(),
            weight,
        }
    }

    /// Shorthand for a URL-parameter signal.
    pub fn url(key: impl Into<String>, value: impl Into<String>, weight: i64) -> Self {
        Self::new(SignalSource::Url, key, value, weight)
    }

    /// Shorthand for a referrer-category signal.
    pub fn referrer(value: impl Into<String>, weight: i64) -> Self {
        Self::new(SignalSource::Referrer, "type", value, weight)
    }

    /// Shorthand for the page-context signal.
    pub fn page(value: impl Into<String>) -> Self {
        Self::new(SignalSource::Page, "context", value, WEIGHT_PAGE_CONTEXT)
    }

    /// Shorthand for the session-persisted persona signal.
    pub fn session(value: impl Into<String>) -> Self {
        Self::new(SignalSource::Session, "persona", value, WEIGHT_SESSION)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: {} (w:{})",
            self.source, self.key, self.value, self.weight
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Referrer Category
// ─────────────────────────────────────────────────────────────────

/// Traffic category derived from the referrer or a traffic-source value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferrerCategory {
    Search,
    Social,
    Email,
    Direct,
    Other,
}

impl ReferrerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferrerCategory::Search => "search",
            ReferrerCategory::Social => "social",
            ReferrerCategory::Email => "email",
            ReferrerCategory::Direct => "direct",
            ReferrerCategory::Other => "other",
        }
    }

    /// Parse a category from a stored signal value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "search" => Some(ReferrerCategory::Search),
            "social" => Some(ReferrerCategory::Social),
            "email" => Some(ReferrerCategory::Email),
            "direct" => Some(ReferrerCategory::Direct),
            "other" => Some(ReferrerCategory::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ReferrerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
