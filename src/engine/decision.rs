//! Decision — the engine's output record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persona::Persona;
use crate::signal::Signal;

/// Confidence reported for a forced persona override.
pub const CONFIDENCE_OVERRIDE: u8 = 99;

/// Confidence reported when no signal scored (fallback persona).
pub const CONFIDENCE_FALLBACK: u8 = 60;

/// Confidence reported for an operator preview selection.
pub const CONFIDENCE_PREVIEW: u8 = 97;

/// Base and per-point slope of the scored-confidence formula.
const CONFIDENCE_BASE: i64 = 65;
const CONFIDENCE_PER_POINT: i64 = 7;

// ─────────────────────────────────────────────────────────────────
// Decision
// ─────────────────────────────────────────────────────────────────

/// One complete decision: the winning persona plus the full audit trail
/// that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// The persona to render.
    pub persona: Persona,

    /// Confidence percentage, capped at 99.
    pub confidence: u8,

    /// Human-readable reason trail, in scoring order.
    pub reasons: Vec<String>,

    /// Final score per persona.
    pub scores: BTreeMap<Persona, i64>,

    /// The signals the decision was made from.
    pub signals: Vec<Signal>,

    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}

impl Decision {
    /// A forced decision from an explicit persona override.
    pub fn forced(persona: Persona, signals: Vec<Signal>) -> Self {
        Self {
            persona,
            confidence: CONFIDENCE_OVERRIDE,
            reasons: vec![format!(
                "Persona override: \"{}\" from URL parameter",
                persona.slug()
            )],
            scores: zero_scores(),
            signals,
            timestamp: Utc::now(),
        }
    }

    /// A decision produced by signal scoring. Confidence scales with the
    /// winning score and saturates one point below the override level.
    pub fn scored(
        persona: Persona,
        top_score: i64,
        reasons: Vec<String>,
        scores: BTreeMap<Persona, i64>,
        signals: Vec<Signal>,
    ) -> Self {
        let confidence = (CONFIDENCE_BASE + CONFIDENCE_PER_POINT * top_score)
            .min(CONFIDENCE_OVERRIDE as i64) as u8;
        Self {
            persona,
            confidence,
            reasons,
            scores,
            signals,
            timestamp: Utc::now(),
        }
    }

    /// The fallback decision when nothing scored.
    pub fn fallback(persona: Persona, signals: Vec<Signal>) -> Self {
        Self {
            persona,
            confidence: CONFIDENCE_FALLBACK,
            reasons: vec!["No intent signals detected; showing default variant".to_string()],
            scores: zero_scores(),
            signals,
            timestamp: Utc::now(),
        }
    }

    /// A manual operator selection (preview mode). No signals involved.
    pub fn preview(persona: Persona) -> Self {
        Self {
            persona,
            confidence: CONFIDENCE_PREVIEW,
            reasons: vec![format!("Manual preview: \"{}\"", persona.slug())],
            scores: zero_scores(),
            signals: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// One-line summary of the reason trail.
    pub fn summary(&self) -> String {
        format!("{}.", self.reasons.join("; "))
    }
}

fn zero_scores() -> BTreeMap<Persona, i64> {
    Persona::all().iter().map(|p| (*p, 0)).collect()
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
