//! Telemetry — fire-and-forget event tracking.
//!
//! Sinks must never fail and never block the decision path. The default
//! sink writes structured log lines; the in-memory sink backs the demo's
//! stats view and the test suite.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Cap on the in-memory event log. Oldest events are dropped first.
const EVENT_LOG_CAP: usize = 100;

// ─────────────────────────────────────────────────────────────────
// TelemetrySink Trait
// ─────────────────────────────────────────────────────────────────

/// Records engine events. Infallible by contract.
pub trait TelemetrySink: Send + Sync {
    /// Record one named event with a JSON payload.
    fn track(&self, event: &str, payload: Value);
}

/// Type alias for a shared telemetry sink reference
pub type SharedTelemetry = Arc<dyn TelemetrySink>;

/// One recorded event.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEvent {
    pub name: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────
// Log Sink
// ─────────────────────────────────────────────────────────────────

/// Writes each event as a structured log line.
#[derive(Debug, Default)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    fn track(&self, event: &str, payload: Value) {
        info!(event = %event, payload = %payload, "Telemetry");
    }
}

// ─────────────────────────────────────────────────────────────────
// Memory Sink
// ─────────────────────────────────────────────────────────────────

/// Keeps a capped event log plus per-persona CTA click counts.
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    events: RwLock<Vec<TelemetryEvent>>,
    cta_clicks: RwLock<std::collections::BTreeMap<String, u64>>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.read().clone()
    }

    /// Names of the recorded events, oldest first.
    pub fn event_names(&self) -> Vec<String> {
        self.events.read().iter().map(|e| e.name.clone()).collect()
    }

    /// CTA clicks per persona slug.
    pub fn cta_clicks(&self) -> std::collections::BTreeMap<String, u64> {
        self.cta_clicks.read().clone()
    }
}

impl TelemetrySink for MemoryTelemetry {
    fn track(&self, event: &str, payload: Value) {
        if event == "cta_click" {
            if let Some(persona) = payload.get("persona").and_then(|v| v.as_str()) {
                *self
                    .cta_clicks
                    .write()
                    .entry(persona.to_string())
                    .or_insert(0) += 1;
            }
        }

        let mut events = self.events.write();
        if events.len() >= EVENT_LOG_CAP {
            events.remove(0);
        }
        events.push(TelemetryEvent {
            name: event.to_string(),
            payload,
            timestamp: Utc::now(),
        });
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
