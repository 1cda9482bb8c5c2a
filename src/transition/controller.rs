//! Transition controller — single-flight hero swaps.
//!
//! All paths that change the visible variant (initial decision, manual
//! preview, auto-cycle) funnel through this controller. At most one
//! transition runs at a time; a request arriving while one is in flight
//! is dropped, never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::RwLock;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::TimingSettings;
use crate::engine::{Decision, DecisionEngine};
use crate::persona::{Persona, TemplateRegistry};
use crate::render::SharedRenderSink;
use crate::session::SharedSessionStore;
use crate::signal::SignalCollector;
use crate::telemetry::SharedTelemetry;

// ─────────────────────────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────────────────────────

/// How a transition request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The variant was rendered and is now current.
    Completed(Persona),

    /// The requested persona is already showing; nothing happened.
    Unchanged,

    /// Another transition was in flight; this request was discarded.
    Dropped,

    /// Rendering failed and the static fallback was shown instead.
    Degraded,
}

/// Clears the busy flag when a transition ends, on every path out.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ─────────────────────────────────────────────────────────────────
// Transition Controller
// ─────────────────────────────────────────────────────────────────

/// Owns the decision pipeline and the currently shown persona.
pub struct TransitionController {
    collector: SignalCollector,
    engine: DecisionEngine,
    registry: TemplateRegistry,
    render: SharedRenderSink,
    telemetry: SharedTelemetry,
    session: SharedSessionStore,
    timing: TimingSettings,
    fallback: Persona,
    busy: AtomicBool,
    current: RwLock<Option<Persona>>,
    last_decision: RwLock<Option<Decision>>,
}

impl TransitionController {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        collector: SignalCollector,
        engine: DecisionEngine,
        registry: TemplateRegistry,
        render: SharedRenderSink,
        telemetry: SharedTelemetry,
        session: SharedSessionStore,
        timing: TimingSettings,
        fallback: Persona,
    ) -> Self {
        Self {
            collector,
            engine,
            registry,
            render,
            telemetry,
            session,
            timing,
            fallback,
            busy: AtomicBool::new(false),
            current: RwLock::new(None),
            last_decision: RwLock::new(None),
        }
    }

    /// Whether a transition is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// The persona currently showing, if any.
    pub fn current(&self) -> Option<Persona> {
        *self.current.read()
    }

    /// The configured fallback persona.
    pub fn fallback(&self) -> Persona {
        self.fallback
    }

    /// The most recent completed decision.
    pub fn last_decision(&self) -> Option<Decision> {
        self.last_decision.read().clone()
    }

    /// Collect signals, decide, and show the winning variant.
    pub async fn evaluate(&self) -> TransitionOutcome {
        if self.busy.swap(true, Ordering::SeqCst) {
            debug!("Transition in flight, dropping evaluate request");
            return TransitionOutcome::Dropped;
        }
        let _guard = BusyGuard(&self.busy);

        self.render.announce_thinking().await;
        tokio::time::sleep(self.timing.shimmer()).await;

        let started = Instant::now();
        let signals = self.collector.collect();
        let collect_ms = started.elapsed().as_millis() as u64;

        let started = Instant::now();
        let decision = self.engine.decide(signals).await;
        debug!(
            collect_ms,
            decide_ms = started.elapsed().as_millis() as u64,
            persona = %decision.persona,
            confidence = decision.confidence,
            "Decision resolved"
        );

        self.complete(decision).await
    }

    /// Manually show a persona (operator preview). Skips the decision
    /// pipeline entirely.
    pub async fn select(&self, persona: Persona) -> TransitionOutcome {
        if self.current() == Some(persona) {
            debug!(persona = %persona, "Already showing requested persona");
            return TransitionOutcome::Unchanged;
        }
        if self.busy.swap(true, Ordering::SeqCst) {
            debug!(persona = %persona, "Transition in flight, dropping select request");
            return TransitionOutcome::Dropped;
        }
        let _guard = BusyGuard(&self.busy);

        self.render.announce_thinking().await;
        tokio::time::sleep(self.timing.shimmer()).await;

        self.complete(Decision::preview(persona)).await
    }

    /// Clear the session and the current persona. An in-flight transition
    /// is left to finish on its own.
    pub fn reset(&self) {
        self.session.clear();
        *self.current.write() = None;
        *self.last_decision.write() = None;
        self.telemetry.track("reset", json!({}));
        debug!("Session and current persona cleared");
    }

    /// Shared tail of every transition: fade, render, persist, track.
    async fn complete(&self, decision: Decision) -> TransitionOutcome {
        let template = self.registry.get(decision.persona);
        tokio::time::sleep(self.timing.fade()).await;

        match self.render.show(&decision, template).await {
            Ok(()) => {
                let persona = decision.persona;
                *self.current.write() = Some(persona);
                self.session.set(persona.slug());
                self.telemetry.track(
                    "template_shown",
                    json!({
                        "persona": persona.slug(),
                        "confidence": decision.confidence,
                    }),
                );
                *self.last_decision.write() = Some(decision);
                TransitionOutcome::Completed(persona)
            }
            Err(e) => {
                warn!(error = %e, "Render failed, showing static fallback");
                self.render
                    .show_degraded(self.registry.get(self.fallback))
                    .await;
                self.telemetry
                    .track("render_degraded", json!({ "error": e.to_string() }));
                TransitionOutcome::Degraded
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::render::{MockRenderSink, RenderCall};
    use crate::session::{MemorySessionStore, SessionStore};
    use crate::signal::StaticEnvironment;
    use crate::telemetry::MemoryTelemetry;

    fn controller_with(
        env: StaticEnvironment,
        timing: TimingSettings,
    ) -> (
        Arc<TransitionController>,
        Arc<MockRenderSink>,
        Arc<MemoryTelemetry>,
        Arc<MemorySessionStore>,
    ) {
        let render = Arc::new(MockRenderSink::new());
        let telemetry = Arc::new(MemoryTelemetry::new());
        let session = Arc::new(MemorySessionStore::new());

        let collector = SignalCollector::new(Arc::new(env), session.clone());
        let engine = DecisionEngine::new(Persona::BuyNow);
        let registry = TemplateRegistry::load().unwrap();

        let controller = Arc::new(TransitionController::new(
            collector,
            engine,
            registry,
            render.clone(),
            telemetry.clone(),
            session.clone(),
            timing,
            Persona::BuyNow,
        ));
        (controller, render, telemetry, session)
    }

    #[tokio::test]
    async fn test_evaluate_shows_decided_persona() {
        let env = StaticEnvironment::new().with_url("https://shop.example/?persona=gaming");
        let (controller, render, telemetry, session) =
            controller_with(env, TimingSettings::instant());

        let outcome = controller.evaluate().await;
        assert_eq!(outcome, TransitionOutcome::Completed(Persona::Gaming));
        assert_eq!(controller.current(), Some(Persona::Gaming));
        assert_eq!(session.get().as_deref(), Some("gaming"));
        assert!(!controller.is_busy());

        assert_eq!(
            render.calls(),
            vec![
                RenderCall::Thinking,
                RenderCall::Shown {
                    persona: Persona::Gaming,
                    confidence: 99
                }
            ]
        );
        assert_eq!(telemetry.event_names(), vec!["template_shown"]);
    }

    #[tokio::test]
    async fn test_select_same_persona_is_unchanged() {
        let (controller, render, _, _) =
            controller_with(StaticEnvironment::new(), TimingSettings::instant());

        assert_eq!(
            controller.select(Persona::Compare).await,
            TransitionOutcome::Completed(Persona::Compare)
        );
        let calls_before = render.calls().len();

        assert_eq!(
            controller.select(Persona::Compare).await,
            TransitionOutcome::Unchanged
        );
        assert_eq!(render.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_concurrent_request_is_dropped() {
        let timing = TimingSettings {
            shimmer_ms: 100,
            fade_ms: 0,
            cycle_ms: 10,
        };
        let (controller, render, _, _) = controller_with(StaticEnvironment::new(), timing);

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.select(Persona::Gaming).await })
        };
        // Let the first transition enter its shimmer phase
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(controller.is_busy());

        assert_eq!(
            controller.select(Persona::Budget).await,
            TransitionOutcome::Dropped
        );

        assert_eq!(
            first.await.unwrap(),
            TransitionOutcome::Completed(Persona::Gaming)
        );
        assert_eq!(controller.current(), Some(Persona::Gaming));
        assert_eq!(render.shown_personas(), vec![Persona::Gaming]);
    }

    #[tokio::test]
    async fn test_render_failure_degrades_and_clears_busy() {
        let (controller, render, telemetry, session) =
            controller_with(StaticEnvironment::new(), TimingSettings::instant());
        render.set_failing(true);

        let outcome = controller.select(Persona::Gaming).await;
        assert_eq!(outcome, TransitionOutcome::Degraded);
        assert!(!controller.is_busy());
        assert_eq!(controller.current(), None);
        assert!(session.get().is_none());
        assert!(render.calls().contains(&RenderCall::Degraded));
        assert_eq!(telemetry.event_names(), vec!["render_degraded"]);

        // Controller is usable again once the sink recovers
        render.set_failing(false);
        assert_eq!(
            controller.select(Persona::Gaming).await,
            TransitionOutcome::Completed(Persona::Gaming)
        );
    }

    #[tokio::test]
    async fn test_reset_clears_session_and_current() {
        let (controller, _, telemetry, session) =
            controller_with(StaticEnvironment::new(), TimingSettings::instant());

        controller.select(Persona::Budget).await;
        assert_eq!(session.get().as_deref(), Some("budget"));

        controller.reset();
        assert_eq!(controller.current(), None);
        assert!(session.get().is_none());
        assert!(controller.last_decision().is_none());
        assert!(telemetry.event_names().contains(&"reset".to_string()));
    }

    #[tokio::test]
    async fn test_evaluate_direct_visit() {
        // An empty environment still yields the direct-referrer signal,
        // whose bonus lands on the buy_now persona
        let (controller, _, _, _) =
            controller_with(StaticEnvironment::new(), TimingSettings::instant());

        let outcome = controller.evaluate().await;
        assert_eq!(outcome, TransitionOutcome::Completed(Persona::BuyNow));
        let decision = controller.last_decision().unwrap();
        assert_eq!(decision.confidence, 72);
    }
}
