//! Auto-cycle scheduler — rotates through all personas on a timer.
//!
//! Each tick advances to the persona after the current one, wrapping
//! around. A tick that lands while a transition is in flight re-waits
//! without advancing, so the rotation never skips a variant. Stopping
//! only cancels the pending wait; a transition already running inside
//! a tick finishes on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::telemetry::SharedTelemetry;

use super::controller::TransitionController;

// ─────────────────────────────────────────────────────────────────
// Auto-Cycle
// ─────────────────────────────────────────────────────────────────

/// Timer-driven persona rotation on top of a transition controller.
pub struct AutoCycle {
    controller: Arc<TransitionController>,
    telemetry: SharedTelemetry,
    interval: Duration,
    running: AtomicBool,
    // The flag stored here belongs to the spawned tick loop; clearing it
    // stops the loop at its next wake without touching an in-flight tick
    task: Mutex<Option<(Arc<AtomicBool>, JoinHandle<()>)>>,
}

impl AutoCycle {
    pub fn new(
        controller: Arc<TransitionController>,
        telemetry: SharedTelemetry,
        interval: Duration,
    ) -> Self {
        Self {
            controller,
            telemetry,
            interval,
            running: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    /// Whether the cycle is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Flip the cycle on or off. Returns the new state.
    pub fn toggle(&self) -> bool {
        if self.is_running() {
            self.stop();
            false
        } else {
            self.start();
            true
        }
    }

    /// Start cycling. No-op when already running.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(interval_ms = self.interval.as_millis() as u64, "Auto-cycle started");
        self.telemetry.track("cycle_started", json!({}));

        let controller = Arc::clone(&self.controller);
        let active = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&active);
        let interval = self.interval;

        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if !flag.load(Ordering::SeqCst) {
                    break;
                }
                // A transition in flight means this tick re-waits rather
                // than advancing past a variant nobody saw
                if controller.is_busy() {
                    debug!("Cycle tick while transition in flight, re-waiting");
                    continue;
                }
                // Before anything has rendered, advance from the fallback
                let next = controller
                    .current()
                    .unwrap_or(controller.fallback())
                    .next();
                controller.select(next).await;
            }
        });
        *self.task.lock() = Some((active, task));
    }

    /// Stop cycling. No-op when already stopped. Signals the tick loop
    /// rather than aborting it: a transition already running inside a
    /// tick must complete its render and bookkeeping.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some((active, _task)) = self.task.lock().take() {
            active.store(false, Ordering::SeqCst);
        }
        info!("Auto-cycle stopped");
        self.telemetry.track("cycle_stopped", json!({}));
    }
}

impl Drop for AutoCycle {
    fn drop(&mut self) {
        if let Some((active, task)) = self.task.lock().take() {
            active.store(false, Ordering::SeqCst);
            task.abort();
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
