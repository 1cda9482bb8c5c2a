//! Recording render sink for tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::engine::Decision;
use crate::error::{Error, Result};
use crate::persona::{HeroTemplate, Persona};

use super::traits::RenderSink;

/// One recorded render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Thinking,
    Shown { persona: Persona, confidence: u8 },
    Degraded,
}

/// Render sink that records every call and can be told to fail.
#[derive(Debug, Default)]
pub struct MockRenderSink {
    calls: Mutex<Vec<RenderCall>>,
    fail_shows: AtomicBool,
}

impl MockRenderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `show` call fail.
    pub fn set_failing(&self, failing: bool) {
        self.fail_shows.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of the recorded calls, in order.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Personas shown so far, in order.
    pub fn shown_personas(&self) -> Vec<Persona> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                RenderCall::Shown { persona, .. } => Some(*persona),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl RenderSink for MockRenderSink {
    async fn announce_thinking(&self) {
        self.calls.lock().push(RenderCall::Thinking);
    }

    async fn show(&self, decision: &Decision, _template: &HeroTemplate) -> Result<()> {
        if self.fail_shows.load(Ordering::SeqCst) {
            return Err(Error::Render("mock sink told to fail".to_string()));
        }
        self.calls.lock().push(RenderCall::Shown {
            persona: decision.persona,
            confidence: decision.confidence,
        });
        Ok(())
    }

    async fn show_degraded(&self, _template: &HeroTemplate) {
        self.calls.lock().push(RenderCall::Degraded);
    }
}
