//! Render sink seam
//!
//! The transition controller drives rendering through this trait so the
//! same sequencing works against a terminal, a file, or test doubles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::engine::Decision;
use crate::error::Result;
use crate::persona::HeroTemplate;

/// Renders hero variants. One sink instance per running engine.
#[async_trait]
pub trait RenderSink: Send + Sync {
    /// Replace the current content with the analyzing placeholder.
    async fn announce_thinking(&self);

    /// Render the decided variant. A failure here degrades the transition
    /// but never poisons the controller.
    async fn show(&self, decision: &Decision, template: &HeroTemplate) -> Result<()>;

    /// Best-effort static fallback after a render failure. Must not fail.
    async fn show_degraded(&self, template: &HeroTemplate);
}

/// Type alias for a shared render sink reference
pub type SharedRenderSink = Arc<dyn RenderSink>;
