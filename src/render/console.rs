//! Terminal render sink.
//!
//! Draws each hero variant as a boxed banner on stdout. The flash-sale
//! countdown runs as a background task whose remaining time persists
//! across template switches, matching a timer that keeps ticking while
//! other variants are shown.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::engine::Decision;
use crate::error::Result;
use crate::persona::{Extra, HeroTemplate};

use super::traits::RenderSink;

/// Initial countdown value: 23:59:59.
const COUNTDOWN_START_SECS: i64 = 23 * 3600 + 59 * 60 + 59;

/// Format remaining seconds as HH:MM:SS.
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

// ─────────────────────────────────────────────────────────────────
// Console Sink
// ─────────────────────────────────────────────────────────────────

/// Renders hero variants to stdout.
pub struct ConsoleRenderSink {
    // -1 means the countdown has never started
    countdown_remaining: Arc<AtomicI64>,
    countdown_task: Mutex<Option<JoinHandle<()>>>,
}

impl ConsoleRenderSink {
    pub fn new() -> Self {
        Self {
            countdown_remaining: Arc::new(AtomicI64::new(-1)),
            countdown_task: Mutex::new(None),
        }
    }

    fn stop_countdown(&self) {
        if let Some(task) = self.countdown_task.lock().take() {
            task.abort();
        }
    }

    /// Start (or resume) the flash-sale countdown. The remaining time is
    /// kept when the timer restarts after showing another variant.
    fn start_countdown(&self) {
        self.stop_countdown();

        if self.countdown_remaining.load(Ordering::Relaxed) < 0 {
            self.countdown_remaining
                .store(COUNTDOWN_START_SECS, Ordering::Relaxed);
        }

        let remaining = Arc::clone(&self.countdown_remaining);
        let task = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if remaining.fetch_sub(1, Ordering::Relaxed) <= 0 {
                    break;
                }
            }
        });
        *self.countdown_task.lock() = Some(task);
    }
}

impl Default for ConsoleRenderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConsoleRenderSink {
    fn drop(&mut self) {
        self.stop_countdown();
    }
}

#[async_trait]
impl RenderSink for ConsoleRenderSink {
    async fn announce_thinking(&self) {
        println!("\n  🧠 PersonaWeb AI analyzing visitor…");
    }

    async fn show(&self, decision: &Decision, template: &HeroTemplate) -> Result<()> {
        let width = 64;
        let rule = "─".repeat(width);

        println!("\n  ┌{}┐", rule);
        println!(
            "  │ {} {}  [{}]  confidence {}%",
            template.badge.icon,
            template.badge.text,
            decision.persona.slug().to_uppercase(),
            decision.confidence
        );
        println!("  │");
        println!("  │ {}", template.headline);
        println!("  │ {}", template.subheadline);

        for extra in &template.extras {
            match extra {
                Extra::SpecCards => {
                    println!("  │   32″ Display · 4K Resolution · 1ms Response · HDR 1400 nits");
                    println!("  │   From $1,199 · Compare at $1,599");
                }
                Extra::FpsBadge => println!("  │   [ 240 FPS READY ]"),
                Extra::Countdown => {
                    let remaining = self.countdown_remaining.load(Ordering::Relaxed);
                    let shown = if remaining < 0 {
                        COUNTDOWN_START_SECS
                    } else {
                        remaining
                    };
                    println!("  │   ⏰ Ends in {}", format_countdown(shown));
                }
                Extra::Scarcity => println!("  │   ⚠️  Only 3 left at this price"),
                Extra::TrustBadges => {
                    println!("  │   🚚 Free Shipping · ↩️ 30-Day Returns · 🛡️ 2-Year Warranty")
                }
            }
        }

        println!("  │");
        println!("  │   [ {} {} ]", template.cta.icon, template.cta.text);
        println!("  │");
        println!("  │ why: {}", decision.summary());
        println!("  └{}┘", rule);

        if template.has_extra(Extra::Countdown) {
            self.start_countdown();
        } else {
            self.stop_countdown();
        }

        Ok(())
    }

    async fn show_degraded(&self, template: &HeroTemplate) {
        self.stop_countdown();
        println!("\n  {} (static variant)", template.headline);
        println!("  Something went wrong while personalizing; re-select a persona to retry.");
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
