//! Hero markup assembly.
//!
//! Builds the full hero section markup for a template, plus a render sink
//! that writes it to a file for embedding or inspection.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, warn};

use crate::engine::Decision;
use crate::error::{Error, Result};
use crate::persona::{asset_url, Extra, HeroTemplate, Persona};

use super::traits::RenderSink;

// ─────────────────────────────────────────────────────────────────
// Markup Assembly
// ─────────────────────────────────────────────────────────────────

/// Build the complete hero section markup for a persona's template.
pub fn build_hero_html(persona: Persona, template: &HeroTemplate) -> String {
    let image = asset_url(&template.image_key).unwrap_or_default();

    format!(
        r#"<div class="pw-hero pw-theme-{theme}" data-intent="{intent}" data-template="{slug}" role="banner" aria-label="Personalized hero section">
  <div class="pw-hero-content">
    <div class="pw-badge" aria-label="Badge: {badge_text}">{badge_icon} {badge_text}</div>
    <h1 class="pw-headline">{headline}</h1>
    <p class="pw-subheadline">{subheadline}</p>
{extras}{cta_row}
  </div>
  <div class="pw-hero-media">
    <img src="{image}" alt="{headline}" class="pw-hero-img" loading="lazy">
  </div>
</div>"#,
        theme = template.theme.slug(),
        intent = persona.slug().to_uppercase(),
        slug = persona.slug(),
        badge_text = template.badge.text,
        badge_icon = template.badge.icon,
        headline = template.headline,
        subheadline = template.subheadline,
        extras = render_extras(template),
        cta_row = render_cta_row(template),
        image = image,
    )
}

/// Markup shown while the engine is analyzing.
pub fn build_shimmer_html() -> String {
    r#"<div class="pw-shimmer">
  <div class="pw-shimmer-brain">🧠</div>
  <div class="pw-shimmer-text">PersonaWeb AI analyzing visitor…</div>
  <div class="pw-shimmer-bars">
    <div class="pw-shimmer-bar"></div>
    <div class="pw-shimmer-bar pw-shimmer-bar-s"></div>
  </div>
  <div class="pw-shimmer-progress"><div class="pw-shimmer-progress-fill"></div></div>
</div>"#
        .to_string()
}

fn render_extras(template: &HeroTemplate) -> String {
    let mut out = String::new();
    for extra in &template.extras {
        let block = match extra {
            Extra::SpecCards => {
                r#"    <div class="pw-specs">
      <div class="pw-spec"><strong>32″</strong><span>Display</span></div>
      <div class="pw-spec"><strong>4K</strong><span>Resolution</span></div>
      <div class="pw-spec"><strong>1ms</strong><span>Response</span></div>
      <div class="pw-spec"><strong>HDR</strong><span>1400 nits</span></div>
    </div>
    <div class="pw-compare-price">From <strong>$1,199</strong> · Compare at $1,599</div>
"#
            }
            // Rendered next to the CTA, not in the extras column
            Extra::FpsBadge => "",
            Extra::Countdown => {
                "    <div class=\"pw-countdown\">⏰ Ends in <span id=\"pw-timer\">23:59:59</span></div>\n"
            }
            Extra::Scarcity => {
                "    <div class=\"pw-scarcity\">⚠️ Only <strong>3 left</strong> at this price</div>\n"
            }
            Extra::TrustBadges => {
                r#"    <div class="pw-trust">
      <span>🚚 Free Shipping</span>
      <span>↩️ 30-Day Returns</span>
      <span>🛡️ 2-Year Warranty</span>
    </div>
"#
            }
        };
        out.push_str(block);
    }
    out
}

fn render_cta_row(template: &HeroTemplate) -> String {
    let cta = format!(
        r#"    <button class="pw-cta pw-cta-{theme}" aria-label="{text}">{icon} {text}</button>"#,
        theme = template.theme.slug(),
        text = template.cta.text,
        icon = template.cta.icon,
    );
    if template.has_extra(Extra::FpsBadge) {
        format!(
            "    <div class=\"pw-cta-row\">\n{}\n    <div class=\"pw-fps\"><span class=\"pw-fps-num\">240</span><span class=\"pw-fps-label\">FPS READY</span></div>\n    </div>",
            cta
        )
    } else {
        cta
    }
}

// ─────────────────────────────────────────────────────────────────
// File Sink
// ─────────────────────────────────────────────────────────────────

/// Writes the current hero markup to a file on every transition.
pub struct HtmlRenderSink {
    path: PathBuf,
}

impl HtmlRenderSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn write(&self, content: &str) -> Result<()> {
        fs::write(&self.path, content)
            .await
            .map_err(|e| Error::IoWrite {
                path: self.path.clone(),
                source: e,
            })
    }
}

#[async_trait]
impl RenderSink for HtmlRenderSink {
    async fn announce_thinking(&self) {
        if let Err(e) = self.write(&build_shimmer_html()).await {
            warn!(error = %e, "Failed to write shimmer markup");
        }
    }

    async fn show(&self, decision: &Decision, template: &HeroTemplate) -> Result<()> {
        let html = build_hero_html(decision.persona, template);
        self.write(&html).await?;
        debug!(path = %self.path.display(), persona = %decision.persona, "Hero markup written");
        Ok(())
    }

    async fn show_degraded(&self, template: &HeroTemplate) {
        // Static variant with no personalization attributes, offering a
        // reload as the recovery path
        let html = format!(
            "<div class=\"pw-hero pw-theme-{}\" role=\"banner\">\n  <h1 class=\"pw-headline\">{}</h1>\n  <p class=\"pw-degraded\">Personalization unavailable. <a href=\"javascript:location.reload()\">Reload</a> to retry.</p>\n</div>",
            template.theme.slug(),
            template.headline
        );
        if let Err(e) = self.write(&html).await {
            warn!(error = %e, "Failed to write degraded markup");
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::TemplateRegistry;

    #[test]
    fn test_hero_markup_carries_persona_attributes() {
        let registry = TemplateRegistry::load().unwrap();
        let html = build_hero_html(Persona::Gaming, registry.get(Persona::Gaming));

        assert!(html.contains("data-intent=\"GAMING\""));
        assert!(html.contains("data-template=\"gaming\""));
        assert!(html.contains("pw-theme-dark"));
        assert!(html.contains("FPS READY"));
    }

    #[test]
    fn test_budget_markup_has_countdown_and_scarcity() {
        let registry = TemplateRegistry::load().unwrap();
        let html = build_hero_html(Persona::Budget, registry.get(Persona::Budget));

        assert!(html.contains("pw-countdown"));
        assert!(html.contains("23:59:59"));
        assert!(html.contains("pw-scarcity"));
        assert!(!html.contains("FPS READY"));
    }

    #[test]
    fn test_compare_markup_has_spec_cards() {
        let registry = TemplateRegistry::load().unwrap();
        let html = build_hero_html(Persona::Compare, registry.get(Persona::Compare));

        assert!(html.contains("pw-specs"));
        assert!(html.contains("Compare at $1,599"));
    }

    #[tokio::test]
    async fn test_file_sink_writes_markup() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hero.html");
        let sink = HtmlRenderSink::new(&path);

        let registry = TemplateRegistry::load().unwrap();
        let decision = Decision::preview(Persona::BuyNow);
        sink.show(&decision, registry.get(Persona::BuyNow))
            .await
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("data-template=\"buy_now\""));
    }
}
