//! Hero template registry — bundled TOML variants for each persona.
//!
//! One template per persona, loaded at startup from configs embedded with
//! `include_str!`. The registry is immutable after load.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::types::Persona;

// ─────────────────────────────────────────────────────────────────
// Template Types
// ─────────────────────────────────────────────────────────────────

/// Visual theme applied to a hero variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Bold,
    Clean,
    Dark,
    Urgent,
}

impl Theme {
    /// CSS class suffix for this theme.
    pub fn slug(&self) -> &'static str {
        match self {
            Theme::Bold => "bold",
            Theme::Clean => "clean",
            Theme::Dark => "dark",
            Theme::Urgent => "urgent",
        }
    }
}

/// Capability tags a template can opt into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extra {
    /// Shipping/returns/warranty trust row.
    TrustBadges,
    /// Spec comparison cards with a compare-at price.
    SpecCards,
    /// FPS badge rendered next to the CTA.
    FpsBadge,
    /// Limited-time countdown timer.
    Countdown,
    /// Low-stock scarcity notice.
    Scarcity,
}

/// Badge shown above the headline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub icon: String,
}

/// Action the CTA button triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CtaAction {
    Buy,
    Compare,
}

/// Call-to-action button definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cta {
    pub text: String,
    pub icon: String,
    pub action: CtaAction,
}

/// Full hero variant definition, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroTemplate {
    /// Short human-readable label (e.g. "Direct Buyer").
    pub label: String,

    /// Visual theme.
    pub theme: Theme,

    /// Badge above the headline.
    pub badge: Badge,

    /// Main headline.
    pub headline: String,

    /// Supporting subheadline.
    pub subheadline: String,

    /// CTA button.
    pub cta: Cta,

    /// Asset library key for the hero image.
    pub image_key: String,

    /// Capability tags.
    #[serde(default)]
    pub extras: Vec<Extra>,
}

impl HeroTemplate {
    /// Whether this template carries a given capability tag.
    pub fn has_extra(&self, extra: Extra) -> bool {
        self.extras.contains(&extra)
    }
}

// ─────────────────────────────────────────────────────────────────
// Asset Library
// ─────────────────────────────────────────────────────────────────

/// Resolve an asset key to its curated image URL.
pub fn asset_url(key: &str) -> Option<&'static str> {
    match key {
        "product_hero" => {
            Some("https://images.unsplash.com/photo-1527443224154-c4a3942d3acf?w=800&q=80")
        }
        "gaming_setup" => {
            Some("https://images.unsplash.com/photo-1593640408182-31c70c8268f5?w=800&q=80")
        }
        "office_desk" => {
            Some("https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=800&q=80")
        }
        "comparison" => {
            Some("https://images.unsplash.com/photo-1547082299-de196ea013d6?w=800&q=80")
        }
        "sale_graphic" => {
            Some("https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?w=800&q=80")
        }
        "design_studio" => {
            Some("https://images.unsplash.com/photo-1558618666-fcd25c85f82e?w=800&q=80")
        }
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────
// Template Registry
// ─────────────────────────────────────────────────────────────────

/// Immutable registry mapping each persona to its hero template.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: Vec<(Persona, HeroTemplate)>,
}

impl TemplateRegistry {
    /// Parse the bundled template configs. Fails only if a bundled TOML is
    /// malformed, which is a packaging defect.
    pub fn load() -> Result<Self> {
        let mut templates = Vec::with_capacity(Persona::all().len());
        for persona in Persona::all() {
            let raw = bundled_config(*persona);
            let template: HeroTemplate = toml::from_str(raw).map_err(|e| Error::Template {
                persona: persona.slug().to_string(),
                reason: e.to_string(),
            })?;
            templates.push((*persona, template));
        }
        Ok(Self { templates })
    }

    /// Get the template for a persona.
    pub fn get(&self, persona: Persona) -> &HeroTemplate {
        // Every persona is inserted in load(), in declaration order.
        &self.templates[persona.index()].1
    }

    /// Personas in registry declaration order.
    pub fn personas(&self) -> &'static [Persona] {
        Persona::all()
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the registry is empty (never true after a successful load).
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// The bundled TOML config string for a persona.
fn bundled_config(persona: Persona) -> &'static str {
    match persona {
        Persona::BuyNow => include_str!("../../config/personas/buy_now.toml"),
        Persona::Compare => include_str!("../../config/personas/compare.toml"),
        Persona::Gaming => include_str!("../../config/personas/gaming.toml"),
        Persona::Budget => include_str!("../../config/personas/budget.toml"),
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
