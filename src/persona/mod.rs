//! Persona system — visitor archetypes and their hero templates.

mod template;
mod types;

pub use template::{asset_url, Badge, Cta, CtaAction, Extra, HeroTemplate, TemplateRegistry, Theme};
pub use types::Persona;
