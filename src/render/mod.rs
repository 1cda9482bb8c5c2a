//! Rendering — hero variant output surfaces.

mod console;
mod html;
mod mock;
mod traits;

pub use console::{format_countdown, ConsoleRenderSink};
pub use html::{build_hero_html, build_shimmer_html, HtmlRenderSink};
pub use mock::{MockRenderSink, RenderCall};
pub use traits::{RenderSink, SharedRenderSink};
