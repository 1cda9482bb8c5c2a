//! Page environment seam
//!
//! The collector reads ambient page state through this trait so the engine
//! can run against a live embedding, a CLI-simulated page, or test fixtures.

// ─────────────────────────────────────────────────────────────────
// PageEnvironment Trait
// ─────────────────────────────────────────────────────────────────

/// Ambient page state the signal collector observes.
///
/// Every accessor returns `None` when the value is unavailable; a read
/// failure is indistinguishable from absence by design.
pub trait PageEnvironment: Send + Sync {
    /// Full page URL including the query string.
    fn page_url(&self) -> Option<String>;

    /// Document referrer, if any.
    fn referrer(&self) -> Option<String>;

    /// Document title.
    fn page_title(&self) -> Option<String>;

    /// Meta description content.
    fn meta_description(&self) -> Option<String>;

    /// Text of the first top-level heading.
    fn first_heading(&self) -> Option<String>;
}

// ─────────────────────────────────────────────────────────────────
// Static Environment
// ─────────────────────────────────────────────────────────────────

/// Fixed environment built from CLI arguments or test fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    pub url: Option<String>,
    pub referrer: Option<String>,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub heading: Option<String>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_meta_description(mut self, description: impl Into<String>) -> Self {
        self.meta_description = Some(description.into());
        self
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }
}

impl PageEnvironment for StaticEnvironment {
    fn page_url(&self) -> Option<String> {
        self.url.clone()
    }

    fn referrer(&self) -> Option<String> {
        self.referrer.clone()
    }

    fn page_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn meta_description(&self) -> Option<String> {
        self.meta_description.clone()
    }

    fn first_heading(&self) -> Option<String> {
        self.heading.clone()
    }
}
