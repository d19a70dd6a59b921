//! Description markup rendering.
//!
//! # Responsibility
//! - Turn author-supplied descriptions into cached HTML.
//! - Report whether the cached HTML changed, so callers can refresh
//!   derived indexes.
//!
//! # Invariants
//! - The markup mode is an explicit argument, never read from global state.
//! - `Html` and `Wysiwyg` are identity; `Plain` strips markup and is
//!   idempotent. Markdown/textile output is not assumed idempotent.
//! - `description_html` is recomputed on every refresh, even when the
//!   description did not change.

mod markdown;
mod strip;
mod textile;

pub use markdown::PulldownMarkdown;
pub use strip::strip_tags;
pub use textile::BasicTextile;

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Dialect a description is interpreted as before caching HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupMode {
    #[default]
    Markdown,
    Textile,
    /// Editor-produced HTML, trusted as-is.
    Wysiwyg,
    Html,
    Plain,
}

impl MarkupMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Textile => "textile",
            Self::Wysiwyg => "wysiwyg",
            Self::Html => "html",
            Self::Plain => "plain",
        }
    }

    /// Parses a configured mode name.
    ///
    /// Unrecognized names fall back to [`MarkupMode::Plain`], which strips
    /// markup instead of trusting it.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" => Self::Markdown,
            "textile" => Self::Textile,
            "wysiwyg" => Self::Wysiwyg,
            "html" => Self::Html,
            "plain" => Self::Plain,
            other => {
                warn!("event=markup_mode_parse module=markup status=fallback value={other:?} mode=plain");
                Self::Plain
            }
        }
    }
}

impl Display for MarkupMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pluggable converter for one markup dialect.
pub trait MarkupEngine: Send + Sync {
    /// Short engine name for diagnostics.
    fn name(&self) -> &'static str;
    /// Converts raw markup text into HTML.
    fn render(&self, text: &str) -> String;
}

/// Entity with an author-supplied description and a rendered HTML cache.
pub trait Described {
    fn description(&self) -> &str;
    fn description_html(&self) -> &str;
    fn set_description_html(&mut self, html: String);
}

/// Renders descriptions with injected markdown and textile engines.
pub struct MarkupRenderer {
    markdown: Box<dyn MarkupEngine>,
    textile: Box<dyn MarkupEngine>,
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self::new(Box::new(PulldownMarkdown), Box::new(BasicTextile))
    }
}

impl MarkupRenderer {
    pub fn new(markdown: Box<dyn MarkupEngine>, textile: Box<dyn MarkupEngine>) -> Self {
        Self { markdown, textile }
    }

    /// Renders `raw` according to `mode`.
    pub fn render(&self, raw: &str, mode: MarkupMode) -> String {
        match mode {
            MarkupMode::Markdown => self.markdown.render(raw),
            MarkupMode::Textile => self.textile.render(raw),
            MarkupMode::Wysiwyg | MarkupMode::Html => raw.to_string(),
            MarkupMode::Plain => strip_tags(raw),
        }
    }

    /// Name of whatever handles `mode`: an injected engine, `identity` or
    /// `strip`.
    pub fn engine_name(&self, mode: MarkupMode) -> &'static str {
        match mode {
            MarkupMode::Markdown => self.markdown.name(),
            MarkupMode::Textile => self.textile.name(),
            MarkupMode::Wysiwyg | MarkupMode::Html => "identity",
            MarkupMode::Plain => "strip",
        }
    }

    /// Re-renders the entity description into its HTML cache.
    ///
    /// Returns `true` when the cached HTML differs from what was stored
    /// before this call.
    pub fn refresh<D: Described + ?Sized>(&self, entity: &mut D, mode: MarkupMode) -> bool {
        let rendered = self.render(entity.description(), mode);
        let changed = rendered != entity.description_html();
        entity.set_description_html(rendered);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::{Described, MarkupEngine, MarkupMode, MarkupRenderer};

    struct Upper;

    impl MarkupEngine for Upper {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn render(&self, text: &str) -> String {
            text.to_uppercase()
        }
    }

    #[derive(Default)]
    struct Doc {
        description: String,
        description_html: String,
    }

    impl Described for Doc {
        fn description(&self) -> &str {
            &self.description
        }

        fn description_html(&self) -> &str {
            &self.description_html
        }

        fn set_description_html(&mut self, html: String) {
            self.description_html = html;
        }
    }

    #[test]
    fn parse_falls_back_to_plain() {
        assert_eq!(MarkupMode::parse(" Textile "), MarkupMode::Textile);
        assert_eq!(MarkupMode::parse("restructuredtext"), MarkupMode::Plain);
    }

    #[test]
    fn injected_engines_handle_markup_modes() {
        let renderer = MarkupRenderer::new(Box::new(Upper), Box::new(Upper));
        assert_eq!(renderer.render("abc", MarkupMode::Markdown), "ABC");
        assert_eq!(renderer.render("abc", MarkupMode::Textile), "ABC");
        assert_eq!(renderer.render("abc", MarkupMode::Html), "abc");
        assert_eq!(renderer.engine_name(MarkupMode::Textile), "upper");
    }

    #[test]
    fn default_engines_are_named() {
        let renderer = MarkupRenderer::default();
        assert_eq!(renderer.engine_name(MarkupMode::Markdown), "markdown");
        assert_eq!(renderer.engine_name(MarkupMode::Textile), "textile");
        assert_eq!(renderer.engine_name(MarkupMode::Wysiwyg), "identity");
        assert_eq!(renderer.engine_name(MarkupMode::Plain), "strip");
    }

    #[test]
    fn refresh_reports_change_only_when_html_differs() {
        let renderer = MarkupRenderer::default();
        let mut doc = Doc {
            description: "<em>hi</em>".to_string(),
            ..Doc::default()
        };

        assert!(renderer.refresh(&mut doc, MarkupMode::Html));
        assert_eq!(doc.description_html, "<em>hi</em>");
        assert!(!renderer.refresh(&mut doc, MarkupMode::Wysiwyg));
        assert!(renderer.refresh(&mut doc, MarkupMode::Plain));
        assert_eq!(doc.description_html, "hi");
    }
}
