use super::MarkupEngine;
use pulldown_cmark::{html, Options, Parser};

/// CommonMark renderer backed by pulldown-cmark, with tables and
/// strikethrough enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulldownMarkdown;

impl MarkupEngine for PulldownMarkdown {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn render(&self, text: &str) -> String {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let parser = Parser::new_ext(text, options);
        let mut output = String::with_capacity(text.len() + text.len() / 2);
        html::push_html(&mut output, parser);
        output
    }
}
