//! Textile subset renderer.
//!
//! Covers the constructs portfolio descriptions use: `h1.`..`h6.`, `bq.`,
//! `p.`, plain paragraphs with line breaks, `*`/`#` lists, `*strong*`,
//! `_emphasis_`, `@code@` and `"text":url` links. Blocks that already start
//! with an HTML tag pass through untouched.

use super::MarkupEngine;
use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("valid block split regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^h([1-6])\.\s+(.*)$").expect("valid heading regex"));
static QUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^bq\.\s+(.*)$").expect("valid quote regex"));
static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^p\.\s+(.*)$").expect("valid paragraph regex"));
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([^@\n]+)@").expect("valid code regex"));
static STRONG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\s](?:[^*\n]*[^*\s])?)\*").expect("valid strong regex"));
static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b_([^_\s](?:[^_\n]*[^_\s])?)_\b").expect("valid emphasis regex"));
static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"\n]+)":([^\s"]*[^\s".,;:!?)])"#).expect("valid link regex")
});

/// Regex-based textile renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicTextile;

impl MarkupEngine for BasicTextile {
    fn name(&self) -> &'static str {
        "textile"
    }

    fn render(&self, text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        BLOCK_SPLIT_RE
            .split(normalized.trim())
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(render_block)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn render_block(block: &str) -> String {
    if block.starts_with('<') {
        return block.to_string();
    }
    if let Some(caps) = HEADING_RE.captures(block) {
        let level = &caps[1];
        return format!("<h{level}>{}</h{level}>", render_inline(&caps[2]));
    }
    if let Some(caps) = QUOTE_RE.captures(block) {
        return format!(
            "<blockquote>\n<p>{}</p>\n</blockquote>",
            render_lines(&caps[1])
        );
    }
    if let Some(caps) = PARAGRAPH_RE.captures(block) {
        return format!("<p>{}</p>", render_lines(&caps[1]));
    }
    if let Some(list) = render_list(block) {
        return list;
    }
    format!("<p>{}</p>", render_lines(block))
}

fn render_list(block: &str) -> Option<String> {
    let (tag, marker) = if block.starts_with("* ") {
        ("ul", "* ")
    } else if block.starts_with("# ") {
        ("ol", "# ")
    } else {
        return None;
    };

    let mut items = Vec::new();
    for line in block.lines() {
        let item = line.trim_start().strip_prefix(marker)?;
        items.push(format!("\t<li>{}</li>", render_inline(item.trim())));
    }
    Some(format!("<{tag}>\n{}\n</{tag}>", items.join("\n")))
}

fn render_lines(text: &str) -> String {
    text.lines()
        .map(|line| render_inline(line.trim()))
        .collect::<Vec<_>>()
        .join("<br />\n")
}

fn render_inline(text: &str) -> String {
    let with_code = CODE_RE.replace_all(text, "<code>$1</code>");
    let with_links = LINK_RE.replace_all(&with_code, "<a href=\"$2\">$1</a>");
    let with_strong = STRONG_RE.replace_all(&with_links, "<strong>$1</strong>");
    EMPHASIS_RE
        .replace_all(&with_strong, "<em>$1</em>")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::BasicTextile;
    use crate::markup::MarkupEngine;

    #[test]
    fn renders_headings_and_paragraphs() {
        let html = BasicTextile.render("h2. Meadow\n\nA *native* _prairie_ planting.");
        assert_eq!(
            html,
            "<h2>Meadow</h2>\n<p>A <strong>native</strong> <em>prairie</em> planting.</p>"
        );
    }

    #[test]
    fn renders_links_lists_and_breaks() {
        let html = BasicTextile.render(
            "See \"the plan\":http://example.com/plan.\nThanks\n\n* one\n* two",
        );
        assert_eq!(
            html,
            "<p>See <a href=\"http://example.com/plan\">the plan</a>.<br />\nThanks</p>\n<ul>\n\t<li>one</li>\n\t<li>two</li>\n</ul>"
        );
    }

    #[test]
    fn renders_quotes_and_keeps_raw_html_blocks() {
        let html = BasicTextile.render("bq. Less is more.\n\n<div>raw</div>");
        assert_eq!(
            html,
            "<blockquote>\n<p>Less is more.</p>\n</blockquote>\n<div>raw</div>"
        );
    }
}
