//! Markup stripping for the plain-text mode.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z!][^>]*>").expect("valid tag regex"));
static IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\([^)]*\)").expect("valid image regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));
static LINE_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]{0,3}(?:#{1,6}[ \t]+|>[ \t]?)").expect("valid line prefix regex")
});
static STRONG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(\S(?:[^*\n]*?\S)?)\*\*").expect("valid strong regex")
});
static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*(\S(?:[^*\n]*?\S)?)\*").expect("valid emphasis regex"));
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`\n]+)`").expect("valid code span regex"));
static STRIKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"~~([^~\n]+?)~~").expect("valid strikethrough regex"));

/// Removes HTML tags, comments and inline markup syntax.
///
/// Only paired delimiters (`**x**`, `*x*`, `` `x` ``, `~~x~~`) count as
/// markup; a lone `*` or backtick is ordinary text.
///
/// Text between tags is kept verbatim; entities are not decoded. The pass is
/// repeated until nothing changes, so stripping twice equals stripping once.
pub fn strip_tags(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = strip_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn strip_once(value: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(value, "");
    let without_images = IMAGE_RE.replace_all(&without_comments, "");
    let without_links = LINK_RE.replace_all(&without_images, "$1");
    let without_prefixes = LINE_PREFIX_RE.replace_all(&without_links, "");
    let without_code = CODE_RE.replace_all(&without_prefixes, "$1");
    let without_strong = STRONG_RE.replace_all(&without_code, "$1");
    let without_emphasis = EMPHASIS_RE.replace_all(&without_strong, "$1");
    let without_strike = STRIKE_RE.replace_all(&without_emphasis, "$1");
    TAG_RE.replace_all(&without_strike, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::strip_tags;

    #[test]
    fn strips_html_and_keeps_text() {
        assert_eq!(
            strip_tags("<p>Green <a href=\"/roofs\">roofs</a><!-- draft --></p>"),
            "Green roofs"
        );
    }

    #[test]
    fn strips_markdown_syntax() {
        assert_eq!(strip_tags("**x**"), "x");
        assert_eq!(
            strip_tags("# Title\n> quoted `code` and [site](http://a.b) ![img](p.png)"),
            "Title\nquoted code and site "
        );
    }

    #[test]
    fn leaves_comparison_operators_alone() {
        assert_eq!(strip_tags("a < b and c > d"), "a < b and c > d");
    }

    #[test]
    fn lone_asterisks_and_backticks_are_kept() {
        assert_eq!(
            strip_tags("Plot is 20 * 30 ft, cost 5*2"),
            "Plot is 20 * 30 ft, cost 5*2"
        );
        assert_eq!(strip_tags("it's `pending"), "it's `pending");
        assert_eq!(strip_tags("*new* and ~~old~~ beds"), "new and old beds");
    }

    #[test]
    fn stripping_is_idempotent_for_nested_constructs() {
        let once = strip_tags("[x]<b>(y)</b> <*i>z ***deep***");
        assert_eq!(strip_tags(&once), once);
        assert_eq!(once, "x <*i>z deep");
    }
}
