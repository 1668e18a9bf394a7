//! Small rendering helpers

use unicode_width::UnicodeWidthChar;

/// Truncate a string to `max_width` display columns, appending `…` when
/// anything was cut. Char-boundary and wide-glyph safe.
pub fn truncate_ellipsis(text: &str, max_width: usize) -> String {
    let total: usize = text
        .chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(1))
        .sum();
    if total <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > budget {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out.push('…');
    out
}

/// Flatten rendered card HTML into a single line of preview text
pub fn html_to_preview(html: &str) -> String {
    let fragment = scraper::Html::parse_fragment(html);
    let text: String = fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");

    // Collapse runs of whitespace left behind by block elements
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_ellipsis("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        let out = truncate_ellipsis("abcdefghij", 5);
        assert!(out.ends_with('…'));
        assert!(out.chars().count() <= 5);
    }

    #[test]
    fn test_html_to_preview_strips_markup() {
        let html = r#"<div class="front"><b>What is</b> the capital of <i>France</i>?</div>"#;
        assert_eq!(html_to_preview(html), "What is the capital of France ?");
    }

    #[test]
    fn test_html_to_preview_collapses_whitespace() {
        let html = "<div>line one</div>\n<div>line two</div>";
        assert_eq!(html_to_preview(html), "line one line two");
    }
}
