//! HTML to markdown conversion
//!
//! A thin wrapper around `htmd`. Callers hand in body HTML whose links have
//! already been made absolute; this module only converts and tidies the text.

use htmd::HtmlToMarkdown;

/// Permalink glyph appended to headings by the documentation theme
pub const PILCROW: char = '¶';

/// Converts an HTML fragment to markdown
pub fn html_to_markdown(html: &str) -> std::io::Result<String> {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style"])
        .build();

    let markdown = converter.convert(html)?;
    Ok(strip_permalink_markers(&markdown).trim().to_string())
}

/// Removes permalink glyphs from text
pub fn strip_permalink_markers(text: &str) -> String {
    text.chars().filter(|c| *c != PILCROW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let markdown = html_to_markdown("<h2>Usage</h2><p>Call <code>login()</code>.</p>").unwrap();
        assert!(markdown.contains("## Usage"));
        assert!(markdown.contains("`login()`"));
    }

    #[test]
    fn test_links_are_kept() {
        let markdown =
            html_to_markdown(r#"<p><a href="https://example.com/a/">A</a></p>"#).unwrap();
        assert!(markdown.contains("[A](https://example.com/a/)"));
    }

    #[test]
    fn test_scripts_are_skipped() {
        let markdown = html_to_markdown("<p>Text</p><script>alert(1)</script>").unwrap();
        assert!(!markdown.contains("alert"));
    }

    #[test]
    fn test_strip_permalink_markers() {
        assert_eq!(strip_permalink_markers("Models¶"), "Models");
        assert_eq!(strip_permalink_markers("no glyph"), "no glyph");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(html_to_markdown("").unwrap(), "");
    }
}
