//! Page extraction
//!
//! Turns one documentation page into a fixed record:
//! - Title from the first `<h1>`, permalink glyphs removed
//! - Previous/next links from the "browse" navigation region
//! - Body content from the first matching container, links made absolute,
//!   converted to markdown

use crate::crawler::fetcher::fetch_text;
use crate::crawler::markdown::{html_to_markdown, strip_permalink_markers};
use crate::DocGraphError;
use lol_html::{element, HtmlRewriter, Settings};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Title used when a page has no `<h1>`
pub const UNTITLED: &str = "Untitled";

/// Navigation regions holding the previous/next links, in lookup order
const BROWSE_REGIONS: &[&str] = &[
    r#"nav[aria-labelledby="browse-header"]"#,
    "nav.browse-horizontal",
];

/// Containers holding the page body, in lookup order
const BODY_CONTAINERS: &[&str] = &["#docs-content", r#"[role="main"]"#, "main", "article"];

/// What a page contributes to the graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub content: String,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

/// Fetches `url` and extracts its title, content and navigation links
///
/// # Errors
///
/// * `DocGraphError::Fetch` - The server answered with a non-success status
/// * `DocGraphError::Transport` - The request itself failed
pub async fn extract_page(client: &Client, url: &str) -> Result<ExtractedPage, DocGraphError> {
    let base_url = Url::parse(url)?;
    let html = fetch_text(client, url).await?;
    parse_page(&html, &base_url)
}

/// Extracts a page from already fetched HTML
///
/// Navigation links are read from the untouched document before the body is
/// rewritten. Missing regions or containers produce empty values, not errors.
///
/// # Example
///
/// ```
/// use docgraph::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><body><h1>Models</h1><div id="docs-content"><p>Hi</p></div></body></html>"#;
/// let base = Url::parse("https://docs.example.com/en/5.1/topics/db/").unwrap();
/// let page = parse_page(html, &base).unwrap();
/// assert_eq!(page.title, "Models");
/// assert_eq!(page.content, "Hi");
/// ```
pub fn parse_page(html: &str, base_url: &Url) -> Result<ExtractedPage, DocGraphError> {
    let document = Html::parse_document(html);

    let (previous_url, next_url) = extract_navigation(&document, base_url);
    let title = extract_title(&document);

    let content = match extract_body_html(&document) {
        Some(body) => {
            let cleaned = clean_body(&body, base_url)?;
            html_to_markdown(&cleaned)?
        }
        None => {
            tracing::debug!("No body container found on {}", base_url);
            String::new()
        }
    };

    Ok(ExtractedPage {
        title,
        content,
        previous_url,
        next_url,
    })
}

/// Extracts the heading text, falling back to [`UNTITLED`]
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("h1") else {
        return UNTITLED.to_string();
    };

    document
        .select(&selector)
        .next()
        .map(|heading| {
            let text = heading.text().collect::<String>();
            strip_permalink_markers(&text).trim().to_string()
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Reads previous/next links from the first browse region that yields any
fn extract_navigation(document: &Html, base_url: &Url) -> (Option<String>, Option<String>) {
    for region in BROWSE_REGIONS {
        let Ok(selector) = Selector::parse(region) else {
            continue;
        };

        for nav in document.select(&selector) {
            let previous = find_rel_link(nav, "prev", base_url);
            let next = find_rel_link(nav, "next", base_url);
            if previous.is_some() || next.is_some() {
                return (previous, next);
            }
        }
    }

    (None, None)
}

/// Finds the first anchor in `region` whose `rel` contains `rel`, resolved to absolute
fn find_rel_link(region: ElementRef<'_>, rel: &str, base_url: &Url) -> Option<String> {
    let selector = Selector::parse("a[href][rel]").ok()?;

    region
        .select(&selector)
        .find(|anchor| {
            anchor.value().attr("rel").is_some_and(|value| {
                value
                    .split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case(rel))
            })
        })
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| base_url.join(href.trim()).ok())
        .map(|resolved| resolved.to_string())
}

/// Returns the outer HTML of the first body container present
fn extract_body_html(document: &Html) -> Option<String> {
    BODY_CONTAINERS.iter().find_map(|candidate| {
        let selector = Selector::parse(candidate).ok()?;
        document.select(&selector).next().map(|element| element.html())
    })
}

/// Removes permalink anchors and makes every link and image source absolute
fn clean_body(html: &str, base_url: &Url) -> Result<String, DocGraphError> {
    let mut output = Vec::with_capacity(html.len());

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("a.headerlink", |el| {
                    el.remove();
                    Ok(())
                }),
                element!("a[href]", |el| {
                    if let Some(href) = el.get_attribute("href") {
                        if let Some(absolute) = absolutize(&href, base_url) {
                            el.set_attribute("href", &absolute)?;
                        }
                    }
                    Ok(())
                }),
                element!("img[src]", |el| {
                    if let Some(src) = el.get_attribute("src") {
                        if let Some(absolute) = absolutize(&src, base_url) {
                            el.set_attribute("src", &absolute)?;
                        }
                    }
                    Ok(())
                }),
            ],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| rewrite_error(base_url, e))?;
    rewriter.end().map_err(|e| rewrite_error(base_url, e))?;

    String::from_utf8(output).map_err(|e| rewrite_error(base_url, e))
}

fn rewrite_error(base_url: &Url, error: impl std::fmt::Display) -> DocGraphError {
    DocGraphError::HtmlParse {
        url: base_url.to_string(),
        message: error.to_string(),
    }
}

/// Resolves a relative reference against `base_url`
///
/// Returns None when the reference should be left untouched:
/// - empty or fragment-only (`#section`)
/// - `mailto:` and `data:` references
/// - already absolute URLs
fn absolutize(reference: &str, base_url: &Url) -> Option<String> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    let lowered = reference.to_ascii_lowercase();
    if lowered.starts_with("mailto:") || lowered.starts_with("data:") {
        return None;
    }

    if Url::parse(reference).is_ok() {
        return None;
    }

    base_url.join(reference).ok().map(|resolved| resolved.to_string())
}
