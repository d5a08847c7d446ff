//! Sitemap reading
//!
//! Fetches a sitemap and returns the page locations it advertises, in
//! document order. Parsing is best effort: malformed XML yields whatever
//! entries were read before the error, never a failure.

use crate::crawler::fetch_text;
use crate::DocGraphError;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

/// Fetches `location` and extracts its `<url><loc>` entries
///
/// # Errors
///
/// * `DocGraphError::Fetch` - Non-success status (carries status and reason)
/// * `DocGraphError::Transport` - The request itself failed
pub async fn read_sitemap(client: &Client, location: &str) -> Result<Vec<String>, DocGraphError> {
    tracing::info!("Reading sitemap {}", location);
    let xml = fetch_text(client, location).await?;
    Ok(parse_sitemap(&xml))
}

/// Extracts trimmed `<loc>` values of `<url>` entries
///
/// # Examples
///
/// ```
/// use docgraph::sitemap::parse_sitemap;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc> https://example.com/en/5.1/topics/ </loc></url>
/// </urlset>"#;
///
/// assert_eq!(parse_sitemap(xml), vec!["https://example.com/en/5.1/topics/".to_string()]);
/// ```
pub fn parse_sitemap(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut locations = Vec::new();
    let mut in_url = false;
    let mut current_loc: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"url" => in_url = true,
                b"loc" if in_url => current_loc = Some(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"loc" => {
                    if let Some(loc) = current_loc.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() {
                            locations.push(loc.to_string());
                        }
                    }
                }
                b"url" => in_url = false,
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    match e.unescape() {
                        Ok(text) => loc.push_str(&text),
                        Err(err) => {
                            tracing::warn!("Skipping undecodable sitemap text: {}", err);
                        }
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(loc) = current_loc.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    "Sitemap XML error at byte {}: {}; keeping {} entries",
                    reader.buffer_position(),
                    e,
                    locations.len()
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    locations
}
