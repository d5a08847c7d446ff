use url::Url;

use super::pattern::Section;

/// Segments that must follow the section marker before a page has a parent
const MIN_SEGMENTS_FOR_PARENT: usize = 3;

/// Computes the section-level parent of a documentation page
///
/// The first `topics` or `ref` segment in the path is the anchor. The parent
/// keeps exactly one segment past the anchor, gains a trailing slash and keeps
/// the query string and fragment of the input.
///
/// # Returns
///
/// * `Some(String)` - The parent URL
/// * `None` - The URL does not parse, has no section marker, or sits too
///   close to the section root to have a parent
///
/// # Examples
///
/// ```
/// use docgraph::sections::section_parent_url;
///
/// assert_eq!(
///     section_parent_url("https://docs.djangoproject.com/en/6.0/ref/contrib/admin/actions/"),
///     Some("https://docs.djangoproject.com/en/6.0/ref/contrib/".to_string())
/// );
/// assert_eq!(
///     section_parent_url("https://docs.djangoproject.com/en/6.0/ref/contrib/admin/"),
///     None
/// );
/// ```
pub fn section_parent_url(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;

    let segments: Vec<String> = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect();

    let marker = segments.iter().position(|segment| is_section_marker(segment))?;

    if segments.len() < marker + 1 + MIN_SEGMENTS_FOR_PARENT {
        return None;
    }

    let parent_path = format!("/{}/", segments[..=marker + 1].join("/"));
    parsed.set_path(&parent_path);

    Some(parsed.to_string())
}

fn is_section_marker(segment: &str) -> bool {
    [Section::Topics, Section::Reference]
        .iter()
        .any(|section| section.marker() == segment)
}
