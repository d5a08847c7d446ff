//! Section classification for documentation URLs
//!
//! This module decides which sitemap URLs belong to a documentation version's
//! "topics" and "ref" sections, and how pages nest inside those sections.

mod parent;
mod pattern;

pub use parent::section_parent_url;
pub use pattern::{patterns_for, Section, SectionKind, SectionPattern, SectionPatterns};

/// Keeps the URLs that match any of `version`'s section rules
///
/// Input order is preserved.
///
/// # Examples
///
/// ```
/// use docgraph::sections::filter_by_version;
///
/// let urls = vec![
///     "https://docs.djangoproject.com/en/5.1/topics/auth/".to_string(),
///     "https://docs.djangoproject.com/en/5.1/intro/".to_string(),
///     "https://docs.djangoproject.com/en/5.0/topics/auth/".to_string(),
/// ];
/// let kept = filter_by_version(&urls, "5.1");
/// assert_eq!(kept, vec!["https://docs.djangoproject.com/en/5.1/topics/auth/".to_string()]);
/// ```
pub fn filter_by_version<S: AsRef<str>>(urls: &[S], version: &str) -> Vec<String> {
    let patterns = patterns_for(version);
    urls.iter()
        .map(AsRef::as_ref)
        .filter(|url| patterns.is_in_scope(url))
        .map(str::to_string)
        .collect()
}
