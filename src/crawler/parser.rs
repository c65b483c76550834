//! HTML parser for extracting links
//!
//! Only `<a href="...">` is considered. html5ever recovers from malformed or
//! truncated markup, so a broken page yields whatever anchors were parsed
//! before the damage and is never a page-level failure.

use crate::url::CrawlScope;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Collects the raw `href` values of every anchor in the document
///
/// Duplicates collapse. Values are returned exactly as written in the
/// markup, before any resolution.
///
/// # Example
///
/// ```
/// use hostmap::crawler::extract_links;
///
/// let links = extract_links("<a href='/a'><img/><a href='/b'></a><a href='/a'>");
/// assert_eq!(links.len(), 2);
/// ```
pub fn extract_links(html: &str) -> BTreeSet<String> {
    let document = Html::parse_document(html);
    let mut links = BTreeSet::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                links.insert(href.to_string());
            }
        }
    }

    links
}

/// Extracts the normalized, in-scope links of a page
///
/// Runs [`extract_links`], resolves every href through the scope and drops
/// what the filter rejects.
pub fn extract_page_links(
    html: &str,
    page_url: &str,
    scope: &CrawlScope,
    filter: &LinkFilter,
) -> BTreeSet<String> {
    extract_links(html)
        .iter()
        .filter_map(|href| scope.resolve(href, page_url))
        .filter(|url| filter.allows(url))
        .collect()
}

/// Skips links to files that are not worth fetching, by path suffix
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    /// Lowercase suffixes, each with a leading dot
    suffixes: Vec<String>,
}

impl LinkFilter {
    /// Creates a filter from bare extensions such as `"png"` or `".jpg"`
    pub fn new(extensions: &[String]) -> Self {
        let suffixes = extensions
            .iter()
            .map(|ext| format!(".{}", ext.trim_start_matches('.').to_ascii_lowercase()))
            .collect();
        Self { suffixes }
    }

    /// Returns true if the URL should be followed
    pub fn allows(&self, url: &str) -> bool {
        if self.suffixes.is_empty() {
            return true;
        }

        let path = match Url::parse(url) {
            Ok(parsed) => parsed.path().to_ascii_lowercase(),
            Err(_) => return true,
        };

        !self.suffixes.iter().any(|suffix| path.ends_with(suffix))
    }
}
