use crate::url::FragmentStripper;
use crate::{CrawlError, UrlError};
use url::{ParseError, Url};

/// The immutable boundary of a crawl run
///
/// A URL is in scope when its host equals the root's host. Scheme and port
/// may differ. Path-absolute links (`/about`) are always rebuilt on the
/// root's own scheme, host and port, so a site served under mixed schemes
/// still maps every page to one canonical address.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// Normalized root URL, the first page of the crawl
    root: Url,

    /// `scheme://host[:port]/` of the root, base for path-absolute links
    origin: Url,

    /// Lowercase host every in-scope URL must share
    host: String,

    fragments: FragmentStripper,

    /// Resolve document-relative hrefs against the referring page
    follow_relative: bool,
}

impl CrawlScope {
    /// Builds the scope for a root URL
    ///
    /// # Errors
    ///
    /// Fails if the root does not parse, is not http(s), has no host, or if
    /// the fragment pattern cannot be compiled. All of these abort the run
    /// before any page is fetched.
    ///
    /// # Example
    ///
    /// ```
    /// use hostmap::url::CrawlScope;
    ///
    /// let scope = CrawlScope::new("https://example.com/start#top").unwrap();
    /// assert_eq!(scope.root(), "https://example.com/start");
    /// assert_eq!(scope.host(), "example.com");
    /// ```
    pub fn new(root_url: &str) -> Result<Self, CrawlError> {
        let root = Url::parse(root_url.trim())?;

        if root.scheme() != "http" && root.scheme() != "https" {
            return Err(UrlError::InvalidScheme(root.scheme().to_string()).into());
        }

        let host = root
            .host_str()
            .filter(|h| !h.is_empty())
            .map(str::to_lowercase)
            .ok_or(UrlError::MissingHost)?;

        let fragments = FragmentStripper::new()?;

        let root = Url::parse(&fragments.strip(root))?;

        let mut origin = root.clone();
        origin.set_path("/");
        origin.set_query(None);

        Ok(Self {
            root,
            origin,
            host,
            fragments,
            follow_relative: false,
        })
    }

    /// Enables resolution of document-relative hrefs
    pub fn with_relative_links(mut self, follow: bool) -> Self {
        self.follow_relative = follow;
        self
    }

    /// The normalized root URL
    pub fn root(&self) -> &str {
        self.root.as_str()
    }

    /// The host that bounds the crawl
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The root's scheme, used for path-absolute and scheme-relative links
    pub fn scheme(&self) -> &str {
        self.root.scheme()
    }

    /// Returns true if the URL is http(s) on the root's host
    pub fn is_in_scope(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
            && url
                .host_str()
                .is_some_and(|h| h.eq_ignore_ascii_case(&self.host))
    }

    /// Resolves a raw `href` into a normalized in-scope URL
    ///
    /// Returns `None` when the link is out of scope or malformed. Such links
    /// are dropped silently; they are never an error.
    ///
    /// # Rules
    ///
    /// - `/path`: joined onto the root origin, whatever page it came from
    /// - `//host/path`: takes the root's scheme, then the host check applies
    /// - `scheme://host/...`: accepted only if the host matches the root
    /// - `page.html`: dropped, unless relative links are enabled, in which
    ///   case it is joined onto `current_page` and host-checked
    ///
    /// Fragments are stripped from every accepted URL; queries are kept as-is.
    pub fn resolve(&self, raw_href: &str, current_page: &str) -> Option<String> {
        let raw = raw_href.trim();
        if raw.is_empty() {
            return None;
        }

        let candidate = if raw.starts_with("//") {
            Url::parse(&format!("{}:{}", self.scheme(), raw)).ok()?
        } else if raw.starts_with('/') {
            self.origin.join(raw).ok()?
        } else {
            match Url::parse(raw) {
                Ok(url) => url,
                Err(ParseError::RelativeUrlWithoutBase) if self.follow_relative => {
                    Url::parse(current_page).ok()?.join(raw).ok()?
                }
                Err(_) => return None,
            }
        };

        if !self.is_in_scope(&candidate) {
            return None;
        }

        Some(self.fragments.strip(candidate))
    }
}
