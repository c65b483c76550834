use regex::Regex;
use url::Url;

/// Matches a percent-encoded fragment left at the end of a URL (`%23` is `#`)
const ENCODED_FRAGMENT_PATTERN: &str = r"%23[\w\-]*$";

/// Removes fragment identifiers so that `/x` and `/x#top` are the same page
#[derive(Debug, Clone)]
pub struct FragmentStripper {
    encoded: Regex,
}

impl FragmentStripper {
    /// Compiles the trailing-fragment pattern
    ///
    /// A failure here is an initialization error for the whole run.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            encoded: Regex::new(ENCODED_FRAGMENT_PATTERN)?,
        })
    }

    /// Drops the `#...` fragment and any trailing `%23...` and serializes the URL
    pub fn strip(&self, mut url: Url) -> String {
        url.set_fragment(None);
        let serialized: String = url.into();
        self.encoded.replace(&serialized, "").into_owned()
    }
}
