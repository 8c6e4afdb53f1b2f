//! Shareable link carrying the `route` query parameter

use std::fmt;
use url::Url;

const ROUTE_PARAM: &str = "route";

/// Current shareable location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
}

impl Location {
    /// Wrap a URL
    #[inline]
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parse a URL string
    ///
    /// # Errors
    /// The URL parse error.
    pub fn parse(text: &str) -> Result<Self, url::ParseError> {
        Url::parse(text).map(Self::new)
    }

    /// Value of the `route` parameter, if any
    #[must_use]
    pub fn route_param(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == ROUTE_PARAM)
            .map(|(_, v)| v.into_owned())
    }

    /// Point the `route` parameter at `route_id`, keeping other parameters
    pub fn set_route_param(&mut self, route_id: &str) {
        let others: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(k, _)| k != ROUTE_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        self.url
            .query_pairs_mut()
            .clear()
            .extend_pairs(others)
            .append_pair(ROUTE_PARAM, route_id);
    }

    /// Underlying URL
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.url.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_route_param() {
        let loc = Location::parse("https://example.com/?x=1&route=b").unwrap();
        assert_eq!(loc.route_param().as_deref(), Some("b"));
        assert_eq!(Location::parse("https://example.com/").unwrap().route_param(), None);
    }

    #[test]
    fn rewrites_route_param_keeping_others() {
        let mut loc = Location::parse("https://example.com/t?route=a&theme=dark").unwrap();
        loc.set_route_param("b c");
        assert_eq!(loc.to_string(), "https://example.com/t?theme=dark&route=b+c");
        assert_eq!(loc.route_param().as_deref(), Some("b c"));
    }
}
