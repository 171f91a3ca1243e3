use crate::{UrlError, UrlResult};
use std::borrow::Borrow;
use std::fmt;
use url::Url;

/// Deduplication key for a URL: scheme, authority and path only
///
/// Ordering is plain string ordering, which gives the persisted visited file
/// its sorted layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Wraps a line read back from the visited file without re-parsing it
    ///
    /// Persisted entries were canonical when written; re-deriving them could
    /// only drop entries, and the visited set never shrinks.
    pub(crate) fn from_persisted(line: &str) -> Self {
        Self(line.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalUrl {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Canonicalizes a raw URL into its deduplication key
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not `http` or `https`
/// 3. Require a host
/// 4. Keep scheme, lowercase host, explicit non-default port and path
/// 5. Drop user info, query and fragment
///
/// Parsing also resolves dot segments, lowercases the host and turns an
/// empty path into `/`, so `http://x.com` and `http://x.com/` share a key.
/// Trailing slashes on non-root paths are kept: `/a` and `/a/` stay distinct.
///
/// The function is idempotent: canonicalizing a canonical key returns it
/// unchanged.
///
/// # Examples
///
/// ```
/// use polite_spider::url::canonicalize;
///
/// let key = canonicalize("http://Example.com/a?x=1#sec1").unwrap();
/// assert_eq!(key.as_str(), "http://example.com/a");
/// ```
pub fn canonicalize(raw: &str) -> UrlResult<CanonicalUrl> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    canonicalize_parsed(&url)
}

/// Canonicalizes an already parsed URL
pub fn canonicalize_parsed(url: &Url) -> UrlResult<CanonicalUrl> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?;
    if host.is_empty() {
        return Err(UrlError::MissingHost);
    }

    let mut key = String::with_capacity(url.as_str().len());
    key.push_str(url.scheme());
    key.push_str("://");
    key.push_str(host);
    if let Some(port) = url.port() {
        key.push(':');
        key.push_str(&port.to_string());
    }
    key.push_str(url.path());

    Ok(CanonicalUrl(key))
}
