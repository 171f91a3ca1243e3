use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use polite_spider::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Returns `host[:port]` for a URL, the key under which per-host state is kept
///
/// The port is only present when it differs from the scheme default.
pub fn host_key(url: &Url) -> Option<String> {
    let host = extract_host(url)?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Checks whether a raw URL falls inside the allow-list
///
/// An empty allow-list is an open policy. Otherwise the host must equal an
/// entry or be a subdomain of it (`sub.github.com` matches `github.com`,
/// `notgithub.com` does not). Ports never take part in the match.
///
/// Malformed URLs and URLs without a host are never allowed, whatever the
/// allow-list contains.
///
/// # Examples
///
/// ```
/// use polite_spider::url::is_allowed_domain;
///
/// let allow = vec!["github.com".to_string()];
/// assert!(is_allowed_domain("http://sub.github.com/x", &allow));
/// assert!(!is_allowed_domain("http://notgithub.com/x", &allow));
/// ```
pub fn is_allowed_domain(raw: &str, allow_list: &[String]) -> bool {
    let url = match Url::parse(raw.trim()) {
        Ok(url) => url,
        Err(_) => return false,
    };

    match extract_host(&url) {
        Some(host) => host_in_allow_list(&host, allow_list),
        None => false,
    }
}

/// Suffix match of an already extracted host against the allow-list
pub fn host_in_allow_list(host: &str, allow_list: &[String]) -> bool {
    if allow_list.is_empty() {
        return true;
    }

    allow_list.iter().any(|allowed| {
        host == allowed
            || (host.len() > allowed.len()
                && host.ends_with(allowed.as_str())
                && host.as_bytes()[host.len() - allowed.len() - 1] == b'.')
    })
}
