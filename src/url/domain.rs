use url::Url;

/// Extracts the bare domain of a URL
///
/// The host is lower-cased and a single leading `www.` label is removed, so
/// `https://WWW.GitHub.com/x` and `github.com` share the bare domain
/// `github.com`. Ports are not part of the bare domain.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The bare domain
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use bookmark_icons::url::bare_domain;
///
/// let url = Url::parse("https://www.github.com/rust-lang").unwrap();
/// assert_eq!(bare_domain(&url), Some("github.com".to_string()));
/// ```
pub fn bare_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => Some(rest.to_string()),
        None => Some(host),
    }
}
