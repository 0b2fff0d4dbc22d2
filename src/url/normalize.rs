use url::Url;

/// Scheme assumed for inputs that arrive without one
const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Schemes that are recognised as already present on a raw input
const KNOWN_SCHEME_PREFIXES: &[&str] = &["http://", "https://"];

/// Prefixes `https://` onto a raw input that lacks an http(s) scheme
///
/// Surrounding whitespace is trimmed first. Scheme detection is
/// case-insensitive so that `HTTP://Example.com` is left alone.
///
/// # Arguments
///
/// * `raw` - The user-supplied URL or bare host
///
/// # Returns
///
/// The input with a scheme guaranteed to be present
///
/// # Examples
///
/// ```
/// use bookmark_icons::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com/page"), "https://example.com/page");
/// assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
/// ```
pub fn ensure_scheme(raw: &str) -> String {
    let trimmed = raw.trim();
    let has_scheme = KNOWN_SCHEME_PREFIXES.iter().any(|prefix| {
        trimmed
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    });

    if has_scheme {
        trimmed.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, trimmed)
    }
}

/// Reduces a user-supplied URL to its origin, the icon cache key
///
/// # Normalization Steps
///
/// 1. Prefix `https://` when no http(s) scheme is present
/// 2. Parse the result; the parser lower-cases the host
/// 3. Keep only `scheme://host[:port]`, dropping default ports, paths,
///    queries and fragments
///
/// This never fails. When the input cannot be parsed the scheme-prefixed
/// string is returned unchanged, which still works as a (degraded) cache key.
///
/// # Arguments
///
/// * `raw` - The user-supplied URL
///
/// # Returns
///
/// The origin string
///
/// # Examples
///
/// ```
/// use bookmark_icons::url::normalize_origin;
///
/// assert_eq!(normalize_origin("example.com/page"), "https://example.com");
/// assert_eq!(normalize_origin("http://Example.COM:8080/a?b=c"), "http://example.com:8080");
/// ```
pub fn normalize_origin(raw: &str) -> String {
    let with_scheme = ensure_scheme(raw);

    match Url::parse(&with_scheme) {
        Ok(url) => origin_of(&url).unwrap_or(with_scheme),
        Err(e) => {
            tracing::debug!("Keeping unparseable URL {:?} as its own origin: {}", with_scheme, e);
            with_scheme
        }
    }
}

/// Formats the `scheme://host[:port]` origin of an already parsed URL
///
/// Returns `None` for URLs without a host (for example `data:` URLs).
pub fn origin_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let origin = match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    };
    Some(origin)
}
