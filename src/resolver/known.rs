//! Known-service shortcuts
//!
//! A handful of very common sites either hide their icon behind sign-in
//! redirects or serve it from a separate CDN. For those the icon URL is
//! hard-coded and no page is ever fetched.

use crate::url::bare_domain;
use url::Url;

/// Bare domain to icon URL
pub const KNOWN_SERVICE_ICONS: &[(&str, &str)] = &[
    ("gmail.com", "https://ssl.gstatic.com/ui/v1/icons/mail/rfr/gmail.ico"),
    ("mail.google.com", "https://ssl.gstatic.com/ui/v1/icons/mail/rfr/gmail.ico"),
    ("google.com", "https://www.google.com/favicon.ico"),
    ("youtube.com", "https://www.youtube.com/favicon.ico"),
    ("github.com", "https://github.com/favicon.ico"),
    ("stackoverflow.com", "https://cdn.sstatic.net/Sites/stackoverflow/Img/favicon.ico"),
    ("twitter.com", "https://abs.twimg.com/favicons/twitter.ico"),
    ("facebook.com", "https://static.xx.fbcdn.net/rsrc.php/yV/r/hzMapiNYYpW.ico"),
    ("linkedin.com", "https://static.licdn.com/sc/h/1bt1uwq5akv756knzdj4l6cdc"),
];

/// Looks up the hard-coded icon for a URL
///
/// Matching is exact on the bare domain, so `docs.github.com` is not a hit.
///
/// # Examples
///
/// ```
/// use bookmark_icons::resolver::known_service_icon;
/// use url::Url;
///
/// let url = Url::parse("https://www.github.com/rust-lang/rust").unwrap();
/// assert_eq!(known_service_icon(&url), Some("https://github.com/favicon.ico"));
/// ```
pub fn known_service_icon(url: &Url) -> Option<&'static str> {
    let domain = bare_domain(url)?;
    KNOWN_SERVICE_ICONS
        .iter()
        .find(|(known, _)| *known == domain)
        .map(|(_, icon)| *icon)
}
