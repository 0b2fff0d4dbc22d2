//! Cascade stage definitions
//!
//! A resolution walks these stages in declaration order and stops at the
//! first one that produces an icon.
use std::fmt;

/// The stage a resolution terminated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Served from the icon cache without touching the network
    CacheCheck,

    /// Hard-coded icon for a well-known service
    KnownService,

    // ===== Page Discovery =====
    /// HEAD probe of the conventional icon paths
    StandardLocation,

    /// `<link>` icon declarations in the page HTML
    HtmlCandidates,

    /// Text patterns over the raw page HTML
    RegexFallback,

    /// Last resort: GET `/favicon.ico` directly
    DefaultIcon,
}

impl Stage {
    /// Stable lowercase name, used in logs and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CacheCheck => "cache",
            Self::KnownService => "known_service",
            Self::StandardLocation => "standard_location",
            Self::HtmlCandidates => "html_candidates",
            Self::RegexFallback => "regex_fallback",
            Self::DefaultIcon => "default_icon",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_is_cascade_order() {
        assert!(Stage::CacheCheck < Stage::KnownService);
        assert!(Stage::KnownService < Stage::StandardLocation);
        assert!(Stage::StandardLocation < Stage::HtmlCandidates);
        assert!(Stage::HtmlCandidates < Stage::RegexFallback);
        assert!(Stage::RegexFallback < Stage::DefaultIcon);
    }

    #[test]
    fn test_display() {
        assert_eq!(Stage::DefaultIcon.to_string(), "default_icon");
        assert_eq!(format!("{}", Stage::CacheCheck), "cache");
    }
}
