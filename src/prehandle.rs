//! URL prehandlers that canonicalize extracted article URLs.
//!
//! Some publishers decorate article links with tracking parameters that make
//! the same article look like different pages. A [`Prehandler`] recognises
//! such a publisher's URLs and rewrites them before they are stored.
//!
//! # Example
//!
//! ```
//! use omnivore_inbound::prehandle::canonicalize;
//!
//! assert_eq!(
//!     canonicalize("https://medium.com/@sam/post-1?source=rss----abc"),
//!     "https://medium.com/@sam/post-1"
//! );
//! assert_eq!(canonicalize("https://example.com/?source=x"), "https://example.com/?source=x");
//! ```

use crate::error::{Error, Result};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

static MEDIUM_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(www\.)?medium\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)")
        .expect("valid regex")
});

/// Tracking parameter Medium appends to shared and syndicated links.
const MEDIUM_TRACKING_PARAM: &str = "source";

/// A publisher-specific URL rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prehandler {
    /// medium.com: drops the `source` query parameter.
    Medium,
}

impl Prehandler {
    /// Every prehandler, in evaluation order.
    pub const ALL: [Prehandler; 1] = [Prehandler::Medium];

    /// Short, stable name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Prehandler::Medium => "medium",
        }
    }

    /// Returns `true` if this prehandler applies to `url`.
    #[must_use]
    pub fn should_prehandle(self, url: &str) -> bool {
        match self {
            Prehandler::Medium => MEDIUM_URL.is_match(url),
        }
    }

    /// Rewrites `url`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `url` cannot be parsed.
    pub fn prehandle(self, url: &str) -> Result<String> {
        let mut parsed = Url::parse(url).map_err(|source| Error::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        match self {
            Prehandler::Medium => remove_query_param(&mut parsed, MEDIUM_TRACKING_PARAM),
        }

        Ok(parsed.into())
    }
}

/// Returns the first prehandler that applies to `url`.
#[must_use]
pub fn find_prehandler(url: &str) -> Option<Prehandler> {
    Prehandler::ALL
        .into_iter()
        .find(|prehandler| prehandler.should_prehandle(url))
}

/// Applies the matching prehandler to `url`, if any.
///
/// A URL the prehandler cannot parse is returned unchanged.
#[must_use]
pub fn canonicalize(url: &str) -> Cow<'_, str> {
    let Some(prehandler) = find_prehandler(url) else {
        return Cow::Borrowed(url);
    };

    match prehandler.prehandle(url) {
        Ok(rewritten) => {
            debug!(prehandler = prehandler.name(), url, %rewritten, "Prehandled URL");
            Cow::Owned(rewritten)
        }
        Err(e) => {
            warn!(
                prehandler = prehandler.name(),
                url,
                error = %e,
                "Failed to prehandle URL, keeping original"
            );
            Cow::Borrowed(url)
        }
    }
}

/// Drops every `name=...` segment and keeps the others byte for byte.
fn remove_query_param(url: &mut Url, name: &str) {
    let Some(query) = url.query() else {
        return;
    };

    let segments: Vec<&str> = query.split('&').collect();
    let kept: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|segment| {
            !form_urlencoded::parse(segment.as_bytes())
                .next()
                .is_some_and(|(key, _)| key == name)
        })
        .collect();
    if kept.len() == segments.len() {
        return;
    }

    let kept = kept.join("&");
    url.set_query((!kept.is_empty()).then_some(kept.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_prehandle_medium() {
        assert!(Prehandler::Medium.should_prehandle("https://medium.com/@sam/post"));
        assert!(Prehandler::Medium.should_prehandle("http://www.medium.com/p/abc"));
        assert!(!Prehandler::Medium.should_prehandle("https://example.com/medium.com"));
        assert!(!Prehandler::Medium.should_prehandle("https://hongbo130.substack.com/p/tldr"));
    }

    #[test]
    fn test_strips_source_param() {
        assert_eq!(
            Prehandler::Medium
                .prehandle("https://medium.com/@sam/post-1?source=rss----abc&x=1")
                .unwrap(),
            "https://medium.com/@sam/post-1?x=1"
        );
    }

    #[test]
    fn test_strips_only_param() {
        assert_eq!(
            Prehandler::Medium
                .prehandle("https://medium.com/@sam/post-1?source=email")
                .unwrap(),
            "https://medium.com/@sam/post-1"
        );
    }

    #[test]
    fn test_keeps_other_params_verbatim() {
        assert_eq!(
            Prehandler::Medium
                .prehandle("https://medium.com/p/1?source=rss&redirect=https://a.com/b&flag")
                .unwrap(),
            "https://medium.com/p/1?redirect=https://a.com/b&flag"
        );
        assert_eq!(
            Prehandler::Medium
                .prehandle("https://medium.com/p/1?q=a%20b+c&%73ource=x&t=%2F")
                .unwrap(),
            "https://medium.com/p/1?q=a%20b+c&t=%2F"
        );
    }

    #[test]
    fn test_without_source_is_unchanged() {
        assert_eq!(
            Prehandler::Medium
                .prehandle("https://medium.com/p/1?redirect=https://a.com/b&flag")
                .unwrap(),
            "https://medium.com/p/1?redirect=https://a.com/b&flag"
        );
    }

    #[test]
    fn test_without_query_is_unchanged() {
        assert_eq!(
            Prehandler::Medium.prehandle("https://medium.com/p/abc").unwrap(),
            "https://medium.com/p/abc"
        );
    }

    #[test]
    fn test_find_prehandler() {
        assert_eq!(
            find_prehandler("https://medium.com/p/abc"),
            Some(Prehandler::Medium)
        );
        assert_eq!(find_prehandler("https://axios.com/x"), None);
    }

    #[test]
    fn test_canonicalize_unrelated_url_is_borrowed() {
        let url = "https://axios.com/x?source=a";
        assert!(matches!(canonicalize(url), Cow::Borrowed(u) if u == url));
    }

    #[test]
    fn test_prehandle_invalid_url() {
        let err = Prehandler::Medium.prehandle("medium.com/p/abc").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
