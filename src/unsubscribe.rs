//! `List-Unsubscribe` header parsing.

use regex::Regex;
use std::sync::LazyLock;

static ENTRY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<([^>]*)>").expect("valid regex"));

/// Unsubscribe targets advertised by a newsletter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unsubscribe {
    /// `mailto:` target, without the scheme.
    pub mail_to: Option<String>,
    /// `http` or `https` target.
    pub http_url: Option<String>,
}

impl Unsubscribe {
    /// Returns `true` if neither target was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mail_to.is_none() && self.http_url.is_none()
    }
}

/// Parses a `List-Unsubscribe` header value.
///
/// The header is a comma separated list of `<uri>` entries. The first
/// `mailto:` entry and the first `http(s)` entry are kept; anything else is
/// ignored.
///
/// # Example
///
/// ```
/// use omnivore_inbound::unsubscribe::parse_unsubscribe;
///
/// let unsub = parse_unsubscribe("<mailto:u@list.example.com?subject=unsub>, <https://example.com/u/1>");
/// assert_eq!(unsub.mail_to.as_deref(), Some("u@list.example.com?subject=unsub"));
/// assert_eq!(unsub.http_url.as_deref(), Some("https://example.com/u/1"));
/// ```
#[must_use]
pub fn parse_unsubscribe(header: &str) -> Unsubscribe {
    let mut unsubscribe = Unsubscribe::default();

    for caps in ENTRY.captures_iter(header) {
        let entry = caps[1].trim();
        if let Some(target) = strip_scheme(entry, "mailto:") {
            if unsubscribe.mail_to.is_none() && !target.is_empty() {
                unsubscribe.mail_to = Some(target.to_string());
            }
        } else if (starts_with_ignore_case(entry, "https://")
            || starts_with_ignore_case(entry, "http://"))
            && unsubscribe.http_url.is_none()
        {
            unsubscribe.http_url = Some(entry.to_string());
        }
    }

    unsubscribe
}

fn strip_scheme<'a>(entry: &'a str, scheme: &str) -> Option<&'a str> {
    starts_with_ignore_case(entry, scheme).then(|| entry[scheme.len()..].trim())
}

fn starts_with_ignore_case(entry: &str, prefix: &str) -> bool {
    entry
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
