//! Publisher-specific newsletter handlers.
//!
//! Each [`NewsletterHandler`] variant knows where one publisher puts the
//! "view in browser" permalink of an issue. Extraction is best effort: a
//! missing marker yields `None`, never an error.
//!
//! # Example
//!
//! ```
//! use omnivore_inbound::NewsletterHandler;
//!
//! let url = NewsletterHandler::Substack
//!     .newsletter_url("<https://hongbo130.substack.com/p/tldr>", "");
//! assert_eq!(url.as_deref(), Some("https://hongbo130.substack.com/p/tldr"));
//!
//! assert_eq!(NewsletterHandler::Default.author("Mike Allen <mike@axios.com>"), "Mike Allen");
//! ```

use crate::matcher::{AnchorMatcher, Matcher};
use std::fmt;
use std::sync::LazyLock;

static AXIOS_VIEW_IN_BROWSER: LazyLock<AnchorMatcher> =
    LazyLock::new(|| AnchorMatcher::after_text("View in browser at"));

static BLOOMBERG_VIEW_IN_BROWSER: LazyLock<AnchorMatcher> =
    LazyLock::new(|| AnchorMatcher::by_class("view-in-browser__url"));

static GOLANG_READ_ON_THE_WEB: LazyLock<AnchorMatcher> =
    LazyLock::new(|| AnchorMatcher::by_text("Read on the Web"));

/// What a handler extracted from one email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerResult {
    /// The publisher's permalink for the issue, when it could be found.
    pub canonical_url: Option<String>,
    /// Human author name, when the `From` header carried one.
    pub author: Option<String>,
}

/// A publisher-specific strategy for reading a newsletter issue.
///
/// Handlers are stateless; selection happens in [`crate::rules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NewsletterHandler {
    /// Fallback for unrecognised senders. Extracts no URL.
    #[default]
    Default,
    /// Substack: the `List-Post` header is the issue URL.
    Substack,
    /// Axios: the text of the link after "View in browser at".
    Axios,
    /// Bloomberg Business / Bloomberg View: the `view-in-browser__url` anchor.
    Bloomberg,
    /// Golang Weekly: the "Read on the Web" anchor.
    GolangWeekly,
}

impl NewsletterHandler {
    /// Every handler, in default dispatch order followed by the fallback.
    pub const ALL: [NewsletterHandler; 5] = [
        NewsletterHandler::Substack,
        NewsletterHandler::Axios,
        NewsletterHandler::Bloomberg,
        NewsletterHandler::GolangWeekly,
        NewsletterHandler::Default,
    ];

    /// Short, stable name used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            NewsletterHandler::Default => "default",
            NewsletterHandler::Substack => "substack",
            NewsletterHandler::Axios => "axios",
            NewsletterHandler::Bloomberg => "bloomberg",
            NewsletterHandler::GolangWeekly => "golang_weekly",
        }
    }

    /// Returns the canonical issue URL, if this publisher's marker is present.
    ///
    /// `raw_url` is the `List-Post` header (or equivalent link text) and
    /// `html` the message body.
    #[must_use]
    pub fn newsletter_url(self, raw_url: &str, html: &str) -> Option<String> {
        match self {
            NewsletterHandler::Default => None,
            NewsletterHandler::Substack => strip_angle_brackets(raw_url),
            NewsletterHandler::Axios => extract_url(&*AXIOS_VIEW_IN_BROWSER, html),
            NewsletterHandler::Bloomberg => extract_url(&*BLOOMBERG_VIEW_IN_BROWSER, html),
            NewsletterHandler::GolangWeekly => extract_url(&*GOLANG_READ_ON_THE_WEB, html),
        }
    }

    /// Returns the author name from a `From` header value.
    ///
    /// `"Display Name <email@domain>"` yields `Display Name`. Without an
    /// angle-bracket address the whole value is returned, trimmed. All
    /// publishers share this rule.
    #[must_use]
    pub fn author(self, from: &str) -> String {
        parse_author(from)
    }

    /// Runs both extractions and packages them as a [`HandlerResult`].
    #[must_use]
    pub fn extract(self, raw_url: &str, from: &str, html: &str) -> HandlerResult {
        let author = self.author(from);
        HandlerResult {
            canonical_url: self.newsletter_url(raw_url, html),
            author: (!author.is_empty()).then_some(author),
        }
    }
}

impl fmt::Display for NewsletterHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn extract_url(matcher: &dyn Matcher, html: &str) -> Option<String> {
    let found = matcher.find_match(html)?;
    let url = found.trim();
    (!url.is_empty()).then(|| url.to_string())
}

fn strip_angle_brackets(raw_url: &str) -> Option<String> {
    let trimmed = raw_url.trim();
    let bare = trimmed
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(trimmed)
        .trim();
    (!bare.is_empty()).then(|| bare.to_string())
}

fn parse_author(from: &str) -> String {
    let trimmed = from.trim();
    let Some(open) = trimmed.rfind('<') else {
        return trimmed.to_string();
    };
    let Some(close) = trimmed[open..].find('>') else {
        return trimmed.to_string();
    };

    let display = trimmed[..open].trim();
    let display = display
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(display)
        .trim();

    if display.is_empty() {
        trimmed[open + 1..open + close].trim().to_string()
    } else {
        display.to_string()
    }
}
