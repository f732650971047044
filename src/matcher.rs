//! Content matching for extracting data from newsletter bodies and headers.
//!
//! This module provides a small [`Matcher`] trait and the two implementations
//! the publisher handlers are built from: [`RegexMatcher`] for textual
//! templates and [`AnchorMatcher`] for HTML links.
//!
//! # Example
//!
//! ```
//! use omnivore_inbound::matcher::{AnchorMatcher, Matcher, RegexMatcher};
//!
//! let code = RegexMatcher::new(r"\(#(\d+)\)").unwrap();
//! assert_eq!(code.find_match("(#42) Confirm").as_deref(), Some("42"));
//!
//! let link = AnchorMatcher::by_text("Read on the Web");
//! let html = r#"<a href="https://example.com/1">Read on the Web</a>"#;
//! assert_eq!(link.find_match(html).as_deref(), Some("https://example.com/1"));
//! ```

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::borrow::Cow;
use std::sync::LazyLock;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// Trait for matching and extracting content from email text.
///
/// # Example
///
/// ```
/// use omnivore_inbound::matcher::Matcher;
/// use std::borrow::Cow;
///
/// struct FirstLine;
///
/// impl Matcher for FirstLine {
///     fn find_match<'a>(&self, text: &'a str) -> Option<Cow<'a, str>> {
///         text.lines().next().map(Cow::Borrowed)
///     }
///
///     fn description(&self) -> &str {
///         "first line"
///     }
/// }
/// ```
pub trait Matcher: Send + Sync {
    /// Attempts to find and extract matching content from the text.
    ///
    /// Returns `Some(matched_value)` if found, `None` otherwise.
    fn find_match<'a>(&self, text: &'a str) -> Option<Cow<'a, str>>;

    /// Returns a human-readable description of what this matcher looks for.
    ///
    /// Used in logging.
    fn description(&self) -> &str;
}

/// Regex-based matcher that extracts the first capture group.
///
/// # Example
///
/// ```
/// use omnivore_inbound::matcher::{RegexMatcher, Matcher};
///
/// let matcher = RegexMatcher::new(r"code:\s*(\d+)").unwrap();
/// assert_eq!(matcher.find_match("Your code: 42"), Some("42".into()));
/// ```
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
    description: String,
}

impl RegexMatcher {
    /// Creates a new regex matcher.
    ///
    /// The first capture group is extracted as the match result.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Self {
            description: format!("regex pattern: {pattern}"),
            regex,
        })
    }

    /// Creates a new regex matcher with a custom description.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn with_description(
        pattern: &str,
        description: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Self {
            description: description.into(),
            regex,
        })
    }
}

impl Matcher for RegexMatcher {
    fn find_match<'a>(&self, text: &'a str) -> Option<Cow<'a, str>> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| Cow::Borrowed(m.as_str()))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// How an [`AnchorMatcher`] recognises its link.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AnchorRule {
    /// Anchor whose trimmed visible text equals the phrase; yields `href`.
    Text(String),
    /// Anchor carrying the CSS class; yields `href`.
    Class(String),
    /// First anchor after a text node containing the marker; yields its text.
    AfterText(String),
}

/// Matcher that looks up an `<a>` element in an HTML body.
///
/// The HTML is parsed as a fragment, so partial bodies and full documents
/// both work. Text and class rules yield the `href` and skip anchors without
/// one. The marker rule yields the anchor's visible text, entity-decoded and
/// whitespace-collapsed.
///
/// # Example
///
/// ```
/// use omnivore_inbound::matcher::{AnchorMatcher, Matcher};
///
/// let matcher = AnchorMatcher::by_class("view-in-browser__url");
/// let html = r#"<a class="view-in-browser__url" href="https://example.com/x">View</a>"#;
/// assert_eq!(matcher.find_match(html).as_deref(), Some("https://example.com/x"));
/// ```
#[derive(Debug, Clone)]
pub struct AnchorMatcher {
    rule: AnchorRule,
    description: String,
}

impl AnchorMatcher {
    /// Matches the first anchor whose visible text is exactly `text` (after trimming).
    #[must_use]
    pub fn by_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            description: format!("anchor with text '{text}'"),
            rule: AnchorRule::Text(text),
        }
    }

    /// Matches the first anchor carrying the CSS class `class`.
    #[must_use]
    pub fn by_class(class: impl Into<String>) -> Self {
        let class = class.into();
        Self {
            description: format!("anchor with class '{class}'"),
            rule: AnchorRule::Class(class),
        }
    }

    /// Matches the first anchor following a text node that contains `marker`,
    /// returning the anchor's visible text rather than its `href`.
    ///
    /// ```
    /// use omnivore_inbound::matcher::{AnchorMatcher, Matcher};
    ///
    /// let matcher = AnchorMatcher::after_text("View in browser at");
    /// let html = "View in browser at <a>https://example.com/?a=1&amp;b=2</a>";
    /// assert_eq!(matcher.find_match(html).as_deref(), Some("https://example.com/?a=1&b=2"));
    /// ```
    #[must_use]
    pub fn after_text(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        Self {
            description: format!("anchor after text '{marker}'"),
            rule: AnchorRule::AfterText(marker),
        }
    }

    fn accepts(&self, anchor: &ElementRef<'_>) -> bool {
        match &self.rule {
            AnchorRule::Text(text) => anchor_text(anchor) == *text,
            AnchorRule::Class(class) => anchor.value().classes().any(|c| c == class),
            AnchorRule::AfterText(_) => false,
        }
    }
}

impl Matcher for AnchorMatcher {
    fn find_match<'a>(&self, text: &'a str) -> Option<Cow<'a, str>> {
        let fragment = Html::parse_fragment(text);
        if let AnchorRule::AfterText(marker) = &self.rule {
            return text_after_marker(&fragment, marker).map(Cow::Owned);
        }
        fragment
            .select(&ANCHOR_SELECTOR)
            .filter(|anchor| self.accepts(anchor))
            .find_map(|anchor| {
                let href = anchor.value().attr("href")?.trim();
                (!href.is_empty()).then(|| Cow::Owned(href.to_string()))
            })
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Visible text of an anchor with whitespace runs collapsed.
fn anchor_text(anchor: &ElementRef<'_>) -> String {
    anchor
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first non-empty anchor that follows `marker` in document order.
fn text_after_marker(fragment: &Html, marker: &str) -> Option<String> {
    let mut marker_seen = false;
    for node in fragment.root_element().descendants() {
        if !marker_seen {
            marker_seen = node
                .value()
                .as_text()
                .is_some_and(|text| text.contains(marker));
            continue;
        }
        let Some(anchor) = ElementRef::wrap(node) else {
            continue;
        };
        if anchor.value().name() == "a" {
            let text = anchor_text(&anchor);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_matcher() {
        let matcher = RegexMatcher::new(r"code:\s*(\d+)").unwrap();
        assert_eq!(
            matcher.find_match("Your code: 12345").as_deref(),
            Some("12345")
        );
        assert_eq!(matcher.find_match("No code here"), None);
    }

    #[test]
    fn test_regex_matcher_returns_borrowed() {
        let matcher = RegexMatcher::new(r"code:\s*(\d+)").unwrap();
        let result = matcher.find_match("Your code: 12345");
        assert!(matches!(result, Some(Cow::Borrowed(_))));
    }

    #[test]
    fn test_regex_matcher_description() {
        let matcher = RegexMatcher::with_description(r"(\d+)", "digits").unwrap();
        assert_eq!(matcher.description(), "digits");
        assert!(RegexMatcher::new("(").is_err());
    }

    #[test]
    fn test_anchor_by_text() {
        let matcher = AnchorMatcher::by_text("Read on the Web");
        let html = r#"
            <p><a href="https://example.com/unsub">Unsubscribe</a></p>
            <a href="https://example.com/issue/1" style="text-decoration: none">Read on the Web</a>
        "#;
        assert_eq!(
            matcher.find_match(html).as_deref(),
            Some("https://example.com/issue/1")
        );
    }

    #[test]
    fn test_anchor_by_text_collapses_whitespace() {
        let matcher = AnchorMatcher::by_text("Read on the Web");
        let html = "<a href=\"https://example.com/2\">\n  Read on\n  the <b>Web</b>\n</a>";
        assert_eq!(
            matcher.find_match(html).as_deref(),
            Some("https://example.com/2")
        );
    }

    #[test]
    fn test_anchor_by_text_requires_exact_text() {
        let matcher = AnchorMatcher::by_text("Read on the Web");
        let html = r#"<a href="https://example.com/3">Read on the Web today</a>"#;
        assert_eq!(matcher.find_match(html), None);
    }

    #[test]
    fn test_anchor_by_class() {
        let matcher = AnchorMatcher::by_class("view-in-browser__url");
        let html = r#"
            <a class="footer" href="https://example.com/footer">Footer</a>
            <a class="link view-in-browser__url" href=" https://example.com/news ">View in browser</a>
        "#;
        assert_eq!(
            matcher.find_match(html).as_deref(),
            Some("https://example.com/news")
        );
    }

    #[test]
    fn test_anchor_without_href_is_skipped() {
        let matcher = AnchorMatcher::by_class("view-in-browser__url");
        let html = r#"<a class="view-in-browser__url">View in browser</a>"#;
        assert_eq!(matcher.find_match(html), None);
    }

    #[test]
    fn test_anchor_after_text_decodes_entities() {
        let matcher = AnchorMatcher::after_text("View in browser at");
        let html = "View in browser at <a>https://axios.com/x?a=1&amp;b=2</a>";
        assert_eq!(
            matcher.find_match(html).as_deref(),
            Some("https://axios.com/x?a=1&b=2")
        );
    }

    #[test]
    fn test_anchor_after_text_reads_nested_markup() {
        let matcher = AnchorMatcher::after_text("View in browser at");
        let html = r#"<p><a href="https://axios.com/old">Earlier</a></p>
            <td>View in browser at <a href="x"><span>
                https://axios.com/y
            </span></a></td>"#;
        assert_eq!(matcher.find_match(html).as_deref(), Some("https://axios.com/y"));
    }

    #[test]
    fn test_anchor_after_text_needs_marker() {
        let matcher = AnchorMatcher::after_text("View in browser at");
        assert_eq!(matcher.find_match("<a>https://axios.com/z</a>"), None);
        assert_eq!(matcher.find_match("View in browser at <a> </a>"), None);
        assert_eq!(matcher.description(), "anchor after text 'View in browser at'");
    }
}
