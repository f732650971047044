//! Sender rules and handler dispatch.
//!
//! A [`RuleTable`] is an ordered list of `(Predicate, NewsletterHandler)`
//! pairs. Dispatch walks the list and returns the handler of the first rule
//! whose predicate matches; when none does, [`NewsletterHandler::Default`]
//! is returned.
//!
//! # Example
//!
//! ```
//! use omnivore_inbound::rules::{get_newsletter_handler, Predicate, Rule, RuleTable};
//! use omnivore_inbound::NewsletterHandler;
//!
//! // Built-in table
//! assert_eq!(
//!     get_newsletter_handler("", "Mike Allen <mike@axios.com>"),
//!     NewsletterHandler::Axios
//! );
//!
//! // Extend it for an application
//! let mut table = RuleTable::with_defaults();
//! table.push(Rule::new(
//!     Predicate::from_contains("news.bloomberg.com"),
//!     NewsletterHandler::Bloomberg,
//! ));
//! assert_eq!(
//!     table.select("", "Bloomberg <noreply@news.bloomberg.com>"),
//!     NewsletterHandler::Bloomberg
//! );
//! ```

use crate::error::{Error, Result};
use crate::handler::NewsletterHandler;
use regex::Regex;
use std::sync::LazyLock;

/// The built-in rule table.
static DEFAULT_RULES: LazyLock<RuleTable> = LazyLock::new(|| RuleTable {
    rules: vec![
        Rule::new(
            Predicate::raw_url_contains("substack.com"),
            NewsletterHandler::Substack,
        ),
        Rule::new(
            Predicate::from_contains("axios.com"),
            NewsletterHandler::Axios,
        ),
        Rule::new(
            Predicate::from_contains_any(["mail.bloombergbusiness.com", "mail.bloombergview.com"]),
            NewsletterHandler::Bloomberg,
        ),
        Rule::new(
            Predicate::from_contains("golangweekly.com"),
            NewsletterHandler::GolangWeekly,
        ),
    ],
});

/// A test over the raw URL and `From` header of an email.
///
/// Checks are plain substring or regex tests on the header text; the `From`
/// value is never parsed as an address.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// `raw_url` contains the substring.
    RawUrlContains(String),
    /// `from` contains the substring.
    FromContains(String),
    /// `from` contains at least one of the substrings.
    FromContainsAny(Vec<String>),
    /// `from` matches the regex.
    FromMatches(Regex),
}

impl Predicate {
    /// `raw_url` contains `needle`.
    #[must_use]
    pub fn raw_url_contains(needle: impl Into<String>) -> Self {
        Predicate::RawUrlContains(needle.into())
    }

    /// `from` contains `needle`.
    #[must_use]
    pub fn from_contains(needle: impl Into<String>) -> Self {
        Predicate::FromContains(needle.into())
    }

    /// `from` contains any of `needles`.
    #[must_use]
    pub fn from_contains_any<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::FromContainsAny(needles.into_iter().map(Into::into).collect())
    }

    /// `from` matches the regex `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern does not compile.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Predicate::FromMatches)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn matches(&self, raw_url: &str, from: &str) -> bool {
        match self {
            Predicate::RawUrlContains(needle) => raw_url.contains(needle.as_str()),
            Predicate::FromContains(needle) => from.contains(needle.as_str()),
            Predicate::FromContainsAny(needles) => {
                needles.iter().any(|needle| from.contains(needle.as_str()))
            }
            Predicate::FromMatches(regex) => regex.is_match(from),
        }
    }
}

/// One entry of a [`RuleTable`].
#[derive(Debug, Clone)]
pub struct Rule {
    /// When the rule applies.
    pub predicate: Predicate,
    /// The handler selected when it does.
    pub handler: NewsletterHandler,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    pub fn new(predicate: Predicate, handler: NewsletterHandler) -> Self {
        Self { predicate, handler }
    }
}

/// Returns the handler of the first rule in `rules` that matches.
///
/// Falls back to [`NewsletterHandler::Default`] when nothing matches.
#[must_use]
pub fn select_handler(rules: &[Rule], raw_url: &str, from: &str) -> NewsletterHandler {
    rules
        .iter()
        .find(|rule| rule.predicate.matches(raw_url, from))
        .map_or(NewsletterHandler::Default, |rule| rule.handler)
}

/// Selects a handler using the built-in rule table.
///
/// # Example
///
/// ```
/// use omnivore_inbound::rules::get_newsletter_handler;
/// use omnivore_inbound::NewsletterHandler;
///
/// assert_eq!(
///     get_newsletter_handler("<https://hongbo130.substack.com/p/tldr>", ""),
///     NewsletterHandler::Substack
/// );
/// assert_eq!(get_newsletter_handler("", "someone@example.com"), NewsletterHandler::Default);
/// ```
#[must_use]
pub fn get_newsletter_handler(raw_url: &str, from: &str) -> NewsletterHandler {
    DEFAULT_RULES.select(raw_url, from)
}

/// An ordered, inspectable list of dispatch rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Creates an empty table. Every email dispatches to the default handler.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates a table holding the built-in publisher rules.
    #[must_use]
    pub fn with_defaults() -> Self {
        DEFAULT_RULES.clone()
    }

    /// Appends a rule with the lowest priority.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Inserts a rule with the highest priority.
    pub fn prepend(&mut self, rule: Rule) {
        self.rules.insert(0, rule);
    }

    /// Appends several rules in order.
    pub fn extend<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = Rule>,
    {
        self.rules.extend(rules);
    }

    /// Returns the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Selects the handler for an email; first matching rule wins.
    #[must_use]
    pub fn select(&self, raw_url: &str, from: &str) -> NewsletterHandler {
        select_handler(&self.rules, raw_url, from)
    }
}

impl FromIterator<Rule> for RuleTable {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substack() {
        assert_eq!(
            get_newsletter_handler("<https://hongbo130.substack.com/p/tldr>", ""),
            NewsletterHandler::Substack
        );
    }

    #[test]
    fn test_axios() {
        assert_eq!(
            get_newsletter_handler("", "Mike Allen <mike@axios.com>"),
            NewsletterHandler::Axios
        );
    }

    #[test]
    fn test_bloomberg_business_and_view() {
        assert_eq!(
            get_newsletter_handler("", "From: Bloomberg <noreply@mail.bloombergbusiness.com>"),
            NewsletterHandler::Bloomberg
        );
        assert_eq!(
            get_newsletter_handler("", "From: Bloomberg <noreply@mail.bloombergview.com>"),
            NewsletterHandler::Bloomberg
        );
    }

    #[test]
    fn test_golang_weekly() {
        assert_eq!(
            get_newsletter_handler("", "Golang Weekly <peter@golangweekly.com>"),
            NewsletterHandler::GolangWeekly
        );
    }

    #[test]
    fn test_unmatched_falls_back_to_default() {
        assert_eq!(
            get_newsletter_handler("https://example.com/post", "Someone <a@example.com>"),
            NewsletterHandler::Default
        );
        assert_eq!(get_newsletter_handler("", ""), NewsletterHandler::Default);
    }

    #[test]
    fn test_predicates_are_case_sensitive() {
        assert_eq!(
            get_newsletter_handler("", "Mike Allen <mike@AXIOS.COM>"),
            NewsletterHandler::Default
        );
    }

    #[test]
    fn test_first_match_wins() {
        // Substack raw URL and Axios sender both match; Substack is listed first.
        assert_eq!(
            get_newsletter_handler("<https://x.substack.com/p/1>", "Mike <mike@axios.com>"),
            NewsletterHandler::Substack
        );

        let rules = [
            Rule::new(Predicate::from_contains("example.com"), NewsletterHandler::GolangWeekly),
            Rule::new(Predicate::from_contains("example.com"), NewsletterHandler::Axios),
        ];
        assert_eq!(
            select_handler(&rules, "", "a@example.com"),
            NewsletterHandler::GolangWeekly
        );
    }

    #[test]
    fn test_empty_rules() {
        assert_eq!(
            select_handler(&[], "<https://x.substack.com/p/1>", "mike@axios.com"),
            NewsletterHandler::Default
        );
        let table = RuleTable::new();
        assert!(table.is_empty());
        assert_eq!(table.select("", "mike@axios.com"), NewsletterHandler::Default);
    }

    #[test]
    fn test_table_with_defaults() {
        let table = RuleTable::with_defaults();
        assert_eq!(table.len(), 4);
        let order: Vec<_> = table.rules().iter().map(|r| r.handler).collect();
        assert_eq!(
            order,
            [
                NewsletterHandler::Substack,
                NewsletterHandler::Axios,
                NewsletterHandler::Bloomberg,
                NewsletterHandler::GolangWeekly,
            ]
        );
    }

    #[test]
    fn test_prepend_overrides_default_order() {
        let mut table = RuleTable::with_defaults();
        table.prepend(Rule::new(
            Predicate::from_contains("axios.com"),
            NewsletterHandler::Default,
        ));
        assert_eq!(
            table.select("", "Mike Allen <mike@axios.com>"),
            NewsletterHandler::Default
        );
    }

    #[test]
    fn test_regex_predicate() {
        let predicate = Predicate::from_pattern(r"@(mail|news)\.bloomberg\.com>$").unwrap();
        assert!(predicate.matches("", "Bloomberg <noreply@news.bloomberg.com>"));
        assert!(!predicate.matches("", "Bloomberg <noreply@bloomberg.com>"));

        let table: RuleTable = [Rule::new(predicate, NewsletterHandler::Bloomberg)]
            .into_iter()
            .collect();
        assert_eq!(
            table.select("", "Bloomberg <noreply@mail.bloomberg.com>"),
            NewsletterHandler::Bloomberg
        );
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Predicate::from_pattern("(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
