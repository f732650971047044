//! Configuration for the inbound email [`Classifier`](crate::Classifier).
//!
//! Use [`ClassifierConfigBuilder`] to create a configuration with sensible defaults:
//!
//! ```
//! use omnivore_inbound::ClassifierConfig;
//!
//! let config = ClassifierConfig::builder()
//!     .canonicalize_urls(false)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.rules.len(), 4);
//! ```

use crate::confirmation::ConfirmationSender;
use crate::error::Result;
use crate::rules::{Rule, RuleTable};

/// Configuration for classifying inbound emails.
///
/// Create using [`ClassifierConfig::builder()`].
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Sender of forwarding confirmation emails.
    pub confirmation_sender: ConfirmationSender,
    /// Ordered publisher rules.
    pub rules: RuleTable,
    /// Whether extracted URLs are passed through the URL prehandlers.
    pub canonicalize_urls: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confirmation_sender: ConfirmationSender::gmail(),
            rules: RuleTable::with_defaults(),
            canonicalize_urls: true,
        }
    }
}

impl ClassifierConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ClassifierConfigBuilder {
        ClassifierConfigBuilder::default()
    }
}

/// Builder for [`ClassifierConfig`].
#[derive(Debug, Default)]
pub struct ClassifierConfigBuilder {
    confirmation_sender: Option<(String, String)>,
    rules: Option<RuleTable>,
    extra_rules: Vec<Rule>,
    canonicalize_urls: Option<bool>,
}

impl ClassifierConfigBuilder {
    /// Sets the forwarding confirmation sender.
    ///
    /// Default is `Gmail Team <forwarding-noreply@google.com>`. The address
    /// is validated during [`build()`](Self::build).
    #[must_use]
    pub fn confirmation_sender(
        mut self,
        display_name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        self.confirmation_sender = Some((display_name.into(), address.into()));
        self
    }

    /// Replaces the rule table.
    ///
    /// Default is [`RuleTable::with_defaults`].
    #[must_use]
    pub fn rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Appends a rule after the table's existing rules.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.extra_rules.push(rule);
        self
    }

    /// Enables or disables URL canonicalization. Default is enabled.
    #[must_use]
    pub fn canonicalize_urls(mut self, enabled: bool) -> Self {
        self.canonicalize_urls = Some(enabled);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the confirmation sender is invalid.
    pub fn build(self) -> Result<ClassifierConfig> {
        let confirmation_sender = match self.confirmation_sender {
            Some((display_name, address)) => ConfirmationSender::new(display_name, &address)?,
            None => ConfirmationSender::gmail(),
        };

        let mut rules = self.rules.unwrap_or_else(RuleTable::with_defaults);
        rules.extend(self.extra_rules);

        Ok(ClassifierConfig {
            confirmation_sender,
            rules,
            canonicalize_urls: self.canonicalize_urls.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::rules::Predicate;
    use crate::NewsletterHandler;

    #[test]
    fn test_builder_defaults() {
        let config = ClassifierConfig::builder().build().unwrap();
        assert_eq!(config.confirmation_sender, ConfirmationSender::gmail());
        assert_eq!(config.rules.len(), 4);
        assert!(config.canonicalize_urls);
    }

    #[test]
    fn test_builder_full() {
        let config = ClassifierConfig::builder()
            .confirmation_sender("Fastmail", "forward@fastmail.com")
            .rules(RuleTable::new())
            .rule(Rule::new(
                Predicate::from_contains("example.com"),
                NewsletterHandler::GolangWeekly,
            ))
            .canonicalize_urls(false)
            .build()
            .unwrap();

        assert_eq!(config.confirmation_sender.address(), "forward@fastmail.com");
        assert_eq!(config.rules.len(), 1);
        assert!(!config.canonicalize_urls);
    }

    #[test]
    fn test_extra_rules_append_to_defaults() {
        let config = ClassifierConfig::builder()
            .rule(Rule::new(
                Predicate::from_contains("news.bloomberg.com"),
                NewsletterHandler::Bloomberg,
            ))
            .build()
            .unwrap();

        assert_eq!(config.rules.len(), 5);
        assert_eq!(
            config.rules.select("", "Bloomberg <noreply@news.bloomberg.com>"),
            NewsletterHandler::Bloomberg
        );
    }

    #[test]
    fn test_builder_invalid_sender() {
        let result = ClassifierConfig::builder()
            .confirmation_sender("Fastmail", "invalid-email")
            .build();
        assert!(matches!(result, Err(Error::InvalidEmailFormat { .. })));
    }
}
