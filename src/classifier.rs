//! Classification of inbound emails.
//!
//! The [`Classifier`] is the main entry point for this crate. Given a
//! [`RawEmail`] it decides whether the message is a forwarding confirmation,
//! a newsletter issue, or something else, and extracts what the caller needs
//! to save it.
//!
//! # Example
//!
//! ```
//! use omnivore_inbound::{Classification, Classifier, NewsletterHandler, RawEmail};
//!
//! let classifier = Classifier::default();
//! let email = RawEmail::new("Mike Allen <mike@axios.com>", "Axios AM")
//!     .with_html("View in browser at <a>https://axios.com/newsletters/axios-am</a>");
//!
//! match classifier.classify(&email) {
//!     Classification::Newsletter(newsletter) => {
//!         assert_eq!(newsletter.handler, NewsletterHandler::Axios);
//!         assert_eq!(newsletter.result.author.as_deref(), Some("Mike Allen"));
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use crate::config::ClassifierConfig;
use crate::email::RawEmail;
use crate::handler::{HandlerResult, NewsletterHandler};
use crate::prehandle;
use crate::unsubscribe::{parse_unsubscribe, Unsubscribe};
use tracing::{debug, instrument};

/// A newsletter issue ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newsletter {
    /// The handler that read the issue.
    pub handler: NewsletterHandler,
    /// Canonical URL and author.
    pub result: HandlerResult,
    /// Unsubscribe targets from the `List-Unsubscribe` header.
    pub unsubscribe: Unsubscribe,
}

/// What an inbound email turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A forwarding confirmation email.
    Confirmation {
        /// The confirmation code, when the subject carried one.
        code: Option<String>,
    },
    /// A newsletter issue.
    Newsletter(Newsletter),
    /// No publisher matched and the email has no usable unsubscribe target.
    ///
    /// Carries what the default handler could extract.
    Unrecognized(HandlerResult),
}

impl Classification {
    /// Returns `true` for [`Classification::Confirmation`].
    #[must_use]
    pub fn is_confirmation(&self) -> bool {
        matches!(self, Classification::Confirmation { .. })
    }

    /// Returns the newsletter, if this email is one.
    #[must_use]
    pub fn as_newsletter(&self) -> Option<&Newsletter> {
        match self {
            Classification::Newsletter(newsletter) => Some(newsletter),
            _ => None,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Classification::Confirmation { .. } => "confirmation",
            Classification::Newsletter(_) => "newsletter",
            Classification::Unrecognized(_) => "unrecognized",
        }
    }
}

/// Classifies inbound emails according to a [`ClassifierConfig`].
///
/// Classification is pure and never fails; a `Classifier` can be shared
/// freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Creates a classifier from a configuration.
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Selects the handler for an email using the configured rules.
    #[must_use]
    pub fn handler_for(&self, email: &RawEmail) -> NewsletterHandler {
        self.config.rules.select(email.raw_url(), email.from())
    }

    /// Classifies one email.
    #[instrument(
        name = "Classifier::classify",
        skip_all,
        fields(has_raw_url = !email.raw_url().is_empty())
    )]
    pub fn classify(&self, email: &RawEmail) -> Classification {
        if self.config.confirmation_sender.matches(email.from()) {
            let code = crate::confirmation::get_confirmation_code(email.subject());
            debug!(has_code = code.is_some(), "Forwarding confirmation email");
            return Classification::Confirmation { code };
        }

        let handler = self.handler_for(email);
        let mut result = handler.extract(email.raw_url(), email.from(), email.html());

        if self.config.canonicalize_urls {
            if let Some(url) = result.canonical_url.take() {
                result.canonical_url = Some(prehandle::canonicalize(&url).into_owned());
            }
        }

        let unsubscribe = email.unsubscribe().map(parse_unsubscribe).unwrap_or_default();

        debug!(
            handler = handler.name(),
            has_url = result.canonical_url.is_some(),
            has_author = result.author.is_some(),
            has_unsubscribe = !unsubscribe.is_empty(),
            "Extracted newsletter fields"
        );

        if handler == NewsletterHandler::Default && unsubscribe.is_empty() {
            return Classification::Unrecognized(result);
        }

        Classification::Newsletter(Newsletter {
            handler,
            result,
            unsubscribe,
        })
    }
}
