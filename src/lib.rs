//! # omnivore-inbound
//!
//! Classification of emails forwarded to an Omnivore inbox.
//!
//! This crate provides a synchronous, side-effect free API for:
//! - Recognising mail-forwarding confirmation emails and their codes
//! - Selecting a publisher-specific handler for a newsletter issue
//! - Extracting the issue's canonical "view in browser" URL and author
//!
//! ## Quick Start
//!
//! ```
//! use omnivore_inbound::{Classification, Classifier, RawEmail};
//!
//! let raw = b"From: Golang Weekly <peter@golangweekly.com>\r\n\
//! Subject: Go 1.99 is out\r\n\
//! Content-Type: text/html\r\n\
//! \r\n\
//! <a href=\"https://golangweekly.com/issues/500\">Read on the Web</a>";
//!
//! let email = RawEmail::parse(raw)?;
//! let classifier = Classifier::default();
//!
//! if let Classification::Newsletter(newsletter) = classifier.classify(&email) {
//!     assert_eq!(
//!         newsletter.result.canonical_url.as_deref(),
//!         Some("https://golangweekly.com/issues/500")
//!     );
//!     assert_eq!(newsletter.result.author.as_deref(), Some("Golang Weekly"));
//! }
//! # Ok::<(), omnivore_inbound::Error>(())
//! ```
//!
//! ## Lower-level functions
//!
//! ```
//! use omnivore_inbound::{get_newsletter_handler, is_confirmation_email, NewsletterHandler};
//!
//! assert!(is_confirmation_email("Gmail Team <forwarding-noreply@google.com>"));
//!
//! let handler = get_newsletter_handler("<https://hongbo130.substack.com/p/tldr>", "");
//! assert_eq!(handler, NewsletterHandler::Substack);
//! assert_eq!(
//!     handler.newsletter_url("<https://hongbo130.substack.com/p/tldr>", "").as_deref(),
//!     Some("https://hongbo130.substack.com/p/tldr")
//! );
//! ```
//!
//! ## Custom Rules
//!
//! ```
//! use omnivore_inbound::rules::{Predicate, Rule};
//! use omnivore_inbound::{ClassifierConfig, Classifier, NewsletterHandler, RawEmail};
//!
//! let config = ClassifierConfig::builder()
//!     .rule(Rule::new(
//!         Predicate::from_pattern(r"@news\.bloomberg\.com>$")?,
//!         NewsletterHandler::Bloomberg,
//!     ))
//!     .build()?;
//!
//! let email = RawEmail::new("Bloomberg <noreply@news.bloomberg.com>", "Evening Briefing");
//! assert_eq!(Classifier::new(config).handler_for(&email), NewsletterHandler::Bloomberg);
//! # Ok::<(), omnivore_inbound::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Classification and extraction never fail; a missing marker is `None`.
//! [`Error`] is returned only by configuration, MIME parsing and URL
//! prehandling. Use [`Error::category`] to group errors in logs.
//!
//! ## Observability
//!
//! The crate uses `tracing` for instrumentation.
//!
//! ### Span Naming Convention
//!
//! - `RawEmail::parse` - MIME parsing
//! - `Classifier::classify` - Classification of one email
//!
//! ### Standard Fields
//!
//! - `handler` - Selected handler name
//! - `prehandler` - URL prehandler name
//! - `has_url`, `has_author`, `has_unsubscribe` - Extraction outcome

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
pub mod config;
pub mod confirmation;
pub mod error;
pub mod handler;
pub mod matcher;
pub mod prehandle;
pub mod rules;
pub mod unsubscribe;

// Internal modules
mod classifier;
mod email;

// Re-exports for ergonomic API
pub use classifier::{Classification, Classifier, Newsletter};
pub use config::{ClassifierConfig, ClassifierConfigBuilder};
pub use confirmation::{get_confirmation_code, is_confirmation_email, ConfirmationSender};
pub use email::RawEmail;
pub use error::{Error, ErrorCategory, Result};
pub use handler::{HandlerResult, NewsletterHandler};
pub use rules::{get_newsletter_handler, select_handler, RuleTable};
pub use unsubscribe::Unsubscribe;
