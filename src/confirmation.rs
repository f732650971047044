//! Detection of mail-forwarding confirmation emails.
//!
//! When a user sets up automatic forwarding to their Omnivore inbox, the
//! provider first sends a confirmation email carrying a numeric code. These
//! messages must be recognised before any newsletter handling takes place.
//!
//! # Example
//!
//! ```
//! use omnivore_inbound::confirmation::{get_confirmation_code, is_confirmation_email};
//!
//! assert!(is_confirmation_email("Gmail Team <forwarding-noreply@google.com>"));
//! assert_eq!(
//!     get_confirmation_code(
//!         "(#593781109) Gmail Forwarding Confirmation - Receive Mail from sam@omnivore.com"
//!     )
//!     .as_deref(),
//!     Some("593781109")
//! );
//! ```

use crate::error::{Error, Result};
use crate::matcher::{Matcher, RegexMatcher};
use email_address::EmailAddress;
use std::sync::LazyLock;

/// Display name used by Gmail on forwarding confirmation emails.
pub const GMAIL_CONFIRMATION_DISPLAY_NAME: &str = "Gmail Team";

/// Address Gmail sends forwarding confirmation emails from.
pub const GMAIL_CONFIRMATION_ADDRESS: &str = "forwarding-noreply@google.com";

/// Full `From` header value of Gmail forwarding confirmation emails.
pub const GMAIL_CONFIRMATION_SENDER: &str = "Gmail Team <forwarding-noreply@google.com>";

static CONFIRMATION_CODE: LazyLock<RegexMatcher> = LazyLock::new(|| {
    RegexMatcher::with_description(
        r"^\(#(\d+)\) Gmail Forwarding Confirmation - Receive Mail from \S+\s*$",
        "Gmail forwarding confirmation code",
    )
    .expect("valid regex")
});

/// The sender identity of a forwarding provider's confirmation emails.
///
/// Matching is an exact, case-sensitive comparison against
/// `"{display_name} <{address}>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationSender {
    display_name: String,
    address: String,
}

impl ConfirmationSender {
    /// The Gmail forwarding sender, `Gmail Team <forwarding-noreply@google.com>`.
    #[must_use]
    pub fn gmail() -> Self {
        Self {
            display_name: GMAIL_CONFIRMATION_DISPLAY_NAME.to_string(),
            address: GMAIL_CONFIRMATION_ADDRESS.to_string(),
        }
    }

    /// Creates a sender identity for another forwarding provider.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmailFormat`] if `address` is not a valid email
    /// address, or [`Error::InvalidConfig`] if `display_name` is blank.
    pub fn new(display_name: impl Into<String>, address: &str) -> Result<Self> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "confirmation sender display name is required".into(),
            });
        }
        let address = EmailAddress::parse_with_options(address, email_address::Options::default())
            .map_err(|_| Error::InvalidEmailFormat {
                email: address.to_string(),
            })?;
        Ok(Self {
            display_name,
            address: address.as_str().to_string(),
        })
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the sender address as a string slice.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns `true` if `from` is exactly this sender's `From` header value.
    #[must_use]
    pub fn matches(&self, from: &str) -> bool {
        from.strip_prefix(self.display_name.as_str())
            .and_then(|rest| rest.strip_prefix(" <"))
            .and_then(|rest| rest.strip_suffix('>'))
            .is_some_and(|addr| addr == self.address)
    }
}

impl Default for ConfirmationSender {
    fn default() -> Self {
        Self::gmail()
    }
}

/// Returns `true` if `from` is the Gmail forwarding confirmation sender.
#[must_use]
pub fn is_confirmation_email(from: &str) -> bool {
    from == GMAIL_CONFIRMATION_SENDER
}

/// Extracts the numeric code from a Gmail forwarding confirmation subject.
///
/// The subject must have the form
/// `(#<digits>) Gmail Forwarding Confirmation - Receive Mail from <address>`.
/// Anything else yields `None`.
#[must_use]
pub fn get_confirmation_code(subject: &str) -> Option<String> {
    CONFIRMATION_CODE
        .find_match(subject)
        .map(std::borrow::Cow::into_owned)
}
