//! Error types for the omnivore-inbound crate.
//!
//! Classification itself never fails: a handler that cannot find its marker
//! returns `None`. Errors only come from the edges of the crate, namely
//! configuration, MIME parsing and URL rewriting. See [`Error::category`].

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring the classifier or parsing input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration / validation errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Invalid email address format.
    #[error("invalid email format: {email}")]
    InvalidEmailFormat {
        /// The invalid email address.
        email: String,
    },

    /// Invalid configuration provided.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// A sender rule pattern failed to compile.
    #[error("invalid sender pattern '{pattern}'")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Input parsing errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to parse email message.
    #[error("failed to parse email")]
    ParseEmail {
        /// The underlying parse error.
        #[source]
        source: mailparse::MailParseError,
    },

    /// Failed to extract email body.
    #[error("failed to extract email body")]
    ExtractBody {
        /// The underlying parse error.
        #[source]
        source: mailparse::MailParseError,
    },

    /// A URL could not be parsed for canonicalization.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// The underlying URL parse error.
        #[source]
        source: url::ParseError,
    },
}

impl Error {
    /// Returns the error category for metrics/logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidEmailFormat { .. }
            | Error::InvalidConfig { .. }
            | Error::InvalidPattern { .. } => ErrorCategory::Configuration,

            Error::ParseEmail { .. } | Error::ExtractBody { .. } | Error::InvalidUrl { .. } => {
                ErrorCategory::Parse
            }
        }
    }

    /// Returns `true` if the error was caused by caller-supplied configuration.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

/// Error categories for metrics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration or validation errors.
    Configuration,
    /// Email or URL parsing errors.
    Parse,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Parse => write!(f, "parse"),
        }
    }
}
