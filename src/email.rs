//! The raw inbound email and its construction from MIME bytes.

use crate::error::{Error, Result};
use mailparse::{parse_mail, MailHeaderMap, ParsedMail};
use tracing::{debug, instrument};

/// An inbound email, reduced to the fields classification looks at.
///
/// Build one directly with [`RawEmail::new`] and the `with_*` setters, or
/// parse it from a MIME message with [`RawEmail::parse`].
///
/// # Example
///
/// ```
/// use omnivore_inbound::RawEmail;
///
/// let email = RawEmail::new("Mike Allen <mike@axios.com>", "Axios AM")
///     .with_html("View in browser at <a>https://axios.com/newsletters/axios-am</a>");
/// assert_eq!(email.from(), "Mike Allen <mike@axios.com>");
/// assert_eq!(email.raw_url(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEmail {
    from: String,
    subject: String,
    raw_url: String,
    html: String,
    unsubscribe: Option<String>,
}

impl RawEmail {
    /// Creates an email with the given `From` and `Subject` header values.
    #[must_use]
    pub fn new(from: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// Sets the raw URL (usually the `List-Post` header).
    #[must_use]
    pub fn with_raw_url(mut self, raw_url: impl Into<String>) -> Self {
        self.raw_url = raw_url.into();
        self
    }

    /// Sets the message body.
    #[must_use]
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Sets the raw `List-Unsubscribe` header.
    #[must_use]
    pub fn with_unsubscribe(mut self, unsubscribe: impl Into<String>) -> Self {
        self.unsubscribe = Some(unsubscribe.into());
        self
    }

    /// Parses an RFC 822 / MIME message.
    ///
    /// Headers read: `From`, `Subject`, `List-Post` and `List-Unsubscribe`.
    /// Missing headers become empty strings. The body is the first
    /// `text/html` part, falling back to `text/plain`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseEmail`] if the message is malformed, or
    /// [`Error::ExtractBody`] if the body cannot be decoded.
    ///
    /// # Example
    ///
    /// ```
    /// use omnivore_inbound::RawEmail;
    ///
    /// let raw = b"From: Hongbo <hongbo130@substack.com>\r\n\
    /// Subject: TL;DR\r\n\
    /// List-Post: <https://hongbo130.substack.com/p/tldr>\r\n\
    /// Content-Type: text/html\r\n\
    /// \r\n\
    /// <p>Hello</p>";
    /// let email = RawEmail::parse(raw).unwrap();
    /// assert_eq!(email.raw_url(), "<https://hongbo130.substack.com/p/tldr>");
    /// assert_eq!(email.html(), "<p>Hello</p>");
    /// ```
    #[instrument(name = "RawEmail::parse", skip_all, fields(len = raw.len()))]
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let parsed = parse_mail(raw).map_err(|source| Error::ParseEmail { source })?;
        let headers = &parsed.headers;

        let header = |name: &str| headers.get_first_value(name).unwrap_or_default();

        let email = Self {
            from: header("From"),
            subject: header("Subject"),
            raw_url: header("List-Post"),
            html: extract_body_html(&parsed).map_err(|source| Error::ExtractBody { source })?,
            unsubscribe: headers.get_first_value("List-Unsubscribe"),
        };

        debug!(
            has_raw_url = !email.raw_url.is_empty(),
            has_unsubscribe = email.unsubscribe.is_some(),
            body_len = email.html.len(),
            "Parsed inbound email"
        );

        Ok(email)
    }

    /// The `From` header value.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// The `Subject` header value.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The raw URL, empty when absent.
    #[must_use]
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    /// The message body.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// The raw `List-Unsubscribe` header, if present.
    #[must_use]
    pub fn unsubscribe(&self) -> Option<&str> {
        self.unsubscribe.as_deref()
    }
}

/// Extracts the body from a parsed email, preferring HTML over plain text.
fn extract_body_html(
    parsed: &ParsedMail<'_>,
) -> std::result::Result<String, mailparse::MailParseError> {
    if parsed.subparts.is_empty() {
        return parsed.get_body();
    }

    for wanted in ["text/html", "text/plain"] {
        if let Some(part) = find_part(parsed, wanted) {
            return part.get_body();
        }
    }

    // No text parts anywhere; fall back to the first subpart
    match parsed.subparts.first() {
        Some(first) => extract_body_html(first),
        None => parsed.get_body(),
    }
}

/// Depth-first search for the first leaf part with the given mimetype.
fn find_part<'p, 'a>(parsed: &'p ParsedMail<'a>, mimetype: &str) -> Option<&'p ParsedMail<'a>> {
    if parsed.subparts.is_empty() {
        return parsed
            .ctype
            .mimetype
            .eq_ignore_ascii_case(mimetype)
            .then_some(parsed);
    }
    parsed
        .subparts
        .iter()
        .find_map(|part| find_part(part, mimetype))
}
