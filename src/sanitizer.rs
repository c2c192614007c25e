use std::fmt;
use std::net::Ipv4Addr;

use crate::{Tainted, Verified};

/// Why a tainted value was rejected.
///
/// Messages describe the rule that failed, never the rejected input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationError {
    kind: SanitizationErrorKind,
    message: String,
}

impl SanitizationError {
    /// Creates a new sanitization error.
    pub fn new(kind: SanitizationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SanitizationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SanitizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for SanitizationError {}

/// Category of a sanitization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizationErrorKind {
    /// Empty or whitespace only.
    Empty,
    /// Longer than allowed.
    TooLong,
    /// Contains control characters.
    ContainsControlChars,
    /// Does not match the expected format.
    MalformedInput,
}

impl fmt::Display for SanitizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "can't be blank"),
            Self::TooLong => write!(f, "is too long"),
            Self::ContainsControlChars => write!(f, "contains control characters"),
            Self::MalformedInput => write!(f, "is invalid"),
        }
    }
}

/// Turns a [`Tainted`] value into a [`Verified`] one, or rejects it.
pub trait Sanitizer<T> {
    /// Validates and normalizes `input`.
    ///
    /// # Errors
    ///
    /// Returns `SanitizationError` when `input` breaks this sanitizer's rules.
    fn sanitize(&self, input: Tainted<T>) -> Result<Verified<T>, SanitizationError>;
}

/// Trims, then rejects blank, over-long or control-character input.
///
/// The building block the field-specific sanitizers share.
///
/// # Examples
///
/// ```
/// use asset_guard::{Sanitizer, Tainted, TextSanitizer};
///
/// let notes = TextSanitizer::new(16);
/// assert_eq!(notes.sanitize(Tainted::new(" rack 4 ".to_string())).unwrap().as_ref(), "rack 4");
/// assert!(notes.sanitize(Tainted::new("   ".to_string())).is_err());
/// assert!(notes.sanitize(Tainted::new("a\u{0}b".to_string())).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TextSanitizer {
    max_len: usize,
}

impl TextSanitizer {
    /// Creates a sanitizer accepting at most `max_len` bytes after trimming.
    ///
    /// # Panics
    ///
    /// Panics if `max_len` is 0.
    pub fn new(max_len: usize) -> Self {
        assert!(max_len > 0, "max_len must be greater than 0");
        Self { max_len }
    }

    fn check<'a>(&self, raw: &'a str) -> Result<&'a str, SanitizationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                "value is empty",
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::ContainsControlChars,
                "value contains control characters",
            ));
        }
        if trimmed.len() > self.max_len {
            return Err(SanitizationError::new(
                SanitizationErrorKind::TooLong,
                format!("value exceeds {} bytes", self.max_len),
            ));
        }
        Ok(trimmed)
    }
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Sanitizer<String> for TextSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        let trimmed = self.check(&raw)?;
        Ok(Verified::new_unchecked(trimmed.to_string()))
    }
}

/// Checks the shape of a remember-token cookie before it reaches a resolver.
///
/// Accepts 1 to 256 characters from the base64url alphabet plus `.`.
#[derive(Debug, Clone, Copy)]
pub struct CredentialSanitizer {
    text: TextSanitizer,
}

impl Default for CredentialSanitizer {
    fn default() -> Self {
        Self {
            text: TextSanitizer::new(256),
        }
    }
}

impl Sanitizer<String> for CredentialSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        if raw.len() != raw.trim().len() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::MalformedInput,
                "credential has surrounding whitespace",
            ));
        }
        let token = self.text.check(&raw)?;
        let valid = token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(SanitizationError::new(
                SanitizationErrorKind::MalformedInput,
                "credential contains characters outside the token alphabet",
            ));
        }
        Ok(Verified::new_unchecked(token.to_string()))
    }
}

/// Serial numbers: required, printable, at most 64 bytes.
#[derive(Debug, Clone, Copy)]
pub struct SerialNumberSanitizer {
    text: TextSanitizer,
}

impl Default for SerialNumberSanitizer {
    fn default() -> Self {
        Self {
            text: TextSanitizer::new(64),
        }
    }
}

impl Sanitizer<String> for SerialNumberSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        self.text.sanitize(input)
    }
}

/// MAC addresses: five or six colon-separated hex pairs, normalized to
/// uppercase.
///
/// # Examples
///
/// ```
/// use asset_guard::{MacAddressSanitizer, Sanitizer, Tainted};
///
/// let mac = MacAddressSanitizer.sanitize(Tainted::new("aa:bb:cc:dd:ee:0f".to_string())).unwrap();
/// assert_eq!(mac.as_ref(), "AA:BB:CC:DD:EE:0F");
/// assert!(MacAddressSanitizer.sanitize(Tainted::new("1234".to_string())).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MacAddressSanitizer;

impl Sanitizer<String> for MacAddressSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        let value = TextSanitizer::new(17).check(&raw)?;
        let groups: Vec<&str> = value.split(':').collect();
        let well_formed = (5..=6).contains(&groups.len())
            && groups
                .iter()
                .all(|g| g.len() == 2 && g.chars().all(|c| c.is_ascii_hexdigit()));
        if !well_formed {
            return Err(SanitizationError::new(
                SanitizationErrorKind::MalformedInput,
                "expected colon-separated hex pairs",
            ));
        }
        Ok(Verified::new_unchecked(value.to_ascii_uppercase()))
    }
}

/// IPv4 addresses in dotted-quad form.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv4Sanitizer;

impl Sanitizer<String> for Ipv4Sanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        let value = TextSanitizer::new(15).check(&raw)?;
        let addr: Ipv4Addr = value.parse().map_err(|_| {
            SanitizationError::new(
                SanitizationErrorKind::MalformedInput,
                "expected a dotted-quad IPv4 address",
            )
        })?;
        Ok(Verified::new_unchecked(addr.to_string()))
    }
}
