use crate::{
    Result,
    constants::{DEFAULT_AUTHORIZED_TAG, DEFAULT_PIN, MAX_TAG_IDENTITY_LENGTH, PIN_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// A complete access code (exactly 4 digits).
///
/// Compared by exact digit-sequence equality, never by numeric value, so
/// leading zeros are significant.
///
/// # Security
/// This type implements constant-time comparison to prevent timing attacks
/// when comparing codes during PIN validation.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct AccessCode(String);

impl AccessCode {
    /// Create a new access code with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidPinFormat` if the code is not exactly
    /// [`PIN_LENGTH`] ASCII digits.
    pub fn new(code: &str) -> Result<Self> {
        if code.len() != PIN_LENGTH {
            return Err(Error::InvalidPinFormat(format!(
                "Access code must be {PIN_LENGTH} digits, got {}",
                code.len()
            )));
        }

        if !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::InvalidPinFormat(
                "Access code must contain only digits".to_string(),
            ));
        }

        Ok(AccessCode(code.to_string()))
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for AccessCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AccessCode::new(s)
    }
}

/// The startup code from [`DEFAULT_PIN`].
impl Default for AccessCode {
    fn default() -> Self {
        AccessCode(DEFAULT_PIN.to_string())
    }
}

/// Constant-time comparison implementation for AccessCode
///
/// This prevents timing attacks by ensuring comparison takes the same time
/// regardless of where the digit sequences differ.
impl PartialEq for AccessCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for AccessCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Accumulating PIN entry buffer.
///
/// Holds between zero and [`PIN_LENGTH`] digits while the user is mid-entry.
/// A buffer never exceeds the code length; callers drain it through
/// [`PinBuffer::complete`] once it fills.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinBuffer {
    digits: String,
}

impl PinBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a digit.
    ///
    /// # Errors
    /// Returns `Error::InvalidPinFormat` if the digit is greater than 9 or
    /// the buffer is already full.
    pub fn push(&mut self, digit: u8) -> Result<()> {
        if digit > 9 {
            return Err(Error::InvalidPinFormat(format!(
                "Digit must be 0-9, got {digit}"
            )));
        }
        if self.is_full() {
            return Err(Error::InvalidPinFormat(format!(
                "Entry buffer already holds {PIN_LENGTH} digits"
            )));
        }
        self.digits.push((b'0' + digit) as char);
        Ok(())
    }

    /// Number of digits currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns `true` if no digits are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns `true` if the buffer holds a full code's worth of digits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.digits.len() == PIN_LENGTH
    }

    /// The buffered digits, for display progress.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Discard all buffered digits.
    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// Yield the buffered digits as an [`AccessCode`] if the buffer is full.
    #[must_use]
    pub fn complete(&self) -> Option<AccessCode> {
        if self.is_full() {
            AccessCode::new(&self.digits).ok()
        } else {
            None
        }
    }
}

/// Opaque RFID tag identity.
///
/// Compared for exact equality against a single statically configured
/// authorized identity. There is no revocation, rotation, or multi-tag
/// support; a single shared secret model.
///
/// # Security
/// Like [`AccessCode`], equality is constant-time.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct TagIdentity(String);

impl TagIdentity {
    /// Create a new tag identity with validation.
    ///
    /// The identity is normalized (trimmed) before validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidTagFormat` if the identity is empty, longer
    /// than [`MAX_TAG_IDENTITY_LENGTH`] characters, or not ASCII.
    pub fn new(identity: &str) -> Result<Self> {
        let identity = identity.trim();

        if identity.is_empty() {
            return Err(Error::InvalidTagFormat(
                "Tag identity must not be empty".to_string(),
            ));
        }

        if identity.len() > MAX_TAG_IDENTITY_LENGTH {
            return Err(Error::InvalidTagFormat(format!(
                "Tag identity must be at most {MAX_TAG_IDENTITY_LENGTH} chars, got {}",
                identity.len()
            )));
        }

        if !identity.is_ascii() {
            return Err(Error::InvalidTagFormat(
                "Tag identity must be ASCII".to_string(),
            ));
        }

        Ok(TagIdentity(identity.to_string()))
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagIdentity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TagIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TagIdentity::new(s)
    }
}

/// The identity from [`DEFAULT_AUTHORIZED_TAG`].
impl Default for TagIdentity {
    fn default() -> Self {
        TagIdentity(DEFAULT_AUTHORIZED_TAG.to_string())
    }
}

impl PartialEq for TagIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for TagIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1234")]
    #[case("0000")]
    #[case("0042")]
    fn test_access_code_valid(#[case] input: &str) {
        let code = AccessCode::new(input).unwrap();
        assert_eq!(code.as_str(), input);
    }

    #[rstest]
    #[case("123")] // too short
    #[case("12345")] // too long
    #[case("12a4")] // non-digit
    #[case("")] // empty
    fn test_access_code_invalid(#[case] input: &str) {
        assert!(AccessCode::new(input).is_err());
    }

    #[test]
    fn test_access_code_sequence_equality() {
        let a = AccessCode::new("0123").unwrap();
        let b = AccessCode::new("0123").unwrap();
        let c = AccessCode::new("1234").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_pin_buffer_accumulation() {
        let mut buffer = PinBuffer::new();
        assert!(buffer.is_empty());
        assert!(buffer.complete().is_none());

        buffer.push(1).unwrap();
        buffer.push(2).unwrap();
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.as_str(), "12");
        assert!(buffer.complete().is_none());

        buffer.push(3).unwrap();
        buffer.push(4).unwrap();
        assert!(buffer.is_full());

        let code = buffer.complete().unwrap();
        assert_eq!(code, AccessCode::new("1234").unwrap());
    }

    #[test]
    fn test_pin_buffer_rejects_overflow() {
        let mut buffer = PinBuffer::new();
        for d in [1, 2, 3, 4] {
            buffer.push(d).unwrap();
        }
        assert!(buffer.push(5).is_err());
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_pin_buffer_rejects_invalid_digit() {
        let mut buffer = PinBuffer::new();
        assert!(buffer.push(10).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_pin_buffer_clear() {
        let mut buffer = PinBuffer::new();
        buffer.push(9).unwrap();
        buffer.push(9).unwrap();
        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.as_str(), "");
    }

    #[rstest]
    #[case("909938959676", "909938959676")]
    #[case("  16909060  ", "16909060")] // normalized
    #[case("AB12", "AB12")]
    fn test_tag_identity_valid(#[case] input: &str, #[case] expected: &str) {
        let tag = TagIdentity::new(input).unwrap();
        assert_eq!(tag.as_str(), expected);
    }

    #[rstest]
    #[case("")] // empty
    #[case("   ")] // whitespace only
    #[case("123456789012345678901")] // too long
    fn test_tag_identity_invalid(#[case] input: &str) {
        assert!(TagIdentity::new(input).is_err());
    }

    #[test]
    fn test_tag_identity_equality() {
        let a = TagIdentity::new("909938959676").unwrap();
        let b = TagIdentity::new(" 909938959676 ").unwrap();
        let c = TagIdentity::new("909938959677").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AccessCode::new(AccessCode::default().as_str()).is_ok());
        assert!(TagIdentity::new(TagIdentity::default().as_str()).is_ok());
    }

    #[test]
    fn test_serde_round_trip() {
        let tag = TagIdentity::new("909938959676").unwrap();
        let json = serde_json::to_string(&tag).unwrap();
        let back: TagIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(tag, back);
    }
}
