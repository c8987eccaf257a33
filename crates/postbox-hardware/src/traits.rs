//! Hardware device trait definitions.
//!
//! This module defines trait interfaces for the letterbox peripherals:
//! keypad, RFID tag reader, distance sensor, lock actuator, character
//! display, remote notifier, and indicator LED. These traits establish the
//! contract between the access controller and its collaborators, enabling
//! substitution between mock and real hardware implementations.
//!
//! All traits use native `async fn` methods (Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro. Because RPITIT methods
//! return opaque futures, the traits are not object-safe; use generic type
//! parameters, or the enum wrappers in [`devices`](crate::devices) when
//! dynamic dispatch is needed.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::DeviceInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A key on the 4x4 letterbox keypad.
///
/// The physical matrix carries digits `0`-`9`, the function keys `A`-`D`,
/// and the `*` / `#` command keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Star key (*). Requests an RFID scan.
    Star,

    /// Hash/pound key (#). Requests a lock.
    Hash,

    /// Function key (A-D). Currently unassigned; the controller ignores
    /// these.
    Function(char),
}

impl Key {
    /// Create a digit key.
    ///
    /// # Errors
    ///
    /// Returns an error if the digit is greater than 9.
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(crate::error::HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {}",
                d
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Create a function key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the range `A`-`D`.
    pub fn function(c: char) -> Result<Self> {
        if !('A'..='D').contains(&c) {
            return Err(crate::error::HardwareError::invalid_data(format!(
                "Function key must be A-D, got {}",
                c
            )));
        }
        Ok(Self::Function(c))
    }

    /// Map a keypad legend character to a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the character is not part of the keypad legend.
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '0'..='9' => Ok(Self::Digit(c as u8 - b'0')),
            '*' => Ok(Self::Star),
            '#' => Ok(Self::Hash),
            'A'..='D' => Ok(Self::Function(c)),
            _ => Err(crate::error::HardwareError::invalid_data(format!(
                "Unknown keypad character: {:?}",
                c
            ))),
        }
    }

    /// The keypad legend character for this key.
    pub fn to_char(self) -> char {
        match self {
            Self::Digit(d) => (b'0' + d) as char,
            Self::Star => '*',
            Self::Hash => '#',
            Self::Function(c) => c,
        }
    }

    /// Check if this key is a digit.
    pub fn is_digit(&self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// Get the digit value if this is a digit key.
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Keypad device abstraction.
///
/// Represents the scanned key matrix as a *level* signal: each poll reports
/// the key currently asserted, if any. Converting levels into discrete press
/// events is the edge detector's job, not the device's: a held key reports
/// the same level on every poll.
pub trait KeypadDevice: Send + Sync {
    /// Sample the currently asserted key.
    ///
    /// Non-blocking: returns `Ok(None)` immediately when no key is held.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or a communication
    /// error occurs.
    async fn poll_key(&mut self) -> Result<Option<Key>>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Minimum UID length in bytes (per ISO 14443 specification).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum UID length in bytes (per ISO 14443 specification).
pub const MAX_UID_LENGTH: usize = 10;

/// A single tag read from the RFID reader.
///
/// Carries the raw UID bytes and the capture timestamp. The controller
/// compares tags by their decimal rendering, matching the identity format
/// used for the configured authorized tag.
#[derive(Debug, Clone)]
pub struct TagRead {
    /// Tag unique identifier (4-10 bytes).
    pub uid: Vec<u8>,

    /// Timestamp when the tag was read.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TagRead {
    /// Create a new tag read with the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID length is not within the valid range of
    /// 4-10 bytes as specified by ISO 14443.
    pub fn new(uid: Vec<u8>) -> Result<Self> {
        let uid_len = uid.len();
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&uid_len) {
            return Err(crate::HardwareError::invalid_data(format!(
                "Tag UID length must be between {} and {} bytes, got {}",
                MIN_UID_LENGTH, MAX_UID_LENGTH, uid_len
            )));
        }

        Ok(Self {
            uid,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Get the UID as a hexadecimal string.
    pub fn uid_hex(&self) -> String {
        self.uid
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join("")
    }

    /// Get the UID as a decimal string.
    ///
    /// This is the rendering the authorized-tag identity is configured in.
    ///
    /// # Note
    ///
    /// Only the first 8 bytes participate in the conversion to prevent
    /// integer overflow; use `uid_hex()` when the full UID is needed.
    pub fn uid_decimal(&self) -> String {
        let bytes = &self.uid[..self.uid.len().min(8)];
        let mut result = 0u64;
        for byte in bytes {
            result = result.saturating_mul(256).saturating_add(*byte as u64);
        }
        result.to_string()
    }
}

/// RFID tag reader device abstraction.
pub trait TagReaderDevice: Send + Sync {
    /// Read a tag from the reader.
    ///
    /// Blocks asynchronously until a tag is presented. There is no read
    /// timeout: a scan request waits indefinitely for a tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be read or the device is
    /// disconnected.
    async fn read_tag(&mut self) -> Result<TagRead>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Distance sensor device abstraction.
///
/// Models an ultrasonic ranger with a bounded echo window.
pub trait DistanceSensorDevice: Send + Sync {
    /// Take one ranging sample, in centimeters.
    ///
    /// Returns `Ok(None)` when the echo pulse did not return within the
    /// bounded timeout window. A missed echo is expected sensor noise and is
    /// a "no object" sample, never an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for device-level failures (disconnection,
    /// communication faults).
    async fn measure_cm(&mut self) -> Result<Option<f32>>;
}

/// Commanded position of the binary lock actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockPosition {
    /// Bolt engaged.
    Locked,

    /// Bolt withdrawn.
    Unlocked,
}

impl LockPosition {
    /// Returns `true` if the position is `Locked`.
    pub fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl fmt::Display for LockPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locked => write!(f, "Locked"),
            Self::Unlocked => write!(f, "Unlocked"),
        }
    }
}

/// Lock actuator device abstraction.
///
/// The actuator is open-loop: `set_position` drives toward the commanded
/// position, holds for a fixed settle delay, then disengages the drive
/// signal. Completion is reported purely on timing; there is no position
/// feedback sensor.
pub trait LockDevice: Send + Sync {
    /// Drive the actuator to the given position.
    ///
    /// Blocks for the settle duration before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if the actuator cannot be driven.
    async fn set_position(&mut self, position: LockPosition) -> Result<()>;

    /// Immediately drop the drive signal.
    ///
    /// Used only by the shutdown path, which must halt actuator output
    /// without waiting for a settle period.
    ///
    /// # Errors
    ///
    /// Returns an error if the drive signal cannot be released.
    async fn halt(&mut self) -> Result<()>;
}

/// Character display device abstraction.
///
/// A fixed-geometry two-line display. Implementations must tolerate
/// over-long text by truncating rather than failing; callers are expected to
/// pre-format lines to the display width.
pub trait DisplayDevice: Send + Sync {
    /// Initialize the display controller.
    ///
    /// Called once at startup, possibly repeatedly on failure (the driver
    /// retries a bounded number of times before degrading).
    ///
    /// # Errors
    ///
    /// Returns an error if the controller does not acknowledge the init
    /// sequence.
    async fn init(&mut self) -> Result<()>;

    /// Render text on the given line (0-based).
    ///
    /// # Errors
    ///
    /// Returns an error if the line index is out of range or a
    /// communication error occurs.
    async fn show_line(&mut self, line: usize, text: &str) -> Result<()>;

    /// Blank the entire display.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs.
    async fn clear(&mut self) -> Result<()>;
}

/// Remote notifier abstraction.
///
/// Best-effort and fire-and-forget: one attempt per call, no retry, no
/// delivery confirmation. Callers log and swallow failures.
pub trait NotifierDevice: Send + Sync {
    /// Send a notification message.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects the message or is
    /// unreachable.
    async fn notify(&mut self, message: &str) -> Result<()>;
}

/// Indicator LED abstraction.
pub trait IndicatorDevice: Send + Sync {
    /// Switch the indicator on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be driven.
    async fn set_on(&mut self, on: bool) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_digit() {
        let key = Key::digit(5).unwrap();
        assert_eq!(key, Key::Digit(5));
        assert!(key.is_digit());
        assert_eq!(key.as_digit(), Some(5));
        assert_eq!(key.to_char(), '5');
    }

    #[test]
    fn test_key_invalid_digit() {
        assert!(Key::digit(10).is_err());
    }

    #[test]
    fn test_key_function() {
        let key = Key::function('B').unwrap();
        assert_eq!(key, Key::Function('B'));
        assert!(!key.is_digit());
        assert_eq!(key.as_digit(), None);

        assert!(Key::function('E').is_err());
        assert!(Key::function('a').is_err());
    }

    #[test]
    fn test_key_from_char_legend() {
        assert_eq!(Key::from_char('0').unwrap(), Key::Digit(0));
        assert_eq!(Key::from_char('9').unwrap(), Key::Digit(9));
        assert_eq!(Key::from_char('*').unwrap(), Key::Star);
        assert_eq!(Key::from_char('#').unwrap(), Key::Hash);
        assert_eq!(Key::from_char('D').unwrap(), Key::Function('D'));
        assert!(Key::from_char('x').is_err());
    }

    #[test]
    fn test_key_char_round_trip() {
        for c in "0123456789ABCD*#".chars() {
            let key = Key::from_char(c).unwrap();
            assert_eq!(key.to_char(), c);
        }
    }

    #[test]
    fn test_tag_read_uid_hex() {
        let tag = TagRead::new(vec![0x04, 0xAB, 0xCD, 0xEF]).unwrap();
        assert_eq!(tag.uid_hex(), "04ABCDEF");
    }

    #[test]
    fn test_tag_read_uid_decimal() {
        let tag = TagRead::new(vec![0x01, 0x02, 0x03, 0x04]).unwrap();
        assert_eq!(tag.uid_decimal(), "16909060");
    }

    #[test]
    fn test_tag_read_invalid_uid_length() {
        // Too short
        assert!(TagRead::new(vec![0x01, 0x02]).is_err());

        // Too long
        assert!(TagRead::new(vec![0x01; 11]).is_err());

        // Valid boundary lengths
        assert!(TagRead::new(vec![0x01; 4]).is_ok());
        assert!(TagRead::new(vec![0x01; 10]).is_ok());
    }

    #[test]
    fn test_lock_position() {
        assert!(LockPosition::Locked.is_locked());
        assert!(!LockPosition::Unlocked.is_locked());
        assert_eq!(LockPosition::Locked.to_string(), "Locked");
    }

    #[test]
    fn test_lock_position_serialization() {
        let json = serde_json::to_string(&LockPosition::Unlocked).unwrap();
        assert_eq!(json, "\"unlocked\"");

        let back: LockPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LockPosition::Unlocked);
    }
}
