//! Controller-wide constants.
//!
//! This module centralizes the fixed geometry and timing values used by the
//! letterbox controller: display dimensions, PIN length, the mail-detection
//! cadence and threshold, and the dwell/settle periods of the lock and
//! display sequences. Keeping them here gives every crate one source of
//! truth and keeps magic numbers out of the control flow.
//!
//! # Usage
//!
//! ```
//! use postbox_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(PIN_LENGTH, 4);
//! let interval = Duration::from_millis(MAIL_CHECK_INTERVAL_MS);
//! assert_eq!(interval.as_secs(), 2);
//! ```

// ============================================================================
// Display geometry
// ============================================================================

/// Number of text lines on the character display.
pub const DISPLAY_LINES: usize = 2;

/// Number of visible columns per display line.
///
/// Text longer than this is truncated; shorter text is right-padded with
/// spaces so stale characters never remain on screen.
pub const DISPLAY_COLUMNS: usize = 16;

// ============================================================================
// Credentials
// ============================================================================

/// Fixed length of an access code, in digits.
pub const PIN_LENGTH: usize = 4;

/// Access code loaded at startup when none is configured.
pub const DEFAULT_PIN: &str = "1234";

/// Tag identity authorized when none is configured.
pub const DEFAULT_AUTHORIZED_TAG: &str = "909938959676";

/// Maximum length of a tag identity string, in characters.
pub const MAX_TAG_IDENTITY_LENGTH: usize = 20;

// ============================================================================
// Mail detection
// ============================================================================

/// Wall-clock interval between mail-distance samples, in milliseconds.
///
/// Independent of the keypad polling rate.
pub const MAIL_CHECK_INTERVAL_MS: u64 = 2000;

/// Distance threshold below which an object counts as present, in cm.
pub const MAIL_THRESHOLD_CM: f32 = 5.0;

/// Bound on the echo round trip for a single ranging attempt, in
/// milliseconds. A pulse that does not return within this window is a
/// "no object" sample, not an error.
pub const ECHO_TIMEOUT_MS: u64 = 100;

// ============================================================================
// Timing
// ============================================================================

/// How long a partial PIN-change session may sit idle before it is
/// abandoned, in seconds. Checked every scheduler tick.
pub const PIN_CHANGE_TIMEOUT_SECS: u64 = 20;

/// How long transient status messages stay on screen, in milliseconds.
pub const MESSAGE_DWELL_MS: u64 = 2000;

/// Pause after an accepted tag before the unlock sequence starts, in
/// milliseconds.
pub const RFID_ACCEPT_PAUSE_MS: u64 = 1000;

/// How long the "Press # to Lock" prompt is held after an unlock, in
/// milliseconds.
pub const UNLOCK_PROMPT_HOLD_MS: u64 = 10_000;

/// Open-loop settle time for the lock actuator, in milliseconds. No
/// position feedback exists; completion is reported purely on timing.
pub const LOCK_SETTLE_MS: u64 = 1000;

/// Delay between keypad level samples in the driver loop, in milliseconds.
pub const KEYPAD_POLL_INTERVAL_MS: u64 = 20;

// ============================================================================
// Startup
// ============================================================================

/// Number of display initialization attempts before degrading to a
/// display-less mode.
pub const INIT_RETRY_ATTEMPTS: u32 = 3;

/// Backoff between display initialization attempts, in milliseconds.
pub const INIT_RETRY_BACKOFF_MS: u64 = 100;
