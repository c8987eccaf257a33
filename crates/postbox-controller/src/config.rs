//! Controller configuration.

use postbox_core::constants::{
    KEYPAD_POLL_INTERVAL_MS, MAIL_CHECK_INTERVAL_MS, MAIL_THRESHOLD_CM, MESSAGE_DWELL_MS,
    PIN_CHANGE_TIMEOUT_SECS, RFID_ACCEPT_PAUSE_MS, UNLOCK_PROMPT_HOLD_MS,
};
use postbox_core::{AccessCode, TagIdentity};
use std::time::Duration;

/// Configuration for the access controller and driver loop.
///
/// # Example
///
/// ```
/// use postbox_controller::ControllerConfig;
/// use postbox_core::AccessCode;
///
/// let config = ControllerConfig {
///     default_pin: AccessCode::new("4321").unwrap(),
///     ..Default::default()
/// };
/// assert_eq!(config.mail_check_interval.as_secs(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Credential loaded at startup. Replaced only by a completed
    /// PIN-change flow; never persisted.
    pub default_pin: AccessCode,

    /// The single authorized tag identity (decimal UID rendering).
    pub authorized_tag: TagIdentity,

    /// Distance below which an object counts as present, in cm.
    pub mail_threshold_cm: f32,

    /// Wall-clock interval between mail-distance samples.
    pub mail_check_interval: Duration,

    /// Idle time after which a PIN-change session is abandoned.
    pub pin_change_timeout: Duration,

    /// How long transient status messages stay on screen.
    pub message_dwell: Duration,

    /// Pause after an accepted tag before the unlock sequence.
    pub rfid_accept_pause: Duration,

    /// How long the "Press # to Lock" prompt is held after an unlock.
    pub unlock_prompt_hold: Duration,

    /// Delay between keypad level samples in the driver loop.
    pub poll_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            default_pin: AccessCode::default(),
            authorized_tag: TagIdentity::default(),
            mail_threshold_cm: MAIL_THRESHOLD_CM,
            mail_check_interval: Duration::from_millis(MAIL_CHECK_INTERVAL_MS),
            pin_change_timeout: Duration::from_secs(PIN_CHANGE_TIMEOUT_SECS),
            message_dwell: Duration::from_millis(MESSAGE_DWELL_MS),
            rfid_accept_pause: Duration::from_millis(RFID_ACCEPT_PAUSE_MS),
            unlock_prompt_hold: Duration::from_millis(UNLOCK_PROMPT_HOLD_MS),
            poll_interval: Duration::from_millis(KEYPAD_POLL_INTERVAL_MS),
        }
    }
}
