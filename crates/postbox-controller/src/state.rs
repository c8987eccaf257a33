//! Controller state: mode, entry buffers, credential, and mail flags.
//!
//! All of it lives in one explicitly owned [`ControllerState`] value,
//! threaded through the event-handling operations rather than scattered
//! across module-level flags. Exactly one mode is active at any time, and
//! every transition that leaves a mode clears the buffers that mode owned.

use postbox_core::{AccessCode, PinBuffer};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Operating mode of the access controller.
///
/// Exactly one variant is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerMode {
    /// Waiting for PIN digits or an RFID-scan request.
    Idle,

    /// Mid PIN entry; the entry buffer is non-empty.
    AccumulatingPin,

    /// Post-RFID authorization, collecting a replacement PIN. Carries the
    /// session start for the time-driven timeout.
    ChangingPin {
        /// When the PIN-change session was entered.
        started: Instant,
    },
}

impl ControllerMode {
    /// Returns `true` for `Idle`.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns `true` for `ChangingPin`.
    pub fn is_changing_pin(&self) -> bool {
        matches!(self, Self::ChangingPin { .. })
    }
}

impl fmt::Display for ControllerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Self::Idle => "Idle",
            Self::AccumulatingPin => "AccumulatingPin",
            Self::ChangingPin { .. } => "ChangingPin",
        };
        write!(f, "{}", mode)
    }
}

/// Mail presence flags.
///
/// `notification_sent` latches after the first alert of a presence episode
/// and is cleared only by an explicit lock action, never by mail removal, so
/// a removed-then-returned flicker cannot produce a duplicate alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailState {
    /// An object is currently within the detection threshold.
    pub detected: bool,

    /// An alert has been issued and not yet re-armed by a lock action.
    pub notification_sent: bool,
}

impl MailState {
    /// Re-arm notification. Called by the lock action only.
    pub fn rearm(&mut self) {
        self.notification_sent = false;
    }
}

/// All mutable state owned by the access controller.
#[derive(Debug, Clone)]
pub struct ControllerState {
    mode: ControllerMode,

    /// PIN digits accumulated while unlocking.
    pub(crate) entry: PinBuffer,

    /// Replacement PIN digits accumulated while in `ChangingPin`.
    pub(crate) new_pin: PinBuffer,

    /// The credential unlock attempts are compared against.
    credential: AccessCode,
}

impl ControllerState {
    /// Create controller state in `Idle` with the given credential.
    pub fn new(credential: AccessCode) -> Self {
        Self {
            mode: ControllerMode::Idle,
            entry: PinBuffer::new(),
            new_pin: PinBuffer::new(),
            credential,
        }
    }

    /// The current mode.
    pub fn mode(&self) -> &ControllerMode {
        &self.mode
    }

    /// The current credential.
    pub fn credential(&self) -> &AccessCode {
        &self.credential
    }

    /// Note a digit entering the unlock buffer (Idle -> AccumulatingPin).
    pub(crate) fn mark_accumulating(&mut self) {
        if self.mode.is_idle() {
            self.mode = ControllerMode::AccumulatingPin;
        }
    }

    /// Clear the entry buffer and return to `Idle`.
    pub fn reset_entry(&mut self) {
        self.entry.clear();
        self.mode = ControllerMode::Idle;
    }

    /// Enter `ChangingPin`, stamped with `now`, with an empty new-PIN buffer.
    pub fn begin_pin_change(&mut self, now: Instant) {
        self.new_pin.clear();
        self.mode = ControllerMode::ChangingPin { started: now };
    }

    /// Atomically replace the credential and return to `Idle`.
    pub fn finish_pin_change(&mut self, code: AccessCode) {
        self.credential = code;
        self.new_pin.clear();
        self.mode = ControllerMode::Idle;
    }

    /// Abandon an in-progress PIN change and return to `Idle`.
    pub fn abandon_pin_change(&mut self) {
        self.new_pin.clear();
        self.mode = ControllerMode::Idle;
    }

    /// Whether an in-progress PIN change has outlived `timeout`.
    pub fn pin_change_expired(&self, timeout: Duration) -> bool {
        match self.mode {
            ControllerMode::ChangingPin { started } => started.elapsed() > timeout,
            _ => false,
        }
    }
}
