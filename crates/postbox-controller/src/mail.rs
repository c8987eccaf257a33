//! Mail detection: presence debounce and the idempotent notification latch.
//!
//! The monitor consumes filtered distance samples on a fixed cadence and
//! turns them into edge events. A sample is "present" when a reading exists
//! and is below the threshold; a missed echo (`None`) counts as "no object",
//! never as an error.
//!
//! Notification is at-most-once per presence episode: the latch is set on
//! the first alert and deliberately survives mail removal, so a rapid
//! removed-then-present flicker cannot produce a duplicate. Only an explicit
//! lock action re-arms it.

use crate::state::MailState;

/// Edge in the mail-presence signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailEvent {
    /// Transition from absent to present.
    Arrived,

    /// Transition from present to absent.
    Removed,
}

/// Tracks mail presence across distance samples.
#[derive(Debug, Clone)]
pub struct MailMonitor {
    state: MailState,
    threshold_cm: f32,
}

impl MailMonitor {
    /// Create a monitor with the given presence threshold.
    pub fn new(threshold_cm: f32) -> Self {
        Self {
            state: MailState::default(),
            threshold_cm,
        }
    }

    /// Consume one distance sample; returns the edge it produced, if any.
    ///
    /// Steady-state samples (present while detected, absent while not)
    /// return `None` so callers repaint nothing.
    pub fn observe(&mut self, reading_cm: Option<f32>) -> Option<MailEvent> {
        let present = reading_cm.is_some_and(|cm| cm < self.threshold_cm);

        match (present, self.state.detected) {
            (true, false) => {
                self.state.detected = true;
                Some(MailEvent::Arrived)
            }
            (false, true) => {
                self.state.detected = false;
                Some(MailEvent::Removed)
            }
            _ => None,
        }
    }

    /// Whether a notification should be issued now; sets the latch when so.
    ///
    /// Returns `true` at most once per re-arm, and only while mail is
    /// detected.
    pub fn should_notify(&mut self) -> bool {
        if self.state.detected && !self.state.notification_sent {
            self.state.notification_sent = true;
            true
        } else {
            false
        }
    }

    /// Re-arm the notification latch. Called by the lock action only.
    pub fn rearm(&mut self) {
        self.state.rearm();
    }

    /// Current presence flags.
    pub fn state(&self) -> MailState {
        self.state
    }
}
