//! The access controller.
//!
//! Owns the PIN/RFID/mode state machine and the mail monitor, and
//! orchestrates the display, lock, tag reader, notifier, and indicator. All
//! operations run on the single driver loop; the only multi-second blocking
//! windows are the tag read and the lock/unlock sequences, which is an
//! accepted latency trade-off of the cooperative design.
//!
//! Steady-state operations never fail: device errors are logged and
//! swallowed so the loop can keep running. Authorization failures surface as
//! display messages and leave all state intact.

use crate::config::ControllerConfig;
use crate::mail::{MailEvent, MailMonitor};
use crate::screen::Screen;
use crate::state::{ControllerMode, ControllerState, MailState};
use postbox_core::constants::{INIT_RETRY_ATTEMPTS, INIT_RETRY_BACKOFF_MS};
use postbox_core::{AccessCode, TagIdentity};
use postbox_hardware::{
    DisplayDevice, IndicatorDevice, Key, LockDevice, LockPosition, NotifierDevice,
    TagReaderDevice,
};
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

// Display texts. The screen truncates to 16 columns and pads the remainder.
const MSG_PROMPT: &str = "Enter PIN or *";
const MSG_MENU_HINT: &str = "* for RFID Scan";
const MSG_CODE_PREFIX: &str = "Code: ";
const MSG_NEW_PIN_PROMPT: &str = "Enter new PIN:";
const MSG_PIN_PREFIX: &str = "PIN: ";
const MSG_WRONG_PIN: &str = "Wrong PIN!";
const MSG_PIN_CHANGED: &str = "PIN Changed!";
const MSG_CHANGE_TIMEOUT: &str = "Timeout! TryAgain";
const MSG_SCAN_TAG: &str = "Scan your tag";
const MSG_RFID_ACCEPTED: &str = "RFID Accepted!";
const MSG_ACCESS_DENIED: &str = "Access Denied!";
const MSG_UNLOCKING: &str = "Box Unlocking...";
const MSG_UNLOCKED: &str = "Box Unlocked!";
const MSG_LOCK_HINT: &str = "Press # to Lock";
const MSG_LOCKING: &str = "Locking Box...";
const MSG_LOCKED: &str = "Box Locked!";
const MSG_NEW_MAIL: &str = "New Mail!";
const MSG_RESTARTING: &str = "Restarting...";

/// Message delivered by the remote notifier on mail arrival.
const NOTIFY_MESSAGE: &str = "New mail in the letterbox";

/// The letterbox access controller.
///
/// Generic over its collaborators so tests run against the mock devices and
/// deployments against hardware backends.
pub struct AccessController<D, L, T, N, I> {
    screen: Screen<D>,
    lock: L,
    tags: T,
    notifier: N,
    indicator: I,
    config: ControllerConfig,
    state: ControllerState,
    mail: MailMonitor,
}

impl<D, L, T, N, I> AccessController<D, L, T, N, I>
where
    D: DisplayDevice,
    L: LockDevice,
    T: TagReaderDevice,
    N: NotifierDevice,
    I: IndicatorDevice,
{
    /// Create a controller in `Idle` with the configured credential.
    pub fn new(
        display: D,
        lock: L,
        tags: T,
        notifier: N,
        indicator: I,
        config: ControllerConfig,
    ) -> Self {
        let state = ControllerState::new(config.default_pin.clone());
        let mail = MailMonitor::new(config.mail_threshold_cm);

        Self {
            screen: Screen::new(display),
            lock,
            tags,
            notifier,
            indicator,
            config,
            state,
            mail,
        }
    }

    /// Initialize the display (bounded retry) and show the main menu.
    pub async fn start(&mut self) {
        self.screen
            .init_with_retry(
                INIT_RETRY_ATTEMPTS,
                Duration::from_millis(INIT_RETRY_BACKOFF_MS),
            )
            .await;
        self.show_menu().await;
    }

    /// The current mode.
    pub fn mode(&self) -> &ControllerMode {
        self.state.mode()
    }

    /// The current credential.
    pub fn credential(&self) -> &AccessCode {
        self.state.credential()
    }

    /// Current mail presence flags.
    pub fn mail_state(&self) -> MailState {
        self.mail.state()
    }

    /// Number of digits in the unlock entry buffer.
    pub fn entry_len(&self) -> usize {
        self.state.entry.len()
    }

    /// The controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Process one debounced key press.
    pub async fn handle_key(&mut self, key: Key) {
        debug!(%key, mode = %self.state.mode(), "key press");

        if self.state.mode().is_changing_pin() {
            self.handle_pin_change_key(key).await;
            return;
        }

        match key {
            Key::Hash => self.lock_box().await,
            Key::Star => self.scan_tag().await,
            Key::Digit(d) => self.handle_pin_digit(d).await,
            // Function keys are unassigned
            Key::Function(_) => {}
        }
    }

    /// Consume one mail-distance sample (taken on the 2 s cadence).
    pub async fn check_mail(&mut self, reading_cm: Option<f32>) {
        match self.mail.observe(reading_cm) {
            Some(MailEvent::Arrived) => {
                info!("mail detected");
                self.screen.show(MSG_PROMPT, MSG_NEW_MAIL).await;
                self.set_indicator(true).await;

                if self.mail.should_notify() {
                    // Best effort: one attempt, failures logged and swallowed
                    match self.notifier.notify(NOTIFY_MESSAGE).await {
                        Ok(()) => info!("mail notification sent"),
                        Err(err) => warn!(%err, "mail notification failed"),
                    }
                }
            }
            Some(MailEvent::Removed) => {
                info!("mail removed");
                self.set_indicator(false).await;
                self.show_menu().await;
            }
            None => {}
        }
    }

    /// Evaluate time-driven transitions. Called every scheduler tick,
    /// regardless of input.
    pub async fn tick(&mut self) {
        if self.state.pin_change_expired(self.config.pin_change_timeout) {
            info!("PIN change timed out");
            self.state.abandon_pin_change();
            self.screen.show(MSG_CHANGE_TIMEOUT, "").await;
            self.dwell().await;
            self.show_menu().await;
        }
    }

    /// Unconditional shutdown: halt the actuator drive first, then leave a
    /// parting message. Makes no assumption about the current mode.
    pub async fn shutdown(&mut self) {
        info!("shutting down");
        if let Err(err) = self.lock.halt().await {
            warn!(%err, "failed to halt lock drive");
        }
        self.set_indicator(false).await;
        self.screen.show(MSG_RESTARTING, "").await;
    }

    async fn handle_pin_digit(&mut self, digit: u8) {
        if let Err(err) = self.state.entry.push(digit) {
            warn!(%err, "dropping entry digit");
            return;
        }
        self.state.mark_accumulating();

        let progress = format!("{}{}", MSG_CODE_PREFIX, self.state.entry.as_str());
        self.screen.show(&progress, "").await;

        if let Some(code) = self.state.entry.complete() {
            if code == *self.state.credential() {
                info!("PIN accepted");
                self.unlock_box().await;
            } else {
                info!("PIN rejected");
                self.screen.show(MSG_WRONG_PIN, "").await;
                self.dwell().await;
            }
            self.state.reset_entry();
            self.show_menu().await;
        }
    }

    async fn handle_pin_change_key(&mut self, key: Key) {
        // Only digits participate in a PIN change
        let Some(digit) = key.as_digit() else {
            return;
        };

        if let Err(err) = self.state.new_pin.push(digit) {
            warn!(%err, "dropping replacement digit");
            return;
        }

        let progress = format!("{}{}", MSG_PIN_PREFIX, self.state.new_pin.as_str());
        self.screen.show(MSG_NEW_PIN_PROMPT, &progress).await;

        if let Some(code) = self.state.new_pin.complete() {
            self.state.finish_pin_change(code);
            info!("credential replaced");
            self.screen.show(MSG_PIN_CHANGED, "").await;
            self.dwell().await;
            self.show_menu().await;
        }
    }

    /// Blocking tag-read flow triggered by `*`.
    async fn scan_tag(&mut self) {
        // A scan abandons any partial PIN entry
        self.state.reset_entry();
        self.screen.show(MSG_SCAN_TAG, "").await;

        let tag = match self.tags.read_tag().await {
            Ok(tag) => tag,
            Err(err) => {
                warn!(%err, "tag read failed");
                self.show_menu().await;
                return;
            }
        };

        let authorized = TagIdentity::new(&tag.uid_decimal())
            .is_ok_and(|identity| identity == self.config.authorized_tag);

        if authorized {
            info!(uid = %tag.uid_hex(), "tag accepted");
            self.screen.show(MSG_RFID_ACCEPTED, "").await;
            sleep(self.config.rfid_accept_pause).await;
            self.unlock_box().await;

            self.state.begin_pin_change(Instant::now());
            self.screen.show(MSG_NEW_PIN_PROMPT, "").await;
        } else {
            info!(uid = %tag.uid_hex(), "tag denied");
            self.screen.show(MSG_ACCESS_DENIED, "").await;
            self.dwell().await;
            self.show_menu().await;
        }
    }

    /// Unlock sequence: drive open, confirm, hold the lock hint.
    async fn unlock_box(&mut self) {
        info!("unlocking box");
        self.screen.show(MSG_UNLOCKING, "").await;
        self.set_indicator(false).await;

        if let Err(err) = self.lock.set_position(LockPosition::Unlocked).await {
            warn!(%err, "unlock drive failed");
        }

        self.screen.show(MSG_UNLOCKED, "").await;
        self.dwell().await;
        self.screen.show(MSG_UNLOCKED, MSG_LOCK_HINT).await;
        sleep(self.config.unlock_prompt_hold).await;
    }

    /// Lock sequence: drive closed, confirm, re-arm notification.
    ///
    /// No credential is required to lock.
    async fn lock_box(&mut self) {
        info!("locking box");
        self.screen.show(MSG_LOCKING, "").await;

        if let Err(err) = self.lock.set_position(LockPosition::Locked).await {
            warn!(%err, "lock drive failed");
        }

        self.screen.show(MSG_LOCKED, "").await;
        self.set_indicator(false).await;
        self.mail.rearm();
        self.dwell().await;

        self.state.reset_entry();
        self.show_menu().await;
    }

    async fn show_menu(&mut self) {
        self.screen.show(MSG_PROMPT, MSG_MENU_HINT).await;
    }

    async fn dwell(&mut self) {
        sleep(self.config.message_dwell).await;
    }

    async fn set_indicator(&mut self, on: bool) {
        if let Err(err) = self.indicator.set_on(on).await {
            warn!(on, %err, "indicator write failed");
        }
    }
}
