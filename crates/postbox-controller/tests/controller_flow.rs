//! End-to-end access-control flows against mock devices.
//!
//! All tests run under a paused tokio clock, so the controller's dwell and
//! hold periods elapse in virtual time.

use postbox_controller::{AccessController, ControllerConfig};
use postbox_core::TagIdentity;
use postbox_hardware::mock::{
    MockDisplay, MockDisplayHandle, MockIndicator, MockIndicatorHandle, MockLock, MockLockHandle,
    MockNotifier, MockNotifierHandle, MockTagReader, MockTagReaderHandle,
};
use postbox_hardware::{Key, LockPosition};
use std::time::Duration;

/// UID presented by the authorized tag in these tests.
const AUTHORIZED_UID: [u8; 4] = [0x01, 0x02, 0x03, 0x04];

/// Decimal rendering of `AUTHORIZED_UID`.
const AUTHORIZED_IDENTITY: &str = "16909060";

struct Harness {
    controller:
        AccessController<MockDisplay, MockLock, MockTagReader, MockNotifier, MockIndicator>,
    display: MockDisplayHandle,
    lock: MockLockHandle,
    tags: MockTagReaderHandle,
    notifier: MockNotifierHandle,
    indicator: MockIndicatorHandle,
}

async fn harness() -> Harness {
    let (display, display_handle) = MockDisplay::new();
    let (lock, lock_handle) = MockLock::new();
    let (tags, tag_handle) = MockTagReader::new();
    let (notifier, notifier_handle) = MockNotifier::new();
    let (indicator, indicator_handle) = MockIndicator::new();

    let config = ControllerConfig {
        authorized_tag: TagIdentity::new(AUTHORIZED_IDENTITY).unwrap(),
        ..Default::default()
    };

    let mut controller = AccessController::new(display, lock, tags, notifier, indicator, config);
    controller.start().await;

    Harness {
        controller,
        display: display_handle,
        lock: lock_handle,
        tags: tag_handle,
        notifier: notifier_handle,
        indicator: indicator_handle,
    }
}

async fn enter_digits(harness: &mut Harness, digits: &[u8]) {
    for &d in digits {
        harness.controller.handle_key(Key::Digit(d)).await;
    }
}

#[tokio::test(start_paused = true)]
async fn correct_pin_unlocks_once() {
    let mut h = harness().await;

    enter_digits(&mut h, &[1, 2, 3, 4]).await;

    assert_eq!(h.lock.transitions(), vec![LockPosition::Unlocked]);
    assert_eq!(h.lock.unlock_count(), 1);
    assert_eq!(h.controller.entry_len(), 0);
    assert!(h.controller.mode().is_idle());
    assert!(h.display.has_shown("Box Unlocked!"));
    assert!(h.display.has_shown("Press # to Lock"));
}

#[tokio::test(start_paused = true)]
async fn wrong_pin_never_unlocks() {
    let mut h = harness().await;

    enter_digits(&mut h, &[9, 9, 9, 9]).await;

    assert!(h.lock.transitions().is_empty());
    assert!(h.display.has_shown("Wrong PIN!"));
    assert_eq!(h.controller.entry_len(), 0);
    assert!(h.controller.mode().is_idle());
    // Back at the menu
    assert_eq!(h.display.line(0), "Enter PIN or *  ");
    assert_eq!(h.display.line(1), "* for RFID Scan ");
}

#[tokio::test(start_paused = true)]
async fn hash_locks_regardless_of_buffer() {
    let mut h = harness().await;

    // Partial PIN entry, then the lock command
    enter_digits(&mut h, &[1, 2]).await;
    h.controller.handle_key(Key::Hash).await;

    assert_eq!(h.lock.transitions(), vec![LockPosition::Locked]);
    assert_eq!(h.controller.entry_len(), 0);
    assert!(h.controller.mode().is_idle());
    assert!(h.display.has_shown("Box Locked!"));
}

#[tokio::test(start_paused = true)]
async fn lock_rearms_notification() {
    let mut h = harness().await;

    // Mail arrives and notifies once
    h.controller.check_mail(Some(2.0)).await;
    assert!(h.controller.mail_state().notification_sent);
    assert_eq!(h.notifier.sent_count(), 1);

    // Lock action re-arms
    h.controller.handle_key(Key::Hash).await;
    assert!(!h.controller.mail_state().notification_sent);

    // Next episode notifies again after removal
    h.controller.check_mail(Some(20.0)).await;
    h.controller.check_mail(Some(2.0)).await;
    assert_eq!(h.notifier.sent_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn mail_episode_notifies_exactly_once() {
    let mut h = harness().await;

    // Three consecutive present samples on the 2 s cadence
    h.controller.check_mail(Some(3.0)).await;
    h.controller.check_mail(Some(3.5)).await;
    h.controller.check_mail(Some(2.8)).await;

    assert_eq!(h.notifier.sent_count(), 1);
    assert_eq!(h.notifier.messages(), vec!["New mail in the letterbox"]);
    assert!(h.indicator.is_on());
    assert_eq!(h.display.line(0), "Enter PIN or *  ");
    assert_eq!(h.display.line(1), "New Mail!       ");

    // Removal restores the idle prompt and turns the indicator off
    h.controller.check_mail(Some(12.0)).await;
    assert!(!h.indicator.is_on());
    assert_eq!(h.display.line(1), "* for RFID Scan ");
    assert_eq!(h.notifier.sent_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn removal_flicker_does_not_duplicate_notification() {
    let mut h = harness().await;

    h.controller.check_mail(Some(3.0)).await;
    h.controller.check_mail(Some(20.0)).await;
    h.controller.check_mail(Some(3.0)).await;

    // Re-armed only by an explicit lock action, never by removal
    assert_eq!(h.notifier.sent_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn echo_timeout_reads_as_absent() {
    let mut h = harness().await;

    h.controller.check_mail(None).await;
    assert!(!h.controller.mail_state().detected);
    assert_eq!(h.notifier.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn steady_samples_do_not_repaint() {
    let mut h = harness().await;

    h.controller.check_mail(Some(3.0)).await;
    let writes = h.display.write_count();

    // Present-and-detected samples leave the screen untouched
    h.controller.check_mail(Some(3.0)).await;
    h.controller.check_mail(Some(3.0)).await;
    assert_eq!(h.display.write_count(), writes);
}

#[tokio::test(start_paused = true)]
async fn authorized_tag_unlocks_and_changes_pin() {
    let mut h = harness().await;

    h.tags.present_tag(AUTHORIZED_UID.to_vec()).await.unwrap();
    h.controller.handle_key(Key::Star).await;

    assert_eq!(h.lock.unlock_count(), 1);
    assert!(h.controller.mode().is_changing_pin());
    assert!(h.display.has_shown("RFID Accepted!"));
    assert_eq!(h.display.line(0), "Enter new PIN:  ");

    // Replacement PIN
    enter_digits(&mut h, &[5, 6, 7, 8]).await;

    assert_eq!(h.controller.credential().as_str(), "5678");
    assert!(h.controller.mode().is_idle());
    assert!(h.display.has_shown("PIN Changed!"));

    // Old PIN no longer unlocks, new one does
    enter_digits(&mut h, &[1, 2, 3, 4]).await;
    assert_eq!(h.lock.unlock_count(), 1);
    enter_digits(&mut h, &[5, 6, 7, 8]).await;
    assert_eq!(h.lock.unlock_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn unauthorized_tag_mutates_nothing() {
    let mut h = harness().await;

    h.tags.present_tag(vec![9, 9, 9, 9]).await.unwrap();
    h.controller.handle_key(Key::Star).await;

    assert!(h.lock.transitions().is_empty());
    assert_eq!(h.controller.credential().as_str(), "1234");
    assert!(h.controller.mode().is_idle());
    assert_eq!(h.controller.mail_state(), Default::default());
    assert!(h.display.has_shown("Access Denied!"));
    // Back at the menu
    assert_eq!(h.display.line(0), "Enter PIN or *  ");
}

#[tokio::test(start_paused = true)]
async fn tag_reader_failure_returns_to_menu() {
    let mut h = harness().await;

    // Closing the channel makes the read fail immediately
    drop(h.tags);
    h.controller.handle_key(Key::Star).await;

    assert!(h.controller.mode().is_idle());
    assert!(h.lock.transitions().is_empty());
    assert_eq!(h.display.line(0), "Enter PIN or *  ");
}

#[tokio::test(start_paused = true)]
async fn pin_change_times_out_after_twenty_seconds() {
    let mut h = harness().await;

    h.tags.present_tag(AUTHORIZED_UID.to_vec()).await.unwrap();
    h.controller.handle_key(Key::Star).await;
    assert!(h.controller.mode().is_changing_pin());

    // One digit entered, then the user walks away
    h.controller.handle_key(Key::Digit(5)).await;

    tokio::time::advance(Duration::from_secs(21)).await;
    h.controller.tick().await;

    assert!(h.controller.mode().is_idle());
    assert_eq!(h.controller.credential().as_str(), "1234");
    // 17-character message, truncated to the 16-column panel
    assert!(h.display.has_shown("Timeout! TryAgai"));
    assert_eq!(h.display.line(0), "Enter PIN or *  ");
}

#[tokio::test(start_paused = true)]
async fn pin_change_does_not_time_out_early() {
    let mut h = harness().await;

    h.tags.present_tag(AUTHORIZED_UID.to_vec()).await.unwrap();
    h.controller.handle_key(Key::Star).await;

    tokio::time::advance(Duration::from_secs(19)).await;
    h.controller.tick().await;

    assert!(h.controller.mode().is_changing_pin());
}

#[tokio::test(start_paused = true)]
async fn non_digit_keys_ignored_while_changing_pin() {
    let mut h = harness().await;

    h.tags.present_tag(AUTHORIZED_UID.to_vec()).await.unwrap();
    h.controller.handle_key(Key::Star).await;

    h.controller.handle_key(Key::Hash).await;
    h.controller.handle_key(Key::Star).await;
    h.controller.handle_key(Key::Function('C')).await;

    // Still changing, no lock driven, credential untouched
    assert!(h.controller.mode().is_changing_pin());
    assert_eq!(h.lock.transitions(), vec![LockPosition::Unlocked]);
    assert_eq!(h.controller.credential().as_str(), "1234");
}

#[tokio::test(start_paused = true)]
async fn shutdown_halts_actuator_unconditionally() {
    let mut h = harness().await;

    // Mid PIN entry, mail present: shutdown assumes nothing about phase
    enter_digits(&mut h, &[1, 2]).await;
    h.controller.check_mail(Some(2.0)).await;

    h.controller.shutdown().await;

    assert!(h.lock.is_halted());
    assert!(!h.indicator.is_on());
    assert!(h.display.has_shown("Restarting..."));
}
