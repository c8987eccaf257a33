//! Driver-loop behavior: debounced key levels, mail cadence, and shutdown
//! preemption, all under a paused tokio clock.

use postbox_controller::{AccessController, ControllerConfig, Driver};
use postbox_core::TagIdentity;
use postbox_hardware::Key;
use postbox_hardware::mock::{
    MockDisplay, MockDistanceSensor, MockDistanceSensorHandle, MockIndicator, MockKeypad,
    MockKeypadHandle, MockLock, MockLockHandle, MockNotifier, MockNotifierHandle, MockTagReader,
};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct Rig {
    task: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    keypad: MockKeypadHandle,
    sensor: MockDistanceSensorHandle,
    lock: MockLockHandle,
    notifier: MockNotifierHandle,
}

fn spawn_driver() -> Rig {
    let (display, _display_handle) = MockDisplay::new();
    let (lock, lock_handle) = MockLock::new();
    let (tags, _tag_handle) = MockTagReader::new();
    let (notifier, notifier_handle) = MockNotifier::new();
    let (indicator, _indicator_handle) = MockIndicator::new();
    let (keypad, keypad_handle) = MockKeypad::new();
    let (sensor, sensor_handle) = MockDistanceSensor::new();

    let config = ControllerConfig {
        authorized_tag: TagIdentity::new("16909060").unwrap(),
        ..Default::default()
    };
    let controller = AccessController::new(display, lock, tags, notifier, indicator, config);
    let driver = Driver::new(keypad, sensor, controller);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(driver.run(shutdown_rx));

    Rig {
        task,
        shutdown: shutdown_tx,
        keypad: keypad_handle,
        sensor: sensor_handle,
        lock: lock_handle,
        notifier: notifier_handle,
    }
}

/// Press and release a key, giving the loop a few poll intervals to see
/// each level.
async fn tap(keypad: &MockKeypadHandle, key: Key) {
    keypad.press(key);
    tokio::time::sleep(Duration::from_millis(60)).await;
    keypad.release();
    tokio::time::sleep(Duration::from_millis(60)).await;
}

#[tokio::test(start_paused = true)]
async fn held_keys_register_as_single_presses() {
    let rig = spawn_driver();

    // Each key is held across several 20 ms polls; the edge detector must
    // collapse the levels into one press per tap
    for d in [1, 2, 3, 4] {
        tap(&rig.keypad, Key::Digit(d)).await;
    }

    // Let the unlock sequence (dwell + prompt hold) play out
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(rig.lock.unlock_count(), 1);

    rig.shutdown.send(true).unwrap();
    rig.task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn mail_cadence_notifies_once_per_episode() {
    let rig = spawn_driver();

    rig.sensor.set_distance_cm(2.0);
    // Several 2-second mail-check intervals elapse
    tokio::time::sleep(Duration::from_secs(7)).await;

    assert_eq!(rig.notifier.sent_count(), 1);

    rig.sensor.set_distance_cm(30.0);
    tokio::time::sleep(Duration::from_secs(3)).await;

    // Removal does not re-arm; still exactly one notification
    rig.sensor.set_distance_cm(2.0);
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(rig.notifier.sent_count(), 1);

    rig.shutdown.send(true).unwrap();
    rig.task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn shutdown_preempts_blocked_tag_read() {
    let rig = spawn_driver();

    // A scan request with no tag ever presented blocks the loop inside
    // the tag read
    tap(&rig.keypad, Key::Star).await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // The shutdown signal must still preempt it
    rig.shutdown.send(true).unwrap();
    rig.task.await.unwrap();

    assert!(rig.lock.is_halted());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_shutdown_sender_stops_the_loop() {
    let rig = spawn_driver();

    tokio::time::sleep(Duration::from_millis(100)).await;
    drop(rig.shutdown);
    rig.task.await.unwrap();

    assert!(rig.lock.is_halted());
}
