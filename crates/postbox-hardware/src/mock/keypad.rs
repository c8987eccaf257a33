//! Mock keypad implementation for testing and development.
//!
//! The mock models the keypad as a *level* signal, matching the physical
//! matrix scan: while a key is held, every poll reports the same key;
//! releasing it reports `None`. Debouncing into discrete presses happens
//! upstream in the controller's edge detector, so tests drive realistic
//! press/release sequences here.

use crate::{
    Result,
    traits::{Key, KeypadDevice},
    types::DeviceInfo,
};
use tokio::sync::watch;

/// Mock keypad device for testing and development.
///
/// # Examples
///
/// ```
/// use postbox_hardware::mock::MockKeypad;
/// use postbox_hardware::traits::{Key, KeypadDevice};
///
/// #[tokio::main]
/// async fn main() -> postbox_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     assert_eq!(keypad.poll_key().await?, None);
///
///     handle.press(Key::Hash);
///     assert_eq!(keypad.poll_key().await?, Some(Key::Hash));
///     // A held key reports the same level on every poll
///     assert_eq!(keypad.poll_key().await?, Some(Key::Hash));
///
///     handle.release();
///     assert_eq!(keypad.poll_key().await?, None);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Current key level, shared with the handle.
    level_rx: watch::Receiver<Option<Key>>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    ///
    /// Returns a tuple of (MockKeypad, MockKeypadHandle) where the handle
    /// can be used to simulate key presses and releases.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (level_tx, level_rx) = watch::channel(None);

        let keypad = Self {
            level_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { level_tx, name };

        (keypad, handle)
    }
}

impl KeypadDevice for MockKeypad {
    async fn poll_key(&mut self) -> Result<Option<Key>> {
        Ok(*self.level_rx.borrow())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock 4x4 Matrix").with_firmware_version("1.0.0"))
    }
}

/// Handle for controlling a mock keypad.
///
/// Allows programmatic control of the key level. It can be cloned and shared
/// across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Level sender shared with the keypad.
    level_tx: watch::Sender<Option<Key>>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Assert a key, as if the user pressed and held it.
    pub fn press(&self, key: Key) {
        let _ = self.level_tx.send(Some(key));
    }

    /// Release whatever key is currently asserted.
    pub fn release(&self) {
        let _ = self.level_tx.send(None);
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
