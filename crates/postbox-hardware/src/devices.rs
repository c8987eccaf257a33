//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) are not object-safe,
//! so `Box<dyn KeypadDevice>` is unavailable. These enum wrappers provide
//! concrete type dispatch instead: zero-cost at compile time, type-safe to
//! extend, and friendly to feature-gated hardware backends.
//!
//! # Examples
//!
//! ```
//! use postbox_hardware::devices::AnyKeypadDevice;
//! use postbox_hardware::mock::MockKeypad;
//! use postbox_hardware::traits::KeypadDevice;
//!
//! #[tokio::main]
//! async fn main() -> postbox_hardware::Result<()> {
//!     let (keypad, _handle) = MockKeypad::new();
//!     let mut any_keypad = AnyKeypadDevice::Mock(keypad);
//!
//!     // Used polymorphically through the KeypadDevice trait
//!     let info = any_keypad.get_info().await?;
//!     assert_eq!(info.name, "Mock Keypad");
//!     Ok(())
//! }
//! ```

use crate::mock::{
    MockDisplay, MockDistanceSensor, MockIndicator, MockKeypad, MockLock, MockNotifier,
    MockTagReader,
};
use crate::traits::{
    DisplayDevice, DistanceSensorDevice, IndicatorDevice, Key, KeypadDevice, LockDevice,
    LockPosition, NotifierDevice, TagRead, TagReaderDevice,
};
use crate::types::DeviceInfo;
use crate::Result;

/// Enum wrapper for keypad device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyKeypadDevice {
    /// Mock keypad for development and testing.
    Mock(MockKeypad),
    // TODO: GPIO matrix-scan backend behind the hardware-gpio feature
}

impl KeypadDevice for AnyKeypadDevice {
    async fn poll_key(&mut self) -> Result<Option<Key>> {
        match self {
            Self::Mock(device) => device.poll_key().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for tag reader device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyTagReaderDevice {
    /// Mock tag reader for development and testing.
    Mock(MockTagReader),
}

impl TagReaderDevice for AnyTagReaderDevice {
    async fn read_tag(&mut self) -> Result<TagRead> {
        match self {
            Self::Mock(device) => device.read_tag().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for distance sensor device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyDistanceSensorDevice {
    /// Mock distance sensor for development and testing.
    Mock(MockDistanceSensor),
}

impl DistanceSensorDevice for AnyDistanceSensorDevice {
    async fn measure_cm(&mut self) -> Result<Option<f32>> {
        match self {
            Self::Mock(device) => device.measure_cm().await,
        }
    }
}

/// Enum wrapper for lock actuator device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyLockDevice {
    /// Mock lock for development and testing.
    Mock(MockLock),
}

impl LockDevice for AnyLockDevice {
    async fn set_position(&mut self, position: LockPosition) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_position(position).await,
        }
    }

    async fn halt(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.halt().await,
        }
    }
}

/// Enum wrapper for display device dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyDisplayDevice {
    /// Mock display for development and testing.
    Mock(MockDisplay),
}

impl DisplayDevice for AnyDisplayDevice {
    async fn init(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.init().await,
        }
    }

    async fn show_line(&mut self, line: usize, text: &str) -> Result<()> {
        match self {
            Self::Mock(device) => device.show_line(line, text).await,
        }
    }

    async fn clear(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.clear().await,
        }
    }
}

/// Enum wrapper for notifier dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyNotifierDevice {
    /// Mock notifier for development and testing.
    Mock(MockNotifier),
}

impl NotifierDevice for AnyNotifierDevice {
    async fn notify(&mut self, message: &str) -> Result<()> {
        match self {
            Self::Mock(device) => device.notify(message).await,
        }
    }
}

/// Enum wrapper for indicator dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyIndicatorDevice {
    /// Mock indicator for development and testing.
    Mock(MockIndicator),
}

impl IndicatorDevice for AnyIndicatorDevice {
    async fn set_on(&mut self, on: bool) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_on(on).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_keypad_dispatch() {
        let (keypad, handle) = MockKeypad::new();
        let mut any = AnyKeypadDevice::Mock(keypad);

        handle.press(Key::Hash);
        assert_eq!(any.poll_key().await.unwrap(), Some(Key::Hash));
    }

    #[tokio::test]
    async fn test_any_lock_dispatch() {
        let (lock, handle) = MockLock::new();
        let mut any = AnyLockDevice::Mock(lock);

        any.set_position(LockPosition::Unlocked).await.unwrap();
        assert_eq!(handle.position(), Some(LockPosition::Unlocked));
    }

    #[tokio::test]
    async fn test_any_notifier_dispatch() {
        let (notifier, handle) = MockNotifier::new();
        let mut any = AnyNotifierDevice::Mock(notifier);

        any.notify("hello").await.unwrap();
        assert_eq!(handle.sent_count(), 1);
    }
}
