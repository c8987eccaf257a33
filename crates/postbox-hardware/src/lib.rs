//! Hardware device abstraction layer for the Postbox letterbox controller.
//!
//! This crate provides trait-based abstractions for the peripherals of a
//! smart letterbox: the keypad matrix, RFID tag reader, ultrasonic distance
//! sensor, lock actuator, character display, remote notifier, and indicator
//! LED. The traits let the controller stay polymorphic over mock
//! implementations (for development and testing) and real hardware drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native
//!   `async fn` in traits (Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error
//!   information; transient sensor misses are `Ok(None)`, never errors.
//!
//! # Mock devices
//!
//! Every trait ships a mock backend in [`mock`], driven through a handle:
//!
//! ```
//! use postbox_hardware::mock::MockKeypad;
//! use postbox_hardware::traits::{Key, KeypadDevice};
//!
//! #[tokio::main]
//! async fn main() -> postbox_hardware::Result<()> {
//!     let (mut keypad, handle) = MockKeypad::new();
//!
//!     handle.press(Key::Digit(5));
//!     assert_eq!(keypad.poll_key().await?, Some(Key::Digit(5)));
//!
//!     handle.release();
//!     assert_eq!(keypad.poll_key().await?, None);
//!     Ok(())
//! }
//! ```

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use error::{HardwareError, Result};
pub use traits::{
    DisplayDevice, DistanceSensorDevice, IndicatorDevice, Key, KeypadDevice, LockDevice,
    LockPosition, NotifierDevice, TagRead, TagReaderDevice,
};
pub use types::DeviceInfo;
