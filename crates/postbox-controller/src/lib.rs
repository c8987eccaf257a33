//! Letterbox access controller.
//!
//! This crate contains the core of the Postbox system: the PIN/RFID/mode
//! state machine, mail detection with idempotent notification, the 16x2
//! screen model, keypad edge detection, and the cooperative driver loop that
//! ties them to the hardware abstractions.
//!
//! # Architecture
//!
//! ```text
//! Driver (cooperative loop)
//!     |-- KeypadDevice -> KeyEdgeDetector -> AccessController::handle_key
//!     |-- DistanceSensorDevice (2 s cadence) -> AccessController::check_mail
//!     |-- AccessController::tick (PIN-change timeout)
//!     `-- shutdown watch channel (preempts everything)
//!
//! AccessController
//!     |-- ControllerState (mode, entry buffers, credential)
//!     |-- MailMonitor (presence debounce, notification latch)
//!     |-- Screen<DisplayDevice> (truncate/pad, repaint suppression)
//!     `-- LockDevice / TagReaderDevice / NotifierDevice / IndicatorDevice
//! ```
//!
//! All state lives in the controller and is touched only from the driver
//! loop; devices hold no correctness-relevant state.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod driver;
pub mod mail;
pub mod screen;
pub mod state;

pub use config::ControllerConfig;
pub use controller::AccessController;
pub use debounce::KeyEdgeDetector;
pub use driver::Driver;
pub use mail::{MailEvent, MailMonitor};
pub use screen::{Screen, fit_line, truncate_text};
pub use state::{ControllerMode, ControllerState, MailState};
