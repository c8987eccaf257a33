//! Mock character display implementation for testing and development.

use crate::{Result, traits::DisplayDevice};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
struct DisplayState {
    lines: Vec<String>,
    history: Vec<(usize, String)>,
    initialized: bool,
    init_failures_remaining: u32,
    fail_writes: bool,
}

/// Mock two-line character display for testing and development.
///
/// Stores whatever the controller renders so tests can assert on screen
/// content and on the write history (the screen model is expected to
/// suppress repaints of identical content, which the history makes
/// observable). Init failures can be injected to exercise the bounded
/// startup retry.
///
/// # Examples
///
/// ```
/// use postbox_hardware::mock::MockDisplay;
/// use postbox_hardware::traits::DisplayDevice;
///
/// #[tokio::main]
/// async fn main() -> postbox_hardware::Result<()> {
///     let (mut display, handle) = MockDisplay::new();
///
///     display.init().await?;
///     display.show_line(0, "Box Unlocked!   ").await?;
///
///     assert_eq!(handle.line(0), "Box Unlocked!   ");
///     assert_eq!(handle.write_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDisplay {
    state: Arc<Mutex<DisplayState>>,
    lines: usize,
}

impl MockDisplay {
    /// Create a new two-line mock display.
    ///
    /// Returns a tuple of (MockDisplay, MockDisplayHandle) where the handle
    /// can be used to observe rendered content and inject failures.
    pub fn new() -> (Self, MockDisplayHandle) {
        Self::with_lines(2)
    }

    /// Create a new mock display with the given number of lines.
    pub fn with_lines(lines: usize) -> (Self, MockDisplayHandle) {
        let state = Arc::new(Mutex::new(DisplayState {
            lines: vec![String::new(); lines],
            history: Vec::new(),
            initialized: false,
            init_failures_remaining: 0,
            fail_writes: false,
        }));

        let display = Self {
            state: Arc::clone(&state),
            lines,
        };

        (display, MockDisplayHandle { state })
    }
}

impl DisplayDevice for MockDisplay {
    async fn init(&mut self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if state.init_failures_remaining > 0 {
            state.init_failures_remaining -= 1;
            return Err(crate::HardwareError::initialization_failed(
                "Display controller did not acknowledge",
            ));
        }

        state.initialized = true;
        Ok(())
    }

    async fn show_line(&mut self, line: usize, text: &str) -> Result<()> {
        if line >= self.lines {
            return Err(crate::HardwareError::invalid_data(format!(
                "Line {} out of range (display has {} lines)",
                line, self.lines
            )));
        }

        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if state.fail_writes {
            return Err(crate::HardwareError::communication("Display write failed"));
        }

        state.lines[line] = text.to_string();
        state.history.push((line, text.to_string()));
        Ok(())
    }

    async fn clear(&mut self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if state.fail_writes {
            return Err(crate::HardwareError::communication("Display write failed"));
        }

        for line in &mut state.lines {
            line.clear();
        }
        Ok(())
    }
}

/// Handle for observing and controlling a mock display.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    state: Arc<Mutex<DisplayState>>,
}

impl MockDisplayHandle {
    /// Current content of the given line (empty if never written).
    pub fn line(&self, line: usize) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .lines
            .get(line)
            .cloned()
            .unwrap_or_default()
    }

    /// Every `(line, text)` write in order.
    pub fn history(&self) -> Vec<(usize, String)> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }

    /// Total number of line writes so far.
    pub fn write_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .len()
    }

    /// Whether any write has ever rendered the given text.
    pub fn has_shown(&self, text: &str) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .iter()
            .any(|(_, t)| t.trim_end() == text)
    }

    /// Whether `init` has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .initialized
    }

    /// Make the next `n` init attempts fail.
    pub fn fail_init_times(&self, n: u32) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .init_failures_remaining = n;
    }

    /// Make every write fail (or succeed again) from now on.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_writes = fail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_display_renders_lines() {
        let (mut display, handle) = MockDisplay::new();

        display.show_line(0, "Enter PIN or *  ").await.unwrap();
        display.show_line(1, "* for RFID Scan ").await.unwrap();

        assert_eq!(handle.line(0), "Enter PIN or *  ");
        assert_eq!(handle.line(1), "* for RFID Scan ");
        assert_eq!(handle.write_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_display_line_out_of_range() {
        let (mut display, _handle) = MockDisplay::new();
        assert!(display.show_line(2, "nope").await.is_err());
    }

    #[tokio::test]
    async fn test_mock_display_init_failure_injection() {
        let (mut display, handle) = MockDisplay::new();
        handle.fail_init_times(2);

        assert!(display.init().await.is_err());
        assert!(display.init().await.is_err());
        assert!(display.init().await.is_ok());
        assert!(handle.is_initialized());
    }

    #[tokio::test]
    async fn test_mock_display_write_failure_injection() {
        let (mut display, handle) = MockDisplay::new();

        handle.set_fail_writes(true);
        assert!(display.show_line(0, "text").await.is_err());

        handle.set_fail_writes(false);
        assert!(display.show_line(0, "text").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_display_clear() {
        let (mut display, handle) = MockDisplay::new();

        display.show_line(0, "something").await.unwrap();
        display.clear().await.unwrap();

        assert_eq!(handle.line(0), "");
    }
}
