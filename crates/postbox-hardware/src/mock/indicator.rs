//! Mock indicator LED implementation for testing and development.

use crate::{Result, traits::IndicatorDevice};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct IndicatorState {
    on: bool,
    changes: usize,
}

/// Mock indicator LED for testing and development.
///
/// # Examples
///
/// ```
/// use postbox_hardware::mock::MockIndicator;
/// use postbox_hardware::traits::IndicatorDevice;
///
/// #[tokio::main]
/// async fn main() -> postbox_hardware::Result<()> {
///     let (mut led, handle) = MockIndicator::new();
///
///     led.set_on(true).await?;
///     assert!(handle.is_on());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockIndicator {
    state: Arc<Mutex<IndicatorState>>,
}

impl MockIndicator {
    /// Create a new mock indicator, initially off.
    ///
    /// Returns a tuple of (MockIndicator, MockIndicatorHandle) where the
    /// handle can be used to observe the output state.
    pub fn new() -> (Self, MockIndicatorHandle) {
        let state = Arc::new(Mutex::new(IndicatorState::default()));

        let indicator = Self {
            state: Arc::clone(&state),
        };

        (indicator, MockIndicatorHandle { state })
    }
}

impl IndicatorDevice for MockIndicator {
    async fn set_on(&mut self, on: bool) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if state.on != on {
            state.changes += 1;
        }
        state.on = on;
        Ok(())
    }
}

/// Handle for observing a mock indicator.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockIndicatorHandle {
    state: Arc<Mutex<IndicatorState>>,
}

impl MockIndicatorHandle {
    /// Current output state.
    pub fn is_on(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .on
    }

    /// Number of observable on/off transitions so far.
    pub fn change_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .changes
    }
}
