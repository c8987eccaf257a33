//! Mock lock actuator implementation for testing and development.

use crate::{
    Result,
    traits::{LockDevice, LockPosition},
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct LockState {
    position: Option<LockPosition>,
    transitions: Vec<LockPosition>,
    halted: bool,
}

/// Mock lock actuator for testing and development.
///
/// Records every commanded position so tests can assert on the drive
/// history. The settle delay defaults to zero; tests exercising open-loop
/// timing can configure one (it is served through tokio's clock, so paused
/// test time advances through it instantly).
///
/// # Examples
///
/// ```
/// use postbox_hardware::mock::MockLock;
/// use postbox_hardware::traits::{LockDevice, LockPosition};
///
/// #[tokio::main]
/// async fn main() -> postbox_hardware::Result<()> {
///     let (mut lock, handle) = MockLock::new();
///
///     lock.set_position(LockPosition::Unlocked).await?;
///     assert_eq!(handle.position(), Some(LockPosition::Unlocked));
///     assert_eq!(handle.transitions(), vec![LockPosition::Unlocked]);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockLock {
    state: Arc<Mutex<LockState>>,
    settle: Duration,
}

impl MockLock {
    /// Create a new mock lock with no settle delay.
    ///
    /// Returns a tuple of (MockLock, MockLockHandle) where the handle can be
    /// used to observe the drive history.
    pub fn new() -> (Self, MockLockHandle) {
        Self::with_settle(Duration::ZERO)
    }

    /// Create a new mock lock with the given settle delay.
    pub fn with_settle(settle: Duration) -> (Self, MockLockHandle) {
        let state = Arc::new(Mutex::new(LockState::default()));

        let lock = Self {
            state: Arc::clone(&state),
            settle,
        };

        (lock, MockLockHandle { state })
    }
}

impl LockDevice for MockLock {
    async fn set_position(&mut self, position: LockPosition) -> Result<()> {
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }

        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.position = Some(position);
        state.transitions.push(position);
        state.halted = false;
        Ok(())
    }

    async fn halt(&mut self) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        state.halted = true;
        Ok(())
    }
}

/// Handle for observing a mock lock.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockLockHandle {
    state: Arc<Mutex<LockState>>,
}

impl MockLockHandle {
    /// The last commanded position, if any command has been issued.
    pub fn position(&self) -> Option<LockPosition> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .position
    }

    /// Every position commanded so far, in order.
    pub fn transitions(&self) -> Vec<LockPosition> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .transitions
            .clone()
    }

    /// Count of unlock commands issued so far.
    pub fn unlock_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .transitions
            .iter()
            .filter(|p| !p.is_locked())
            .count()
    }

    /// Whether the drive signal has been halted since the last command.
    pub fn is_halted(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .halted
    }
}
