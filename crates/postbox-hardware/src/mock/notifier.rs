//! Mock remote notifier implementation for testing and development.

use crate::{Result, traits::NotifierDevice};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct NotifierState {
    messages: Vec<String>,
    fail: bool,
}

/// Mock notifier for testing and development.
///
/// Records every delivered message. Transport failures can be injected to
/// verify that the controller logs and swallows them; notification is best
/// effort and must never affect letterbox operation.
///
/// # Examples
///
/// ```
/// use postbox_hardware::mock::MockNotifier;
/// use postbox_hardware::traits::NotifierDevice;
///
/// #[tokio::main]
/// async fn main() -> postbox_hardware::Result<()> {
///     let (mut notifier, handle) = MockNotifier::new();
///
///     notifier.notify("New mail in the letterbox").await?;
///     assert_eq!(handle.sent_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockNotifier {
    state: Arc<Mutex<NotifierState>>,
}

impl MockNotifier {
    /// Create a new mock notifier.
    ///
    /// Returns a tuple of (MockNotifier, MockNotifierHandle) where the
    /// handle can be used to observe deliveries and inject failures.
    pub fn new() -> (Self, MockNotifierHandle) {
        let state = Arc::new(Mutex::new(NotifierState::default()));

        let notifier = Self {
            state: Arc::clone(&state),
        };

        (notifier, MockNotifierHandle { state })
    }
}

impl NotifierDevice for MockNotifier {
    async fn notify(&mut self, message: &str) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if state.fail {
            return Err(crate::HardwareError::communication(
                "Notification transport unreachable",
            ));
        }

        state.messages.push(message.to_string());
        Ok(())
    }
}

/// Handle for observing a mock notifier.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockNotifierHandle {
    state: Arc<Mutex<NotifierState>>,
}

impl MockNotifierHandle {
    /// Number of notifications delivered so far.
    pub fn sent_count(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .messages
            .len()
    }

    /// Every delivered message, in order.
    pub fn messages(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .messages
            .clone()
    }

    /// Make every delivery fail (or succeed again) from now on.
    pub fn set_failing(&self, fail: bool) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fail = fail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_notifier_records_messages() {
        let (mut notifier, handle) = MockNotifier::new();

        notifier.notify("first").await.unwrap();
        notifier.notify("second").await.unwrap();

        assert_eq!(handle.sent_count(), 2);
        assert_eq!(handle.messages(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_mock_notifier_failure_injection() {
        let (mut notifier, handle) = MockNotifier::new();

        handle.set_failing(true);
        assert!(notifier.notify("lost").await.is_err());
        assert_eq!(handle.sent_count(), 0);

        handle.set_failing(false);
        assert!(notifier.notify("delivered").await.is_ok());
        assert_eq!(handle.sent_count(), 1);
    }
}
