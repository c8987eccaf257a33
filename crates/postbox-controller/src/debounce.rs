//! Keypad edge detection.
//!
//! The keypad is scanned as a level signal: a held key is reported on every
//! poll. The edge detector compares each sample against the previous one and
//! emits a discrete press only on a change, so the controller never sees raw
//! level samples. Releasing a key (a `None` sample) re-arms detection for
//! that key.

use postbox_hardware::Key;

/// Converts raw keypad level samples into discrete key-press events.
///
/// # Examples
///
/// ```
/// use postbox_controller::KeyEdgeDetector;
/// use postbox_hardware::Key;
///
/// let mut edges = KeyEdgeDetector::new();
///
/// assert_eq!(edges.update(Some(Key::Digit(1))), Some(Key::Digit(1)));
/// // Held key: no further events
/// assert_eq!(edges.update(Some(Key::Digit(1))), None);
/// // Release, press again: a new event
/// assert_eq!(edges.update(None), None);
/// assert_eq!(edges.update(Some(Key::Digit(1))), Some(Key::Digit(1)));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEdgeDetector {
    last: Option<Key>,
}

impl KeyEdgeDetector {
    /// Create a detector with no key asserted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one level sample; returns the key iff this sample is a new press.
    pub fn update(&mut self, sample: Option<Key>) -> Option<Key> {
        let pressed = match sample {
            Some(key) if self.last != Some(key) => Some(key),
            _ => None,
        };
        self.last = sample;
        pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_press_emits() {
        let mut edges = KeyEdgeDetector::new();
        assert_eq!(edges.update(Some(Key::Hash)), Some(Key::Hash));
    }

    #[test]
    fn test_held_key_is_one_press() {
        let mut edges = KeyEdgeDetector::new();
        assert_eq!(edges.update(Some(Key::Digit(5))), Some(Key::Digit(5)));

        for _ in 0..10 {
            assert_eq!(edges.update(Some(Key::Digit(5))), None);
        }
    }

    #[test]
    fn test_release_then_press_re_emits() {
        let mut edges = KeyEdgeDetector::new();
        assert_eq!(edges.update(Some(Key::Digit(5))), Some(Key::Digit(5)));
        assert_eq!(edges.update(None), None);
        assert_eq!(edges.update(Some(Key::Digit(5))), Some(Key::Digit(5)));
    }

    #[test]
    fn test_direct_key_change_emits() {
        let mut edges = KeyEdgeDetector::new();
        assert_eq!(edges.update(Some(Key::Digit(1))), Some(Key::Digit(1)));
        // Rollover to a different key without an intervening release
        assert_eq!(edges.update(Some(Key::Digit(2))), Some(Key::Digit(2)));
    }

    #[test]
    fn test_idle_samples_emit_nothing() {
        let mut edges = KeyEdgeDetector::new();
        for _ in 0..10 {
            assert_eq!(edges.update(None), None);
        }
    }
}
