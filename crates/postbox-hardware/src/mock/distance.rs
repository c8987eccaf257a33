//! Mock distance sensor implementation for testing and development.

use crate::{Result, traits::DistanceSensorDevice};
use tokio::sync::watch;

/// Mock ultrasonic distance sensor for testing and development.
///
/// The handle sets the current reading, which every subsequent sample
/// reports until changed. `None` models a missed echo (the bounded timeout
/// window elapsing without a pulse return).
///
/// # Examples
///
/// ```
/// use postbox_hardware::mock::MockDistanceSensor;
/// use postbox_hardware::traits::DistanceSensorDevice;
///
/// #[tokio::main]
/// async fn main() -> postbox_hardware::Result<()> {
///     let (mut sensor, handle) = MockDistanceSensor::new();
///
///     // Fresh sensor reports a missed echo
///     assert_eq!(sensor.measure_cm().await?, None);
///
///     handle.set_distance_cm(3.2);
///     assert_eq!(sensor.measure_cm().await?, Some(3.2));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDistanceSensor {
    /// Current reading, shared with the handle.
    reading_rx: watch::Receiver<Option<f32>>,
}

impl MockDistanceSensor {
    /// Create a new mock distance sensor reporting no echo.
    ///
    /// Returns a tuple of (MockDistanceSensor, MockDistanceSensorHandle)
    /// where the handle sets the simulated reading.
    pub fn new() -> (Self, MockDistanceSensorHandle) {
        let (reading_tx, reading_rx) = watch::channel(None);

        (
            Self { reading_rx },
            MockDistanceSensorHandle { reading_tx },
        )
    }
}

impl DistanceSensorDevice for MockDistanceSensor {
    async fn measure_cm(&mut self) -> Result<Option<f32>> {
        Ok(*self.reading_rx.borrow())
    }
}

/// Handle for controlling a mock distance sensor.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockDistanceSensorHandle {
    /// Reading sender shared with the sensor.
    reading_tx: watch::Sender<Option<f32>>,
}

impl MockDistanceSensorHandle {
    /// Set the distance reported by subsequent samples, in centimeters.
    pub fn set_distance_cm(&self, cm: f32) {
        let _ = self.reading_tx.send(Some(cm));
    }

    /// Make subsequent samples report a missed echo.
    pub fn set_echo_timeout(&self) {
        let _ = self.reading_tx.send(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_sensor_reading_persists() {
        let (mut sensor, handle) = MockDistanceSensor::new();

        handle.set_distance_cm(4.5);
        assert_eq!(sensor.measure_cm().await.unwrap(), Some(4.5));
        assert_eq!(sensor.measure_cm().await.unwrap(), Some(4.5));
    }

    #[tokio::test]
    async fn test_mock_sensor_echo_timeout() {
        let (mut sensor, handle) = MockDistanceSensor::new();

        handle.set_distance_cm(12.0);
        assert!(sensor.measure_cm().await.unwrap().is_some());

        handle.set_echo_timeout();
        assert_eq!(sensor.measure_cm().await.unwrap(), None);
    }
}
