//! The cooperative driver loop.
//!
//! Single-threaded scheduling: each iteration performs, in order, one
//! non-blocking keypad sample (through the edge detector), a mail-distance
//! sample gated on the wall-clock interval, and the PIN-change timeout
//! check, then sleeps for the poll interval. Tag reads and lock sequences
//! run inline and block the iteration; keypad, RFID, and lock work is
//! strictly serialized with mail checks, never interleaved.
//!
//! The one asynchronous entry point is the shutdown signal: a watch channel
//! polled by `select!` around every iteration, so it preempts even a
//! blocking tag read. Steady-state device errors are logged and swallowed;
//! the loop never terminates itself except via the shutdown path.

use crate::controller::AccessController;
use crate::debounce::KeyEdgeDetector;
use postbox_hardware::{
    DisplayDevice, DistanceSensorDevice, IndicatorDevice, KeypadDevice, LockDevice,
    NotifierDevice, TagReaderDevice,
};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, sleep};
use tracing::{info, warn};

/// Drives the access controller from the sensor inputs.
pub struct Driver<K, S, D, L, T, N, I> {
    keypad: K,
    sensor: S,
    controller: AccessController<D, L, T, N, I>,
    edges: KeyEdgeDetector,
    poll_interval: Duration,
    mail_check_interval: Duration,
    last_mail_check: Option<Instant>,
}

impl<K, S, D, L, T, N, I> Driver<K, S, D, L, T, N, I>
where
    K: KeypadDevice,
    S: DistanceSensorDevice,
    D: DisplayDevice,
    L: LockDevice,
    T: TagReaderDevice,
    N: NotifierDevice,
    I: IndicatorDevice,
{
    /// Assemble a driver around a controller and its input devices.
    pub fn new(keypad: K, sensor: S, controller: AccessController<D, L, T, N, I>) -> Self {
        let poll_interval = controller.config().poll_interval;
        let mail_check_interval = controller.config().mail_check_interval;

        Self {
            keypad,
            sensor,
            controller,
            edges: KeyEdgeDetector::new(),
            poll_interval,
            mail_check_interval,
            last_mail_check: None,
        }
    }

    /// Run the loop until the shutdown signal fires or its sender drops.
    ///
    /// On shutdown the actuator drive is halted unconditionally, whatever
    /// phase the loop was in.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        self.controller.start().await;
        info!("driver loop started");

        loop {
            tokio::select! {
                // A closed channel is a shutdown too
                _ = shutdown.changed() => break,
                () = self.step() => {}
            }
        }

        self.controller.shutdown().await;
        info!("driver loop stopped");
    }

    /// One loop iteration: keypad, then mail cadence, then timeouts.
    async fn step(&mut self) {
        let sample = match self.keypad.poll_key().await {
            Ok(sample) => sample,
            Err(err) => {
                warn!(%err, "keypad poll failed");
                None
            }
        };
        if let Some(key) = self.edges.update(sample) {
            self.controller.handle_key(key).await;
        }

        let mail_due = self
            .last_mail_check
            .is_none_or(|at| at.elapsed() >= self.mail_check_interval);
        if mail_due {
            let reading = match self.sensor.measure_cm().await {
                Ok(reading) => reading,
                Err(err) => {
                    warn!(%err, "distance measurement failed");
                    None
                }
            };
            self.controller.check_mail(reading).await;
            self.last_mail_check = Some(Instant::now());
        }

        self.controller.tick().await;

        sleep(self.poll_interval).await;
    }
}
