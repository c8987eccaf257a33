//! Two-line character screen model.
//!
//! Wraps a [`DisplayDevice`] with the formatting rules of the 16x2 panel:
//! every line is truncated to the column width and right-padded with spaces
//! so stale characters never remain on screen. The model caches the last
//! rendered content and suppresses writes of identical lines, since mail polling
//! must not repaint the screen every sample.
//!
//! Display I/O is best effort in steady state: write errors are logged and
//! swallowed. If initialization fails past the bounded retries the
//! screen degrades to a display-less mode in which writes are skipped
//! entirely; the letterbox keeps operating without its panel.

use postbox_core::constants::{DISPLAY_COLUMNS, DISPLAY_LINES};
use postbox_hardware::DisplayDevice;
use std::time::Duration;
use tracing::{error, warn};

/// Truncate text to a maximum number of characters.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Fit text to a fixed line width: truncate if longer, right-pad with
/// spaces if shorter.
///
/// # Examples
///
/// ```
/// use postbox_controller::fit_line;
///
/// assert_eq!(fit_line("Box Locked!", 16), "Box Locked!     ");
/// assert_eq!(fit_line("Timeout! TryAgain", 16), "Timeout! TryAgai");
/// assert_eq!(fit_line("", 4), "    ");
/// ```
pub fn fit_line(text: &str, width: usize) -> String {
    let char_count = text.chars().count();

    if char_count >= width {
        return truncate_text(text, width);
    }

    format!("{}{}", text, " ".repeat(width - char_count))
}

/// Fixed-geometry screen front-end over a display device.
#[derive(Debug)]
pub struct Screen<D> {
    device: D,
    columns: usize,
    buffer: Vec<String>,
    degraded: bool,
}

impl<D: DisplayDevice> Screen<D> {
    /// Wrap a display device with the standard 16x2 geometry.
    pub fn new(device: D) -> Self {
        Self {
            device,
            columns: DISPLAY_COLUMNS,
            buffer: vec![String::new(); DISPLAY_LINES],
            degraded: false,
        }
    }

    /// Initialize the display, retrying a bounded number of times.
    ///
    /// On exhaustion the screen enters degraded display-less mode: all
    /// subsequent writes are skipped. The controller keeps running either
    /// way.
    pub async fn init_with_retry(&mut self, attempts: u32, backoff: Duration) {
        for attempt in 1..=attempts {
            match self.device.init().await {
                Ok(()) => return,
                Err(err) => {
                    warn!(attempt, %err, "display init failed");
                    if attempt < attempts {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        error!("display init exhausted retries; continuing without display");
        self.degraded = true;
    }

    /// Whether the screen has degraded to display-less mode.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Render both lines, skipping device writes for unchanged content.
    pub async fn show(&mut self, line1: &str, line2: &str) {
        self.set_line(0, line1).await;
        self.set_line(1, line2).await;
    }

    async fn set_line(&mut self, line: usize, text: &str) {
        let fitted = fit_line(text, self.columns);

        if self.buffer[line] == fitted {
            return;
        }

        if self.degraded {
            // Track content anyway so repaint suppression stays coherent
            self.buffer[line] = fitted;
            return;
        }

        match self.device.show_line(line, &fitted).await {
            Ok(()) => self.buffer[line] = fitted,
            Err(err) => warn!(line, %err, "display write failed"),
        }
    }
}
