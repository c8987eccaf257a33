//! Mock RFID tag reader implementation for testing and development.

use crate::{
    Result,
    traits::{TagRead, TagReaderDevice},
    types::DeviceInfo,
};
use tokio::sync::mpsc;

/// Mock RFID tag reader for testing and development.
///
/// Reads block until the handle presents a tag, mirroring the blocking
/// behavior of the real reader (which waits indefinitely for a tag).
///
/// # Examples
///
/// ```
/// use postbox_hardware::mock::MockTagReader;
/// use postbox_hardware::traits::TagReaderDevice;
///
/// #[tokio::main]
/// async fn main() -> postbox_hardware::Result<()> {
///     let (mut reader, handle) = MockTagReader::new();
///
///     handle.present_tag(vec![0x04, 0xAB, 0xCD, 0xEF]).await?;
///
///     let tag = reader.read_tag().await?;
///     assert_eq!(tag.uid_hex(), "04ABCDEF");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockTagReader {
    /// Channel receiver for presented tags
    tag_rx: mpsc::Receiver<TagRead>,

    /// Device name
    name: String,
}

impl MockTagReader {
    /// Create a new mock tag reader with the default name.
    ///
    /// Returns a tuple of (MockTagReader, MockTagReaderHandle) where the
    /// handle can be used to simulate tag presentations.
    pub fn new() -> (Self, MockTagReaderHandle) {
        Self::with_name("Mock Tag Reader".to_string())
    }

    /// Create a new mock tag reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockTagReaderHandle) {
        let (tag_tx, tag_rx) = mpsc::channel(32);

        let reader = Self {
            tag_rx,
            name: name.clone(),
        };

        let handle = MockTagReaderHandle { tag_tx, name };

        (reader, handle)
    }
}

impl TagReaderDevice for MockTagReader {
    async fn read_tag(&mut self) -> Result<TagRead> {
        self.tag_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("Tag reader channel closed"))
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock MFRC522").with_firmware_version("1.0.0"))
    }
}

/// Handle for controlling a mock tag reader.
///
/// It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockTagReaderHandle {
    /// Channel sender for presented tags
    tag_tx: mpsc::Sender<TagRead>,

    /// Device name
    name: String,
}

impl MockTagReaderHandle {
    /// Present a tag with the given UID to the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID length is invalid or the reader has been
    /// dropped and the channel is closed.
    pub async fn present_tag(&self, uid: Vec<u8>) -> Result<()> {
        let tag = TagRead::new(uid)?;
        self.tag_tx
            .send(tag)
            .await
            .map_err(|_| crate::HardwareError::disconnected("Tag reader channel closed"))
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_tag_reader_present_and_read() {
        let (mut reader, handle) = MockTagReader::new();

        handle
            .present_tag(vec![0x01, 0x02, 0x03, 0x04])
            .await
            .unwrap();

        let tag = reader.read_tag().await.unwrap();
        assert_eq!(tag.uid_decimal(), "16909060");
    }

    #[tokio::test]
    async fn test_mock_tag_reader_blocks_until_presented() {
        let (mut reader, handle) = MockTagReader::new();

        tokio::spawn(async move {
            handle
                .present_tag(vec![0xDE, 0xAD, 0xBE, 0xEF])
                .await
                .unwrap();
        });

        let tag = reader.read_tag().await.unwrap();
        assert_eq!(tag.uid_hex(), "DEADBEEF");
    }

    #[tokio::test]
    async fn test_mock_tag_reader_rejects_invalid_uid() {
        let (_reader, handle) = MockTagReader::new();
        assert!(handle.present_tag(vec![0x01]).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_tag_reader_closed_channel() {
        let (mut reader, handle) = MockTagReader::new();
        drop(handle);

        assert!(reader.read_tag().await.is_err());
    }
}
