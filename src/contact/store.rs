//! Contact message storage

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tracing::info;

use super::{ContactError, ContactMessage};

/// Destination for accepted contact messages.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Persists the message and returns an identifier for it.
    async fn save(&self, message: &ContactMessage) -> Result<String, ContactError>;
}

// == File Contact Store ==
/// Writes each message as a pretty-printed JSON file in one directory.
#[derive(Debug)]
pub struct FileContactStore {
    dir: PathBuf,
    /// Disambiguates messages received within the same millisecond
    seq: AtomicU64,
}

impl FileContactStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seq: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ContactStore for FileContactStore {
    async fn save(&self, message: &ContactMessage) -> Result<String, ContactError> {
        fs::create_dir_all(&self.dir).await?;

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let id = format!(
            "{}-{:04}",
            message.received_at.format("%Y%m%dT%H%M%S%3fZ"),
            seq
        );
        let path = self.dir.join(format!("{}.json", id));

        let json = serde_json::to_string_pretty(message)?;
        fs::write(&path, json).await?;

        info!("Stored contact message {} from {}", id, message.sender);
        Ok(id)
    }
}
