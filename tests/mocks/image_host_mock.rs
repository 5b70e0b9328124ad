use async_trait::async_trait;
use tokio::sync::Mutex;

use shopfront::relay::{ImageHost, RelayError};

/// Records uploads instead of sending them anywhere.
#[derive(Default)]
pub struct RecordingHost {
    pub uploads: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingHost {
    pub async fn uploaded(&self, name: &str) -> Option<Vec<u8>> {
        self.uploads
            .lock()
            .await
            .iter()
            .find(|(uploaded, _)| uploaded == name)
            .map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl ImageHost for RecordingHost {
    async fn upsert(&self, name: &str, bytes: &[u8]) -> Result<(), RelayError> {
        println!("[MOCK HOST] upsert {} ({} bytes)", name, bytes.len());
        self.uploads.lock().await.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}
