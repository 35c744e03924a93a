use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

/// the single latest sensor reading, shared between request handlers
///
/// cloning is cheap and every clone points at the same slot.
/// the payload is kept as raw json so any shape the device sends survives
/// untouched, e.g. {"temperature": 22.5, "humidity": 60}
#[derive(Clone, Debug)]
pub struct ReadingSlot {
    inner: Arc<RwLock<Value>>,
}

impl Default for ReadingSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingSlot {
    /// an empty slot; reads as `{}` until the first write
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Value::Object(Default::default()))),
        }
    }

    /// replace the stored reading in full
    pub async fn store(&self, reading: Value) {
        *self.inner.write().await = reading;
    }

    /// copy of the current reading
    pub async fn latest(&self) -> Value {
        self.inner.read().await.clone()
    }
}
