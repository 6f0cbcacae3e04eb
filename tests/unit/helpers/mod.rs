//! Test helper utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use idstore::state::AppState;
use idstore::versions::STORE_V4;
use idstore::{KeyValueStore, MemoryStore, StoreError};
use tracing_subscriber::fmt::MakeWriter;

/// A legacy (unversioned) store with one user, two connections and one app.
pub fn legacy_store() -> MemoryStore {
    MemoryStore::from_entries([
        (
            "userData",
            r#"{"publicKey": "dXNlcg+/==", "secretKey": "c2VjcmV0", "name": "Ann", "score": 90}"#,
        ),
        (
            "Y29ubjE+/==",
            r#"{"publicKey": "Y29ubjE+/==", "name": "Bob", "score": 70, "connectionDate": 1577836800000}"#,
        ),
        (
            "Y29ubjI=",
            r#"{"publicKey": "Y29ubjI=", "name": "Cy", "score": 95, "connectionDate": 1580515200000}"#,
        ),
        ("App:forum", r#"{"name": "forum", "url": "https://forum.example", "verified": true}"#),
    ])
}

/// A store holding `state` as its v4 snapshot.
pub fn v4_store(state: &AppState) -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .set(STORE_V4, serde_json::to_string(state).unwrap())
        .unwrap();
    store
}

/// Store that lists keys but fails every read.
pub struct FailingStore {
    pub keys: Vec<String>,
    pub message: String,
}

impl FailingStore {
    pub fn new(keys: &[&str], message: &str) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            message: message.to_string(),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn all_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.keys.clone())
    }

    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable(self.message.clone()))
    }

    fn set(&mut self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.message.clone()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(self.message.clone()))
    }
}

/// Captures formatted log output in memory.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).unwrap()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route log events on this thread into a fresh capture buffer.
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}
