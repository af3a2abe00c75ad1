//! Message store with JSON file persistence
//!
//! Same shape as the other stores: an in-memory map behind a `RwLock`,
//! written through to `messages.json` after each insert. Rows are keyed by
//! the re-sent message id, which is what callers look up.

use crate::ids::MessageId;
use crate::messages::types::Message;
use crate::persist;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

const MESSAGES_FILE: &str = "messages.json";

/// Store of proxied message records
pub struct MessageStore {
    data_dir: PathBuf,
    messages: Arc<RwLock<HashMap<MessageId, Message>>>,
}

impl MessageStore {
    /// Create a store, loading the collection from disk.
    pub async fn new(data_dir: PathBuf) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let messages: Vec<Message> = persist::load_collection(&data_dir.join(MESSAGES_FILE));

        Ok(Self {
            data_dir,
            messages: Arc::new(RwLock::new(
                messages.into_iter().map(|m| (m.mid, m)).collect(),
            )),
        })
    }

    pub async fn get(&self, mid: MessageId) -> Option<Message> {
        self.messages.read().await.get(&mid).cloned()
    }

    /// Record a proxied message, replacing any previous row with the same id.
    pub async fn insert(&self, message: Message) {
        self.messages.write().await.insert(message.mid, message);
        self.persist_messages();
    }

    /// Write the collection now, awaiting the result.
    pub async fn flush(&self) -> std::io::Result<()> {
        let mut rows: Vec<Message> = self.messages.read().await.values().cloned().collect();
        rows.sort_by_key(|m| m.mid);
        persist::write_collection(&self.data_dir.join(MESSAGES_FILE), &rows).await
    }

    fn persist_messages(&self) {
        let path = self.data_dir.join(MESSAGES_FILE);
        let messages = self.messages.clone();
        tokio::spawn(async move {
            let mut rows: Vec<Message> = messages.read().await.values().cloned().collect();
            rows.sort_by_key(|m| m.mid);
            if let Err(e) = persist::write_collection(&path, &rows).await {
                tracing::warn!("Failed to persist messages: {}", e);
            }
        });
    }
}
