use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};

use crate::Publisher;

/// In-process topic bus: one broadcast channel per topic, created lazily.
/// This is the default transport for a single-process deployment and for
/// tests; anything else plugs in behind the `Publisher` trait.
#[derive(Clone, Default)]
pub struct LocalBus {
    topics: Arc<RwLock<HashMap<String, broadcast::Sender<Value>>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a topic. The channel is created if nobody published or
    /// subscribed to it yet.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<Value> {
        let mut topics = self.topics.write().await;
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(64).0)
            .subscribe()
    }
}

#[async_trait]
impl Publisher for LocalBus {
    async fn publish(&self, topic: &str, message: Value) -> Result<()> {
        let topics = self.topics.read().await;
        if let Some(tx) = topics.get(topic) {
            // A send error just means no subscriber is currently listening.
            let _ = tx.send(message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn delivers_to_topic_subscribers() {
        let bus = LocalBus::new();
        let mut rx = bus.subscribe("teams:42").await;

        bus.publish("teams:42", json!({"hello": true})).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), json!({"hello": true}));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_fine() {
        let bus = LocalBus::new();
        bus.publish("nobody:listening", json!({})).await.unwrap();
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let bus = LocalBus::new();
        let mut a = bus.subscribe("a").await;
        let _b = bus.subscribe("b").await;

        bus.publish("b", json!(1)).await.unwrap();
        assert!(a.try_recv().is_err());
    }
}
