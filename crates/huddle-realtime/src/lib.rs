pub mod bus;
pub mod capability;
pub mod token;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use capability::Capability;
use token::TokenRequest;

/// Bound on a single best-effort publish so a slow transport can never
/// hold a worker hostage.
const BROADCAST_TIMEOUT: Duration = Duration::from_secs(5);

/// Opaque pub/sub transport: publish a message to a named topic.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, message: Value) -> Result<()>;
}

/// Issues scoped realtime token requests clients exchange for a
/// connection token at the pub/sub service.
pub trait TokenIssuer: Send + Sync {
    fn create_token_request(
        &self,
        client_id: &str,
        capability: &Capability,
    ) -> Result<TokenRequest>;
}

/// Fire one best-effort broadcast per topic, detached from the caller.
///
/// The mutation this notifies about has already committed, so a lost or
/// failed publish is a staleness problem for connected clients, not a
/// correctness problem for the store. Failures and timeouts are logged
/// and swallowed.
pub fn notify(publisher: Arc<dyn Publisher>, topics: Vec<String>) {
    tokio::spawn(async move {
        for topic in topics {
            let publish = publisher.publish(&topic, Value::Object(Default::default()));
            match tokio::time::timeout(BROADCAST_TIMEOUT, publish).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("broadcast to {} failed: {}", topic, e),
                Err(_) => warn!("broadcast to {} timed out", topic),
            }
        }
    });
}
