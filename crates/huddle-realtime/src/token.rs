use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::TokenIssuer;
use crate::capability::Capability;

type HmacSha256 = Hmac<Sha256>;

/// A signed token request: the client forwards this to the pub/sub service,
/// which checks the MAC against the shared key and answers with a
/// connection token scoped to `capability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(rename = "keyName")]
    pub key_name: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub capability: Capability,
    pub timestamp: i64,
    pub nonce: String,
    pub mac: String,
}

/// Realtime API key in `name:secret` form. The name travels in the token
/// request, the secret only ever signs.
pub struct RealtimeKey {
    name: String,
    secret: String,
}

impl RealtimeKey {
    pub fn from_key(key: &str) -> Result<Self> {
        let Some((name, secret)) = key.split_once(':') else {
            bail!("realtime key must be in name:secret form");
        };
        if name.is_empty() || secret.is_empty() {
            bail!("realtime key must be in name:secret form");
        }

        Ok(Self {
            name: name.to_string(),
            secret: secret.to_string(),
        })
    }

    fn sign(&self, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .context("realtime key rejected by hmac")?;
        mac.update(payload.as_bytes());
        Ok(B64.encode(mac.finalize().into_bytes()))
    }
}

fn canonical_payload(
    key_name: &str,
    client_id: &str,
    timestamp: i64,
    nonce: &str,
    capability_json: &str,
) -> String {
    format!(
        "{}\n{}\n{}\n{}\n{}",
        key_name, client_id, timestamp, nonce, capability_json
    )
}

impl TokenIssuer for RealtimeKey {
    fn create_token_request(
        &self,
        client_id: &str,
        capability: &Capability,
    ) -> Result<TokenRequest> {
        let timestamp = Utc::now().timestamp_millis();
        let nonce = format!("{:032x}", rand::random::<u128>());

        // BTreeMap keys are ordered, so the capability JSON is canonical.
        let capability_json = serde_json::to_string(capability)?;
        let payload = canonical_payload(&self.name, client_id, timestamp, &nonce, &capability_json);

        Ok(TokenRequest {
            key_name: self.name.clone(),
            client_id: client_id.to_string(),
            capability: capability.clone(),
            timestamp,
            nonce,
            mac: self.sign(&payload)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Op;

    #[test]
    fn rejects_malformed_keys() {
        assert!(RealtimeKey::from_key("no-separator").is_err());
        assert!(RealtimeKey::from_key(":secret-only").is_err());
        assert!(RealtimeKey::from_key("name:").is_err());
    }

    #[test]
    fn mac_covers_the_request_fields() {
        let key = RealtimeKey::from_key("app.key:s3cret").unwrap();
        let mut capability = Capability::new();
        capability.insert("user:*".into(), vec![Op::Subscribe]);

        let req = key.create_token_request("user", &capability).unwrap();

        let capability_json = serde_json::to_string(&capability).unwrap();
        let payload = canonical_payload(
            &req.key_name,
            &req.client_id,
            req.timestamp,
            &req.nonce,
            &capability_json,
        );
        assert_eq!(req.mac, key.sign(&payload).unwrap());
        assert_eq!(req.key_name, "app.key");
    }

    #[test]
    fn nonces_are_unique_per_request() {
        let key = RealtimeKey::from_key("app.key:s3cret").unwrap();
        let capability = Capability::new();

        let a = key.create_token_request("user", &capability).unwrap();
        let b = key.create_token_request("user", &capability).unwrap();
        assert_ne!(a.nonce, b.nonce);
    }
}
