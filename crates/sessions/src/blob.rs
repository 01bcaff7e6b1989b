use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Session state for one browser client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSessionBlob {
    /// session token → username
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tokens: BTreeMap<String, String>,
    /// Epoch seconds of the most recent login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// Username of the most recent login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ClientSessionBlob {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.start_time.is_none() && self.username.is_none()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// JSON view of the blob as delivered to realtime clients.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let blob = ClientSessionBlob::default();
        assert!(blob.is_empty());
        assert_eq!(blob.to_value(), serde_json::json!({}));
    }

    #[test]
    fn value_exposes_username_at_top_level() {
        let mut blob = ClientSessionBlob::default();
        blob.tokens.insert("abc".into(), "johndoe".into());
        blob.start_time = Some(1_700_000_000);
        blob.username = Some("johndoe".into());

        let v = blob.to_value();
        assert_eq!(v["username"], "johndoe");
        assert_eq!(v["start_time"], 1_700_000_000);
        assert_eq!(v["tokens"]["abc"], "johndoe");
    }
}
