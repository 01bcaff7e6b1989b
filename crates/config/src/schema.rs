//! Config schema types (server, session, auth, realtime, users).

use std::collections::BTreeMap;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize, Serializer},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TollgateConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
    pub realtime: RealtimeConfig,
    /// Static user directory keyed by username.
    pub users: BTreeMap<String, UserEntry>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Port shown in the rendered view. Informational only, never bound.
    pub display_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8000,
            display_port: None,
        }
    }
}

/// Whether a new login keeps or revokes earlier tokens held by the same client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPolicy {
    /// Earlier tokens stay valid until logout clears the whole blob.
    #[default]
    Accumulate,
    /// Only the most recent login's token is valid.
    Replace,
}

/// Client session cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key used to sign the session cookie. A random per-process key is used
    /// when unset.
    #[serde(
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub secret_key: Option<Secret<String>>,
    pub max_age_secs: u64,
    pub token_policy: TokenPolicy,
    /// Cookie carrying the signed session blob.
    pub cookie_name: String,
    /// Cookie carrying the session token.
    pub token_cookie_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            max_age_secs: 14 * 24 * 60 * 60,
            token_policy: TokenPolicy::default(),
            cookie_name: "session".into(),
            token_cookie_name: "session_id".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Refuse login and guard access for users flagged `disabled`.
    pub reject_disabled: bool,
}

/// What the `new user` event carries to every connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewUserPayload {
    /// The full session blob of the connecting client.
    #[default]
    Blob,
    /// Only `{ "username": ... }`.
    Identity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    pub new_user_payload: NewUserPayload,
}

/// A user directory entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserEntry {
    pub full_name: String,
    pub email: String,
    pub disabled: bool,
}

impl SessionConfig {
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key
            .as_ref()
            .map(|s| s.expose_secret().as_str())
            .filter(|s| !s.is_empty())
    }
}

pub fn serialize_option_secret<S: Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive() {
        let cfg = TollgateConfig::default();
        assert_eq!(cfg.session.token_policy, TokenPolicy::Accumulate);
        assert_eq!(cfg.realtime.new_user_payload, NewUserPayload::Blob);
        assert!(!cfg.auth.reject_disabled);
        assert_eq!(cfg.session.token_cookie_name, "session_id");
        assert!(cfg.session.secret_key().is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let cfg: TollgateConfig = toml::from_str(
            r#"
            [session]
            secret_key = "s3cret"
            token_policy = "replace"

            [realtime]
            new_user_payload = "identity"

            [users.bob]
            full_name = "Bob"
            disabled = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.session.secret_key(), Some("s3cret"));
        assert_eq!(cfg.session.token_policy, TokenPolicy::Replace);
        assert_eq!(cfg.session.cookie_name, "session");
        assert_eq!(cfg.realtime.new_user_payload, NewUserPayload::Identity);
        assert!(cfg.users["bob"].disabled);
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn empty_secret_counts_as_unset() {
        let cfg: TollgateConfig = toml::from_str("[session]\nsecret_key = \"\"\n").unwrap();
        assert!(cfg.session.secret_key().is_none());
    }

    #[test]
    fn secret_survives_serialization() {
        let mut cfg = TollgateConfig::default();
        cfg.session.secret_key = Some(Secret::new("abc".to_string()));
        let raw = toml::to_string_pretty(&cfg).unwrap();
        let back: TollgateConfig = toml::from_str(&raw).unwrap();
        assert_eq!(back.session.secret_key(), Some("abc"));
    }
}
