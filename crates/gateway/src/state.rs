use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use {
    tokio::sync::{RwLock, mpsc},
    tracing::warn,
};

use {
    tollgate_config::{NewUserPayload, TollgateConfig},
    tollgate_sessions::{SessionCodec, SessionStore},
};

use crate::{
    auth::AuthPolicy,
    directory::{StaticUserDirectory, UserDirectory},
};

// ── Connected client ─────────────────────────────────────────────────────────

/// A realtime connection currently subscribed to broadcasts.
#[derive(Debug)]
pub struct ConnectedClient {
    pub conn_id: String,
    /// Channel for sending serialized frames to this client's write loop.
    pub sender: mpsc::UnboundedSender<String>,
}

impl ConnectedClient {
    /// Send a serialized JSON frame to this client.
    pub fn send(&self, frame: &str) -> bool {
        self.sender.send(frame.to_string()).is_ok()
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// Resolved, request-time view of the config.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub cookie_name: String,
    pub token_cookie_name: String,
    pub display_port: u16,
    pub new_user_payload: NewUserPayload,
    pub auth: AuthPolicy,
}

impl GatewaySettings {
    pub fn from_config(config: &TollgateConfig) -> Self {
        Self {
            cookie_name: config.session.cookie_name.clone(),
            token_cookie_name: config.session.token_cookie_name.clone(),
            display_port: config.server.display_port.unwrap_or(config.server.port),
            new_user_payload: config.realtime.new_user_payload,
            auth: AuthPolicy {
                reject_disabled: config.auth.reject_disabled,
            },
        }
    }
}

// ── Gateway state ────────────────────────────────────────────────────────────

/// Shared gateway runtime state, wrapped in Arc for use across async tasks.
pub struct GatewayState {
    /// All connected realtime clients, keyed by conn_id.
    pub clients: RwLock<HashMap<String, ConnectedClient>>,
    /// Monotonically increasing sequence counter for broadcast events.
    pub seq: AtomicU64,
    /// Server version string.
    pub version: String,
    pub settings: GatewaySettings,
    pub store: SessionStore,
    pub codec: SessionCodec,
    pub directory: Arc<dyn UserDirectory>,
}

impl GatewayState {
    pub fn new(
        settings: GatewaySettings,
        store: SessionStore,
        codec: SessionCodec,
        directory: Arc<dyn UserDirectory>,
    ) -> Arc<Self> {
        Arc::new(Self {
            clients: RwLock::new(HashMap::new()),
            seq: AtomicU64::new(0),
            version: env!("CARGO_PKG_VERSION").to_string(),
            settings,
            store,
            codec,
            directory,
        })
    }

    /// Build state from config with the static user directory.
    pub fn from_config(config: &TollgateConfig) -> Arc<Self> {
        let max_age = Duration::from_secs(config.session.max_age_secs);
        let codec = match config.session.secret_key() {
            Some(secret) => SessionCodec::new(secret, max_age),
            None => {
                warn!("no session secret configured, signing with an ephemeral key");
                SessionCodec::ephemeral(max_age)
            },
        };
        Self::new(
            GatewaySettings::from_config(config),
            SessionStore::new(config.session.token_policy),
            codec,
            Arc::new(StaticUserDirectory::from_config(&config.users)),
        )
    }

    pub fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Register a new client connection.
    pub async fn register_client(&self, client: ConnectedClient) {
        let conn_id = client.conn_id.clone();
        self.clients.write().await.insert(conn_id, client);
    }

    /// Remove a client by conn_id. Returns the removed client if found.
    pub async fn remove_client(&self, conn_id: &str) -> Option<ConnectedClient> {
        self.clients.write().await.remove(conn_id)
    }

    /// Number of connected clients.
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}
