//! Wire contract of the realtime channel.
//!
//! Every frame is a JSON text message. The server only ever sends
//! [`EventFrame`]s; clients only ever send [`InboundFrame`]s.

use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: u32 = 1;

/// Event names exchanged over the channel.
pub mod events {
    /// Generic message: server greeting on `/view` access, or a client echo.
    pub const MESSAGE: &str = "message";
    /// A session was logged out; payload is the username.
    pub const LOGOUT: &str = "logout";
    /// A channel connection was established; payload describes its session.
    pub const NEW_USER: &str = "new user";
}

// ── Frames ───────────────────────────────────────────────────────────────────

/// Server → client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    #[serde(rename = "type")]
    pub kind: String,
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub seq: u64,
}

impl EventFrame {
    pub fn new(event: impl Into<String>, payload: serde_json::Value, seq: u64) -> Self {
        Self {
            kind: "event".into(),
            event: event.into(),
            payload,
            seq,
        }
    }

    pub fn to_json(&self) -> Result<String, FrameError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Client → server event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundFrame {
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl InboundFrame {
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid frame: {0}")]
    Json(#[from] serde_json::Error),
}
