//! Client-carried session state.
//!
//! A [`ClientSessionBlob`] never lives on the server: it travels in a signed
//! cookie ([`SessionCodec`]) and is mutated per request through
//! [`SessionStore`]. A login is valid only while its [`SessionToken`] is both
//! the token cookie value and a key of the blob's token map.

pub mod blob;
pub mod codec;
pub mod store;
pub mod token;

use std::time::{SystemTime, UNIX_EPOCH};

pub use {
    blob::ClientSessionBlob,
    codec::{SessionCodec, SessionError},
    store::SessionStore,
    token::{SessionToken, generate_token},
};

/// Current wall-clock time in epoch seconds.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
