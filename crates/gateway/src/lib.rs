//! Gateway: HTTP session lifecycle plus the realtime broadcast channel.
//!
//! Lifecycle:
//! 1. Load config, resolve the session signing key
//! 2. Build the user directory and session store
//! 3. Start HTTP server (`/`, `/login`, `/view`, `/logout`, `/health`)
//! 4. Attach WebSocket upgrade handler (`/ws`)
//!
//! Login and logout mutate the client-carried session blob and publish
//! events through [`broadcast::broadcast`] to every live connection.

pub mod auth;
pub mod broadcast;
pub mod cookies;
pub mod directory;
pub mod routes;
pub mod server;
pub mod state;
pub mod ws;
