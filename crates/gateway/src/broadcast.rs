use {
    serde_json::Value,
    tracing::{debug, warn},
};

use tollgate_protocol::EventFrame;

use crate::state::GatewayState;

/// Delivery options for [`broadcast`].
#[derive(Debug, Clone, Default)]
pub struct BroadcastOpts {
    /// Deliver to this connection only instead of every subscriber.
    pub only_conn: Option<String>,
}

impl BroadcastOpts {
    pub fn to_conn(conn_id: impl Into<String>) -> Self {
        Self {
            only_conn: Some(conn_id.into()),
        }
    }
}

/// Publish `event` to the current subscriber snapshot.
///
/// Best effort: a subscriber whose write loop is gone simply misses the
/// frame. Returns the number of subscribers the frame was handed to.
pub async fn broadcast(
    state: &GatewayState,
    event: &str,
    payload: Value,
    opts: BroadcastOpts,
) -> usize {
    let seq = state.next_seq();
    let frame = match EventFrame::new(event, payload, seq).to_json() {
        Ok(frame) => frame,
        Err(e) => {
            warn!(event, error = %e, "failed to serialize broadcast");
            return 0;
        },
    };

    let clients = state.clients.read().await;
    let mut delivered = 0;
    for client in clients.values() {
        if let Some(only) = opts.only_conn.as_deref()
            && client.conn_id != only
        {
            continue;
        }
        if client.send(&frame) {
            delivered += 1;
        } else {
            debug!(conn_id = %client.conn_id, event, "dropped frame for closing client");
        }
    }
    debug!(event, seq, delivered, "broadcast");
    delivered
}
