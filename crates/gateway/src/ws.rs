use std::{net::SocketAddr, sync::Arc};

use {
    axum::extract::ws::{Message, WebSocket},
    futures::{SinkExt, StreamExt},
    serde_json::Value,
    tokio::sync::mpsc,
    tracing::{debug, info, warn},
};

use {
    tollgate_config::NewUserPayload,
    tollgate_protocol::{InboundFrame, events},
    tollgate_sessions::ClientSessionBlob,
};

use crate::{
    broadcast::{BroadcastOpts, broadcast},
    state::{ConnectedClient, GatewayState},
};

/// Payload of the `new user` event for a connection carrying `blob`.
pub fn new_user_payload(mode: NewUserPayload, blob: &ClientSessionBlob) -> Value {
    match mode {
        NewUserPayload::Blob => blob.to_value(),
        NewUserPayload::Identity => serde_json::json!({ "username": blob.username }),
    }
}

/// Drive one realtime connection until the peer goes away.
///
/// The connection is registered before the `new user` broadcast, so it
/// receives its own announcement.
pub async fn handle_connection(
    socket: WebSocket,
    state: Arc<GatewayState>,
    blob: ClientSessionBlob,
    remote_addr: SocketAddr,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (client_tx, mut client_rx) = mpsc::unbounded_channel::<String>();
    let write_conn_id = conn_id.clone();
    let write_handle = tokio::spawn(async move {
        while let Some(frame) = client_rx.recv().await {
            if let Err(e) = ws_tx.send(Message::Text(frame.into())).await {
                debug!(conn_id = %write_conn_id, error = %e, "ws: write failed");
                break;
            }
        }
    });

    state
        .register_client(ConnectedClient {
            conn_id: conn_id.clone(),
            sender: client_tx,
        })
        .await;
    info!(
        conn_id = %conn_id,
        remote_ip = %remote_addr.ip(),
        username = blob.username.as_deref().unwrap_or("-"),
        "ws: connected"
    );

    broadcast(
        &state,
        events::NEW_USER,
        new_user_payload(state.settings.new_user_payload, &blob),
        BroadcastOpts::default(),
    )
    .await;

    while let Some(msg) = ws_rx.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                debug!(conn_id = %conn_id, error = %e, "ws: read error");
                break;
            },
        };
        match msg {
            Message::Text(text) => handle_frame(&state, &conn_id, text.as_str()).await,
            Message::Close(_) => break,
            _ => {},
        }
    }

    state.remove_client(&conn_id).await;
    write_handle.abort();
    info!(conn_id = %conn_id, "ws: disconnected");
}

async fn handle_frame(state: &GatewayState, conn_id: &str, text: &str) {
    let frame = match InboundFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(conn_id, error = %e, "ws: ignoring malformed frame");
            return;
        },
    };
    match frame.event.as_str() {
        events::MESSAGE => {
            broadcast(
                state,
                events::MESSAGE,
                frame.payload,
                BroadcastOpts::to_conn(conn_id),
            )
            .await;
        },
        other => debug!(conn_id, event = other, "ws: ignoring unknown event"),
    }
}
