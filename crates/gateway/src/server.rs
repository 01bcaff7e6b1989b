use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        extract::{ConnectInfo, State, WebSocketUpgrade},
        response::{IntoResponse, Json},
        routing::{get, post},
    },
    axum_extra::extract::cookie::CookieJar,
    tower_http::trace::TraceLayer,
    tracing::info,
};

use {tollgate_config::TollgateConfig, tollgate_protocol::PROTOCOL_VERSION};

use crate::{
    cookies::read_session,
    routes::{index_handler, login_handler, logout_handler, view_handler},
    state::GatewayState,
    ws::handle_connection,
};

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the gateway router (shared between production startup and tests).
pub fn build_gateway_app(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/login", post(login_handler))
        .route("/view", get(view_handler))
        .route("/logout", get(logout_handler))
        .route("/health", get(health_handler))
        .route("/ws", get(ws_upgrade_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP + WebSocket server.
pub async fn start_gateway(config: TollgateConfig) -> anyhow::Result<()> {
    let state = GatewayState::from_config(&config);
    let app = build_gateway_app(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Startup banner.
    let lines = [
        format!("tollgate gateway v{}", state.version),
        format!("protocol v{PROTOCOL_VERSION}, listening on {addr}"),
        format!(
            "token policy: {:?}, new user payload: {:?}",
            state.store.policy(),
            state.settings.new_user_payload
        ),
        format!(
            "session key: {}",
            if config.session.secret_key().is_some() {
                "configured"
            } else {
                "ephemeral"
            }
        ),
    ];
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0) + 4;
    info!("┌{}┐", "─".repeat(width));
    for line in &lines {
        info!("│  {:<w$}│", line, w = width - 2);
    }
    info!("└{}┘", "─".repeat(width));

    // Run the server with ConnectInfo for remote IP extraction.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    let count = state.client_count().await;
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
        "protocol": PROTOCOL_VERSION,
        "connections": count,
    }))
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
) -> impl IntoResponse {
    let blob = read_session(&state, &jar).blob;
    ws.on_upgrade(move |socket| handle_connection(socket, state, blob, addr))
}
