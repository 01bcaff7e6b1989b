//! Session lifecycle endpoints: front door, login, protected view, logout.
//!
//! Every authentication failure ends in the same `303 See Other` to `/`.

use std::sync::Arc;

use {
    askama::Template,
    axum::{
        Form,
        extract::State,
        http::StatusCode,
        response::{Html, IntoResponse, Redirect, Response},
    },
    axum_extra::extract::cookie::CookieJar,
    serde::Deserialize,
    tracing::{debug, info, warn},
};

use {tollgate_protocol::events, tollgate_sessions::now_secs};

use crate::{
    auth::{Identity, NotAuthenticated, authenticate},
    broadcast::{BroadcastOpts, broadcast},
    cookies::{ClientSession, read_session, remove_token, set_token, write_blob},
    state::GatewayState,
};

pub const FRONT_DOOR: &str = "/";
pub const PROTECTED_VIEW: &str = "/view";

/// Greeting published to every connection on each protected view load.
pub const VIEW_GREETING: &str = "hello universe";

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate;

#[derive(Template)]
#[template(path = "view.html")]
struct ViewTemplate<'a> {
    username: &'a str,
    start_time: i64,
    port: u16,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn render(template: &impl Template) -> Response {
    match template.render() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            warn!(error = %e, "template render failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
    }
}

/// Run the auth guard for the current request.
async fn guard(
    state: &GatewayState,
    session: &ClientSession,
) -> Result<Identity, NotAuthenticated> {
    authenticate(
        &state.store,
        &session.blob,
        session.token.as_deref(),
        state.directory.as_ref(),
        state.settings.auth,
    )
    .await
    .inspect_err(|e| debug!(reason = e.reason(), "not authenticated"))
}

pub async fn index_handler(State(state): State<Arc<GatewayState>>, jar: CookieJar) -> Response {
    // A blob alone is not a session; only what the guard accepts leaves here.
    let session = read_session(&state, &jar);
    if guard(&state, &session).await.is_ok() {
        return Redirect::to(PROTECTED_VIEW).into_response();
    }
    render(&IndexTemplate)
}

pub async fn login_handler(
    State(state): State<Arc<GatewayState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    // Password verification belongs to the user directory; only membership
    // is checked here.
    let LoginForm { username, password: _ } = form;

    let admitted = state
        .directory
        .lookup(&username)
        .await
        .is_some_and(|record| state.settings.auth.admits(&record));
    if !admitted {
        debug!(%username, "login refused");
        return Redirect::to(FRONT_DOOR).into_response();
    }

    let ClientSession { mut blob, .. } = read_session(&state, &jar);
    let token = state.store.create(&mut blob, &username, now_secs());
    info!(%username, tokens = blob.token_count(), "login");

    let jar = write_blob(&state, jar, &blob);
    let jar = set_token(&state, jar, token.as_str());
    (jar, Redirect::to(PROTECTED_VIEW)).into_response()
}

pub async fn view_handler(State(state): State<Arc<GatewayState>>, jar: CookieJar) -> Response {
    let session = read_session(&state, &jar);
    let identity = match guard(&state, &session).await {
        Ok(identity) => identity,
        Err(_) => return Redirect::to(FRONT_DOOR).into_response(),
    };

    broadcast(
        &state,
        events::MESSAGE,
        serde_json::json!(VIEW_GREETING),
        BroadcastOpts::default(),
    )
    .await;

    let page = render(&ViewTemplate {
        username: &identity.username,
        start_time: session.blob.start_time.unwrap_or_else(now_secs),
        port: state.settings.display_port,
    });
    // Sliding expiry: re-sign on every view.
    (write_blob(&state, jar, &session.blob), page).into_response()
}

pub async fn logout_handler(State(state): State<Arc<GatewayState>>, jar: CookieJar) -> Response {
    let session = read_session(&state, &jar);
    let identity = match guard(&state, &session).await {
        Ok(identity) => identity,
        Err(_) => return Redirect::to(FRONT_DOOR).into_response(),
    };

    let mut blob = session.blob;
    state.store.clear(&mut blob);
    let jar = write_blob(&state, jar, &blob);
    let jar = remove_token(&state, jar);
    info!(username = %identity.username, "logout");

    broadcast(
        &state,
        events::LOGOUT,
        serde_json::json!(identity.username),
        BroadcastOpts::default(),
    )
    .await;

    (jar, Redirect::to(FRONT_DOOR)).into_response()
}
