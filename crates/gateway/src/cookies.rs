//! Session cookies: the signed blob cookie and the plain token cookie.

use {
    axum_extra::extract::cookie::{Cookie, CookieJar, SameSite},
    tracing::{debug, warn},
};

use tollgate_sessions::{ClientSessionBlob, now_secs};

use crate::state::GatewayState;

/// What a request carried: its decoded blob and its token cookie.
#[derive(Debug, Clone, Default)]
pub struct ClientSession {
    pub blob: ClientSessionBlob,
    pub token: Option<String>,
}

/// Decode the session cookies of a request. A blob cookie that fails
/// verification reads as an empty blob.
pub fn read_session(state: &GatewayState, jar: &CookieJar) -> ClientSession {
    let blob = jar
        .get(&state.settings.cookie_name)
        .map(|c| match state.codec.decode(c.value(), now_secs() as u64) {
            Ok(blob) => blob,
            Err(e) => {
                debug!(error = %e, "discarding session cookie");
                ClientSessionBlob::default()
            },
        })
        .unwrap_or_default();
    let token = jar
        .get(&state.settings.token_cookie_name)
        .map(|c| c.value().to_string());
    ClientSession { blob, token }
}

/// Re-sign `blob` into the jar, or drop the cookie once the blob is empty.
pub fn write_blob(state: &GatewayState, jar: CookieJar, blob: &ClientSessionBlob) -> CookieJar {
    let name = state.settings.cookie_name.clone();
    if blob.is_empty() {
        return jar.remove(Cookie::build((name, "")).path("/"));
    }
    match state.codec.encode(blob, now_secs() as u64) {
        Ok(value) => {
            let max_age = i64::try_from(state.codec.max_age().as_secs()).unwrap_or(i64::MAX);
            jar.add(
                Cookie::build((name, value))
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .max_age(time::Duration::seconds(max_age)),
            )
        },
        Err(e) => {
            warn!(error = %e, "failed to sign session cookie");
            jar
        },
    }
}

pub fn set_token(state: &GatewayState, jar: CookieJar, token: &str) -> CookieJar {
    jar.add(
        Cookie::build((state.settings.token_cookie_name.clone(), token.to_string()))
            .path("/")
            .same_site(SameSite::Lax),
    )
}

pub fn remove_token(state: &GatewayState, jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((state.settings.token_cookie_name.clone(), "")).path("/"))
}
