use {tollgate_config::TokenPolicy, tracing::debug};

use crate::{
    blob::ClientSessionBlob,
    token::{SessionToken, generate_token},
};

/// Operations over a single client's [`ClientSessionBlob`].
///
/// The store holds no blobs itself; every call works on the blob that came
/// in with the current request, so one client can never touch another's.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStore {
    policy: TokenPolicy,
}

impl SessionStore {
    pub fn new(policy: TokenPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TokenPolicy {
        self.policy
    }

    /// Record a login for `username` at `now` and return its fresh token.
    pub fn create(&self, blob: &mut ClientSessionBlob, username: &str, now: i64) -> SessionToken {
        if self.policy == TokenPolicy::Replace && !blob.tokens.is_empty() {
            debug!(
                revoked = blob.tokens.len(),
                "replacing earlier session tokens"
            );
            blob.tokens.clear();
        }
        let token = generate_token();
        blob.tokens
            .insert(token.as_str().to_string(), username.to_string());
        blob.start_time = Some(now);
        blob.username = Some(username.to_string());
        token
    }

    /// Username bound to `token` in `blob`, if any.
    pub fn resolve<'a>(&self, blob: &'a ClientSessionBlob, token: &str) -> Option<&'a str> {
        blob.tokens.get(token).map(String::as_str)
    }

    /// Drop every entry, invalidating all tokens the client holds.
    pub fn clear(&self, blob: &mut ClientSessionBlob) {
        *blob = ClientSessionBlob::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_resolve() {
        let store = SessionStore::default();
        let mut blob = ClientSessionBlob::default();
        let token = store.create(&mut blob, "johndoe", 42);

        assert_eq!(store.resolve(&blob, token.as_str()), Some("johndoe"));
        assert_eq!(blob.start_time, Some(42));
        assert_eq!(blob.username.as_deref(), Some("johndoe"));
        assert_eq!(store.resolve(&blob, "not-a-token"), None);
    }

    #[test]
    fn accumulate_keeps_earlier_tokens() {
        let store = SessionStore::new(TokenPolicy::Accumulate);
        let mut blob = ClientSessionBlob::default();
        let first = store.create(&mut blob, "johndoe", 1);
        let second = store.create(&mut blob, "alice", 2);

        assert_eq!(blob.token_count(), 2);
        assert_eq!(store.resolve(&blob, first.as_str()), Some("johndoe"));
        assert_eq!(store.resolve(&blob, second.as_str()), Some("alice"));
        assert_eq!(blob.start_time, Some(2));
        assert_eq!(blob.username.as_deref(), Some("alice"));
    }

    #[test]
    fn replace_revokes_earlier_tokens() {
        let store = SessionStore::new(TokenPolicy::Replace);
        let mut blob = ClientSessionBlob::default();
        let first = store.create(&mut blob, "johndoe", 1);
        let second = store.create(&mut blob, "johndoe", 2);

        assert_eq!(blob.token_count(), 1);
        assert_eq!(store.resolve(&blob, first.as_str()), None);
        assert_eq!(store.resolve(&blob, second.as_str()), Some("johndoe"));
    }

    #[test]
    fn clear_invalidates_everything() {
        let store = SessionStore::default();
        let mut blob = ClientSessionBlob::default();
        let a = store.create(&mut blob, "johndoe", 1);
        let b = store.create(&mut blob, "johndoe", 2);
        store.clear(&mut blob);

        assert!(blob.is_empty());
        assert_eq!(store.resolve(&blob, a.as_str()), None);
        assert_eq!(store.resolve(&blob, b.as_str()), None);
    }
}
