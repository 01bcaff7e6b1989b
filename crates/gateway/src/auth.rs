use tollgate_sessions::{ClientSessionBlob, SessionStore};

use crate::directory::{UserDirectory, UserRecord};

// ── Types ────────────────────────────────────────────────────────────────────

/// Admission rules applied on top of directory membership.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthPolicy {
    pub reject_disabled: bool,
}

impl AuthPolicy {
    /// Whether `record` may hold a session.
    pub fn admits(&self, record: &UserRecord) -> bool {
        !(self.reject_disabled && record.disabled)
    }
}

/// An authenticated visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub record: UserRecord,
}

/// Why a request was not admitted. Every variant is handled the same way by
/// the HTTP layer; the distinction only shows up in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotAuthenticated {
    #[error("no session token cookie")]
    MissingToken,
    #[error("token not present in session")]
    UnknownToken,
    #[error("session names an unknown user")]
    UnknownUser,
    #[error("user is disabled")]
    Disabled,
}

impl NotAuthenticated {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingToken => "token_missing",
            Self::UnknownToken => "token_unknown",
            Self::UnknownUser => "user_unknown",
            Self::Disabled => "user_disabled",
        }
    }
}

// ── Guard ────────────────────────────────────────────────────────────────────

/// Resolve `token` against the client's blob and check the resulting
/// username against the directory. Read-only.
pub async fn authenticate(
    store: &SessionStore,
    blob: &ClientSessionBlob,
    token: Option<&str>,
    directory: &dyn UserDirectory,
    policy: AuthPolicy,
) -> Result<Identity, NotAuthenticated> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(NotAuthenticated::MissingToken)?;
    let username = store
        .resolve(blob, token)
        .ok_or(NotAuthenticated::UnknownToken)?;
    let record = directory
        .lookup(username)
        .await
        .ok_or(NotAuthenticated::UnknownUser)?;
    if !policy.admits(&record) {
        return Err(NotAuthenticated::Disabled);
    }
    Ok(Identity {
        username: username.to_string(),
        record,
    })
}

#[cfg(test)]
mod tests {
    use {super::*, crate::directory::StaticUserDirectory};

    fn logged_in(username: &str) -> (ClientSessionBlob, String) {
        let mut blob = ClientSessionBlob::default();
        let token = SessionStore::default().create(&mut blob, username, 0);
        (blob, token.as_str().to_string())
    }

    #[tokio::test]
    async fn valid_pairing_yields_username() {
        let (blob, token) = logged_in("johndoe");
        let dir = StaticUserDirectory::demo();
        let id = authenticate(
            &SessionStore::default(),
            &blob,
            Some(&token),
            &dir,
            AuthPolicy::default(),
        )
        .await
        .unwrap();
        assert_eq!(id.username, "johndoe");
        assert_eq!(id.record.full_name, "John Doe");
    }

    #[tokio::test]
    async fn missing_or_empty_cookie_fails() {
        let (blob, _) = logged_in("johndoe");
        let dir = StaticUserDirectory::demo();
        let store = SessionStore::default();
        for token in [None, Some("")] {
            let err = authenticate(&store, &blob, token, &dir, AuthPolicy::default())
                .await
                .unwrap_err();
            assert_eq!(err, NotAuthenticated::MissingToken);
        }
    }

    #[tokio::test]
    async fn token_absent_from_blob_fails() {
        let (_, token) = logged_in("johndoe");
        let (other_blob, _) = logged_in("johndoe");
        let err = authenticate(
            &SessionStore::default(),
            &other_blob,
            Some(&token),
            &StaticUserDirectory::demo(),
            AuthPolicy::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, NotAuthenticated::UnknownToken);
    }

    #[tokio::test]
    async fn username_fields_alone_are_not_trusted() {
        let mut blob = ClientSessionBlob::default();
        blob.username = Some("johndoe".into());
        blob.start_time = Some(1);
        let err = authenticate(
            &SessionStore::default(),
            &blob,
            Some("johndoe"),
            &StaticUserDirectory::demo(),
            AuthPolicy::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, NotAuthenticated::UnknownToken);
    }

    #[tokio::test]
    async fn user_removed_from_directory_fails() {
        let (blob, token) = logged_in("ghost");
        let err = authenticate(
            &SessionStore::default(),
            &blob,
            Some(&token),
            &StaticUserDirectory::demo(),
            AuthPolicy::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err, NotAuthenticated::UnknownUser);
    }

    #[tokio::test]
    async fn disabled_user_only_rejected_when_configured() {
        let (blob, token) = logged_in("alice");
        let dir = StaticUserDirectory::demo();
        let store = SessionStore::default();

        assert!(
            authenticate(&store, &blob, Some(&token), &dir, AuthPolicy::default())
                .await
                .is_ok()
        );
        let strict = AuthPolicy {
            reject_disabled: true,
        };
        assert_eq!(
            authenticate(&store, &blob, Some(&token), &dir, strict)
                .await
                .unwrap_err(),
            NotAuthenticated::Disabled
        );
    }
}
