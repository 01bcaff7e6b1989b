use std::collections::{BTreeMap, HashMap};

use {async_trait::async_trait, tollgate_config::UserEntry};

/// A user as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub disabled: bool,
}

/// Source of truth for which usernames exist.
///
/// Credential checks belong to implementations of this trait; the gateway
/// only asks whether a username is known.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn lookup(&self, username: &str) -> Option<UserRecord>;
}

/// Fixed in-memory directory, loaded from the `[users]` config table.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserRecord>,
}

impl StaticUserDirectory {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|u| (u.username.clone(), u))
                .collect(),
        }
    }

    /// Build from config; an empty table falls back to the demo users.
    pub fn from_config(users: &BTreeMap<String, UserEntry>) -> Self {
        if users.is_empty() {
            return Self::demo();
        }
        Self::new(users.iter().map(|(name, entry)| UserRecord {
            username: name.clone(),
            full_name: entry.full_name.clone(),
            email: entry.email.clone(),
            disabled: entry.disabled,
        }))
    }

    pub fn demo() -> Self {
        Self::new([
            UserRecord {
                username: "johndoe".into(),
                full_name: "John Doe".into(),
                email: "johndoe@example.com".into(),
                disabled: false,
            },
            UserRecord {
                username: "alice".into(),
                full_name: "Alice Wonderson".into(),
                email: "alice@example.com".into(),
                disabled: true,
            },
        ])
    }
}

#[async_trait]
impl UserDirectory for StaticUserDirectory {
    async fn lookup(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_directory_knows_johndoe_and_alice() {
        let dir = StaticUserDirectory::demo();
        assert!(!dir.lookup("johndoe").await.unwrap().disabled);
        assert!(dir.lookup("alice").await.unwrap().disabled);
        assert!(dir.lookup("unknownuser").await.is_none());
    }

    #[tokio::test]
    async fn config_table_replaces_demo_users() {
        let mut users = BTreeMap::new();
        users.insert("bob".to_string(), UserEntry {
            full_name: "Bob".into(),
            email: "bob@example.com".into(),
            disabled: false,
        });
        let dir = StaticUserDirectory::from_config(&users);

        assert_eq!(dir.lookup("bob").await.unwrap().email, "bob@example.com");
        assert!(dir.lookup("johndoe").await.is_none());
        assert!(dir.lookup("alice").await.is_none());
    }
}
