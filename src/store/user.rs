use sqlx::query_as;

use crate::{
    db::Db,
    error::{Error, Result},
    model::User,
    password::CredentialStore,
};

const USER_COLUMNS: &str = "id, username, email, hashed_password";

/// The `users` table.
#[derive(Debug, Clone)]
pub struct UserStore {
    db: Db,
    credentials: CredentialStore,
}

impl UserStore {
    pub fn new(db: Db, credentials: CredentialStore) -> Self {
        Self { db, credentials }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    /// Registers a new account, storing only the password digest.
    pub async fn create(&self, username: &str, password: &str) -> Result<User> {
        // an empty subject can never be resolved back from a token
        if username.trim().is_empty() {
            return Err(Error::Validation("username is required".into()));
        }
        if self.find_by_username(username).await?.is_some() {
            return Err(Error::DuplicateUser(username.to_owned()));
        }

        let hashed_password = self.credentials.hash_blocking(password.to_owned()).await?;

        // a concurrent registration can still win the race; the UNIQUE constraint settles it
        let user = query_as::<_, User>(&format!(
            "INSERT INTO users (username, hashed_password) VALUES (?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(hashed_password)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Error::DuplicateUser(username.to_owned())
            }
            other => Error::Database(other),
        })?;

        tracing::info!(user_id = user.id, username, "registered user");
        Ok(user)
    }

    /// `None` for an unknown username and for a wrong password alike.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.find_by_username(username).await? else {
            tracing::debug!(username, "login for unknown user");
            return Ok(None);
        };

        let valid = self
            .credentials
            .verify_blocking(password.to_owned(), user.hashed_password.clone())
            .await?;
        if !valid {
            tracing::debug!(username, "login with wrong password");
            return Ok(None);
        }
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    async fn users() -> UserStore {
        let db = connect_in_memory().await.unwrap();
        UserStore::new(db, CredentialStore::new(4))
    }

    #[tokio::test]
    async fn create_then_find() {
        let users = users().await;
        let alice = users.create("alice", "pw1").await.unwrap();
        assert_eq!(alice.username, "alice");
        assert_ne!(alice.hashed_password, "pw1");
        assert!(alice.email.is_none());

        let found = users.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(users.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let users = users().await;
        users.create("alice", "pw1").await.unwrap();
        let err = users.create("alice", "pw2").await.unwrap_err();
        assert!(matches!(err, Error::DuplicateUser(name) if name == "alice"));
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let users = users().await;
        for name in ["", "  "] {
            let err = users.create(name, "pw1").await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)));
        }
        assert!(users.find_by_username("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn identifiers_are_distinct() {
        let users = users().await;
        let alice = users.create("alice", "pw1").await.unwrap();
        let bob = users.create("bob", "pw1").await.unwrap();
        assert_ne!(alice.id, bob.id);
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let users = users().await;
        let alice = users.create("alice", "pw1").await.unwrap();

        let ok = users.authenticate("alice", "pw1").await.unwrap().unwrap();
        assert_eq!(ok.id, alice.id);
        assert!(users.authenticate("alice", "wrong").await.unwrap().is_none());
        assert!(users.authenticate("nobody", "pw1").await.unwrap().is_none());
    }
}
