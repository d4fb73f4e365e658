use crate::{
    error::{Error, Result},
    model::User,
    store::UserStore,
    token::TokenService,
};

/// Turns a presented token into the user it was issued to.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    tokens: TokenService,
    users: UserStore,
}

impl SessionResolver {
    pub fn new(tokens: TokenService, users: UserStore) -> Self {
        Self { tokens, users }
    }

    pub async fn resolve(&self, token: &str) -> Result<User> {
        let username = self.tokens.validate(token).map_err(|err| {
            tracing::debug!(error = %err, "rejecting session token");
            Error::Unauthenticated
        })?;

        match self.users.find_by_username(&username).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!(username, "valid token for a user that no longer exists");
                Err(Error::Unauthenticated)
            }
        }
    }
}
