//! Password hashing with bcrypt.

use crate::error::Result;

/// Hashes and verifies passwords at a fixed bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct CredentialStore {
    cost: u32,
}

impl CredentialStore {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Salted digest of `plaintext`. A fresh salt is drawn on every call.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }

    /// `false` on mismatch and on a digest that cannot be parsed.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match bcrypt::verify(plaintext, digest) {
            Ok(valid) => valid,
            Err(err) => {
                tracing::debug!(error = %err, "stored password digest is malformed");
                false
            }
        }
    }

    pub async fn hash_blocking(&self, plaintext: String) -> Result<String> {
        let store = *self;
        tokio::task::spawn_blocking(move || store.hash(&plaintext)).await?
    }

    pub async fn verify_blocking(&self, plaintext: String, digest: String) -> Result<bool> {
        let store = *self;
        Ok(tokio::task::spawn_blocking(move || store.verify(&plaintext, &digest)).await?)
    }
}
