//! Password hashing and verification with Argon2.

use anyhow::{Context, Result, anyhow};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString};
use argon2::{Argon2, Params};
use async_trait::async_trait;

/// One-way comparison of a plaintext password against a stored hash.
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// `Ok(false)` on mismatch; `Err` only when the hash itself is unusable.
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool>;
}

/// Argon2 verifier. Hashing and verification run on tokio's blocking pool.
#[derive(Clone, Default)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom cost parameters for newly created hashes.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }

    /// Hash a password into a PHC string with a fresh random salt.
    pub async fn hash(&self, password: &str) -> Result<String> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| anyhow!("Failed to hash password: {e}"))
        })
        .await
        .context("Password hashing task failed")?
    }
}

#[async_trait]
impl PasswordVerifier for Argon2Verifier {
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow!("Stored password hash is invalid: {e}"))?;
            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(argon2::password_hash::Error::Password) => Ok(false),
                Err(e) => Err(anyhow!("Failed to verify password: {e}")),
            }
        })
        .await
        .context("Password verification task failed")?
    }
}

/// Cheap parameters so tests don't spend seconds in key derivation.
#[cfg(test)]
pub fn test_verifier() -> Argon2Verifier {
    Argon2Verifier::with_params(Params::new(8, 1, 1, None).expect("valid argon2 params"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let verifier = test_verifier();
        let hash = verifier.hash("123456").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verifier.verify("123456", &hash).await.unwrap());
        assert!(!verifier.verify("654321", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hashes_are_salted() {
        let verifier = test_verifier();
        let first = verifier.hash("123456").await.unwrap();
        let second = verifier.hash("123456").await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_hash_is_an_error() {
        let verifier = test_verifier();
        assert!(verifier.verify("123456", "not-a-phc-string").await.is_err());
    }

    #[tokio::test]
    async fn test_default_verifier_accepts_cheap_hashes() {
        // Parameters come from the stored hash, not the verifier instance.
        let hash = test_verifier().hash("pw").await.unwrap();
        assert!(Argon2Verifier::new().verify("pw", &hash).await.unwrap());
    }
}
