//! Credential store abstraction used by the user service.

use anyhow::Result;
use async_trait::async_trait;

use crate::database::connection::DatabaseConnection;
use crate::database::models::UserRecord;

/// Read-only lookup of stored users by their unique email.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Cheap liveness check against the backing store.
    async fn health_check(&self) -> Result<()>;
}

#[async_trait]
impl UserRepository for DatabaseConnection {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        self.get_user_by_email(email).await
    }

    async fn health_check(&self) -> Result<()> {
        DatabaseConnection::health_check(self).await
    }
}

#[cfg(test)]
pub use memory::{InMemoryUserRepository, UnavailableUserRepository};
