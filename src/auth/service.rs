//! User service: profile lookup and credential login.
//!
//! Both operations are linear pipelines. Each step returns early with a
//! [`UserError`]; the public methods fold the outcome into a [`ServiceResult`]
//! so nothing escapes the operation boundary.

use std::sync::Arc;

use crate::auth::errors::{ServiceResult, UserError};
use crate::auth::jwt::JwtService;
use crate::auth::models::{AuthUser, Correlation, LoginRequest, TokenResponse, UserResponse};
use crate::auth::password::PasswordVerifier;
use crate::database::{UserRecord, UserRepository};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    verifier: Arc<dyn PasswordVerifier>,
    jwt_service: Arc<JwtService>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        verifier: Arc<dyn PasswordVerifier>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            repository,
            verifier,
            jwt_service,
        }
    }

    /// Return the profile behind `email`, provided it belongs to `auth_user`.
    pub async fn find_by_email(
        &self,
        email: Option<&str>,
        auth_user: Option<&AuthUser>,
    ) -> ServiceResult<UserResponse> {
        self.try_find_by_email(email, auth_user).await.into()
    }

    async fn try_find_by_email(
        &self,
        email: Option<&str>,
        auth_user: Option<&AuthUser>,
    ) -> Result<UserResponse, UserError> {
        let email = informed(email).ok_or(UserError::MissingEmail)?;
        let user = self.find_user(email).await?;
        match auth_user {
            Some(auth_user) if auth_user.id == user.id => Ok(UserResponse {
                user: user.auth_user(),
            }),
            _ => Err(UserError::Forbidden),
        }
    }

    /// Verify credentials and issue an access token for the user.
    pub async fn get_access_token(
        &self,
        request: LoginRequest,
        correlation: &Correlation,
    ) -> ServiceResult<TokenResponse> {
        tracing::info!(
            transaction_id = correlation.transaction_id.as_deref(),
            service_id = correlation.service_id.as_deref(),
            email = request.email.as_deref(),
            "Request to POST login"
        );

        let result: ServiceResult<TokenResponse> = self.try_get_access_token(request).await.into();

        tracing::info!(
            transaction_id = correlation.transaction_id.as_deref(),
            service_id = correlation.service_id.as_deref(),
            status = result.status().as_u16(),
            "Response to POST login"
        );
        result
    }

    async fn try_get_access_token(&self, request: LoginRequest) -> Result<TokenResponse, UserError> {
        let (Some(email), Some(password)) = (
            informed(request.email.as_deref()),
            informed(request.password.as_deref()),
        ) else {
            return Err(UserError::MissingCredentials);
        };

        let user = self.find_user(email).await?;
        if !self.verifier.verify(password, &user.password_hash).await? {
            return Err(UserError::CredentialMismatch);
        }

        let access_token = self.jwt_service.create_token(user.auth_user())?;
        Ok(TokenResponse { access_token })
    }

    async fn find_user(&self, email: &str) -> Result<UserRecord, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFound)
    }
}

/// Treat absent and empty values alike. Whitespace is a legitimate value.
fn informed(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
