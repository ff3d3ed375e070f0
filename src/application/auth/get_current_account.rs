use std::sync::Arc;

use crate::domain::auth::entities::AuthenticatedAccount;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Use case for resolving the caller from an `Authorization` header
///
/// Only the token is consulted; storage is not touched.
pub struct GetCurrentAccountUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentAccountUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns a validation error for a malformed header and
  /// `AuthError::InvalidToken`, `UnexpectedAlgorithm` or `TokenExpired` for a
  /// rejected token
  pub fn execute(&self, authorization: &str) -> Result<AuthenticatedAccount, AuthError> {
    self.auth_service.authenticate(authorization)
  }
}
