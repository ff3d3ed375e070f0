use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{AccountId, Email, Password, Role};

/// Command for logging in with email and password
#[derive(Debug, Clone)]
pub struct LoginAccountCommand {
  pub email: String,
  pub password: String,
}

/// Response after successful login
#[derive(Debug, Clone)]
pub struct LoginAccountResponse {
  pub account_id: AccountId,
  pub email: String,
  pub role: Role,
  pub token: String,
}

/// Use case for logging in
pub struct LoginAccountUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginAccountUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError` if the credentials are rejected
  pub async fn execute(
    &self,
    command: LoginAccountCommand,
  ) -> Result<LoginAccountResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let (account, token) = self.auth_service.login(email, password).await?;

    Ok(LoginAccountResponse {
      account_id: account.id,
      email: account.email.into_inner(),
      role: account.role,
      token: token.into_inner(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::auth::{RegisterAccountCommand, RegisterAccountUseCase};
  use crate::test_support::TestContext;

  #[tokio::test]
  async fn test_login_after_register() {
    let ctx = TestContext::new();
    let registered = RegisterAccountUseCase::new(ctx.auth_service.clone())
      .execute(RegisterAccountCommand {
        email: "a@x.com".to_string(),
        password: "secret1".to_string(),
        phone: "+15550001".to_string(),
      })
      .await
      .unwrap();

    let response = LoginAccountUseCase::new(ctx.auth_service.clone())
      .execute(LoginAccountCommand {
        email: "A@x.com".to_string(),
        password: "secret1".to_string(),
      })
      .await
      .unwrap();

    assert_eq!(response.account_id, registered.account_id);
    assert_eq!(response.role, Role::Buyer);
  }

  #[tokio::test]
  async fn test_login_with_unknown_email() {
    let ctx = TestContext::new();

    let result = LoginAccountUseCase::new(ctx.auth_service.clone())
      .execute(LoginAccountCommand {
        email: "ghost@x.com".to_string(),
        password: "secret1".to_string(),
      })
      .await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials)));
  }
}
