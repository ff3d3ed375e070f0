use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{AccountId, Email, Password, PhoneNumber, Role};

/// Command for registering a new account
#[derive(Debug, Clone)]
pub struct RegisterAccountCommand {
  pub email: String,
  /// Plain text, hashed before storage
  pub password: String,
  /// Destination for verification codes
  pub phone: String,
}

/// Response after successful registration
#[derive(Debug, Clone)]
pub struct RegisterAccountResponse {
  pub account_id: AccountId,
  pub email: String,
  pub role: Role,
  /// Session token for immediate use
  pub token: String,
}

/// Use case for registering a new buyer account
pub struct RegisterAccountUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterAccountUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError` if an input is malformed or the email is taken
  pub async fn execute(
    &self,
    command: RegisterAccountCommand,
  ) -> Result<RegisterAccountResponse, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;
    let phone = PhoneNumber::new(command.phone)?;

    let (account, token) = self.auth_service.sign_up(email, password, phone).await?;

    Ok(RegisterAccountResponse {
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
  use crate::domain::auth::errors::ValidationError;
  use crate::test_support::TestContext;

  fn command(password: &str) -> RegisterAccountCommand {
    RegisterAccountCommand {
      email: " New@Example.com ".to_string(),
      password: password.to_string(),
      phone: "+15550001".to_string(),
    }
  }

  #[tokio::test]
  async fn test_register_normalizes_email() {
    let ctx = TestContext::new();
    let use_case = RegisterAccountUseCase::new(ctx.auth_service.clone());

    let response = use_case.execute(command("secret1")).await.unwrap();

    assert_eq!(response.email, "new@example.com");
    assert_eq!(response.role, Role::Buyer);
    assert!(!response.token.is_empty());
  }

  #[tokio::test]
  async fn test_register_rejects_short_password() {
    let ctx = TestContext::new();
    let use_case = RegisterAccountUseCase::new(ctx.auth_service.clone());

    let result = use_case.execute(command("12345")).await;

    assert!(matches!(
      result,
      Err(AuthError::Validation(ValidationError::PasswordTooShort { min: 6 }))
    ));
  }

  #[tokio::test]
  async fn test_register_accepts_six_character_password() {
    let ctx = TestContext::new();
    let use_case = RegisterAccountUseCase::new(ctx.auth_service.clone());

    assert!(use_case.execute(command("123456")).await.is_ok());
  }

  #[tokio::test]
  async fn test_register_rejects_bad_phone() {
    let ctx = TestContext::new();
    let use_case = RegisterAccountUseCase::new(ctx.auth_service.clone());

    let result = use_case
      .execute(RegisterAccountCommand {
        phone: "call me".to_string(),
        ..command("secret1")
      })
      .await;

    assert!(matches!(
      result,
      Err(AuthError::Validation(ValidationError::InvalidPhoneNumber))
    ));
  }
}
