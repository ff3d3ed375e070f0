use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::value_objects::AccountId;
use crate::domain::auth::verification::VerificationService;

/// Command carrying a submitted verification code
#[derive(Debug, Clone)]
pub struct VerifyAccountCommand {
  pub account_id: AccountId,
  pub code: u32,
}

/// Use case for confirming a phone number with the code sent to it
pub struct VerifyAccountUseCase {
  verification_service: Arc<VerificationService>,
}

impl VerifyAccountUseCase {
  pub fn new(verification_service: Arc<VerificationService>) -> Self {
    Self {
      verification_service,
    }
  }

  /// # Errors
  /// Returns `AuthError::InvalidCode` or `AuthError::CodeExpired` when the
  /// code is rejected
  pub async fn execute(&self, command: VerifyAccountCommand) -> Result<(), AuthError> {
    self
      .verification_service
      .submit_code(command.account_id, command.code)
      .await
  }
}
