use std::sync::Arc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::value_objects::AccountId;
use crate::domain::auth::verification::VerificationService;

/// Use case for texting a fresh verification code to the caller's phone
pub struct RequestVerificationCodeUseCase {
  verification_service: Arc<VerificationService>,
}

impl RequestVerificationCodeUseCase {
  pub fn new(verification_service: Arc<VerificationService>) -> Self {
    Self {
      verification_service,
    }
  }

  /// # Errors
  /// Returns `AuthError::AlreadyVerified` for verified accounts and
  /// `AuthError::SmsDeliveryFailed` if the message could not be sent
  pub async fn execute(&self, account_id: AccountId) -> Result<(), AuthError> {
    self.verification_service.request_code(account_id).await
  }
}
