use chrono::{Duration, Utc};
use std::sync::Arc;

use super::entities::{Account, AccountChanges, CodeMismatch};
use super::errors::{AuthError, RepositoryError};
use super::ports::{AccountRepository, SmsSender, TokenService};
use super::value_objects::{AccountId, VerificationCode};

/// How long a requested code stays valid
const CODE_TTL_MINUTES: i64 = 30;

/// Phone verification with time-boxed one-time codes
pub struct VerificationService {
  account_repo: Arc<dyn AccountRepository>,
  token_service: Arc<dyn TokenService>,
  sms_sender: Arc<dyn SmsSender>,
}

impl VerificationService {
  pub fn new(
    account_repo: Arc<dyn AccountRepository>,
    token_service: Arc<dyn TokenService>,
    sms_sender: Arc<dyn SmsSender>,
  ) -> Self {
    Self {
      account_repo,
      token_service,
      sms_sender,
    }
  }

  /// Issues a fresh code, stores it with a 30 minute expiry and texts it to the account
  ///
  /// The code is persisted before dispatch, so a delivery failure leaves a
  /// valid but undelivered code behind. A newer request replaces it.
  ///
  /// # Errors
  /// - `AuthError::AlreadyVerified` if the account is verified
  /// - `AuthError::CodeGenerationFailed` if no code could be drawn
  /// - `AuthError::SmsDeliveryFailed` if the carrier rejected the message
  pub async fn request_code(&self, account_id: AccountId) -> Result<(), AuthError> {
    let account = self.load(account_id).await?;

    if account.verified {
      return Err(AuthError::AlreadyVerified);
    }

    let code = self.token_service.generate_verification_code()?;
    let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

    let account = self
      .account_repo
      .update(account.id, AccountChanges::pending_code(code, expires_at))
      .await
      .map_err(not_found_as_account)?;

    let message = format!("Verification code: {}", code);
    if let Err(e) = self.sms_sender.send(&account.phone, &message).await {
      tracing::warn!(account_id = %account.id, error = %e, "verification code not delivered");
      return Err(match e {
        AuthError::SmsDeliveryFailed(_) => e,
        other => AuthError::SmsDeliveryFailed(other.to_string()),
      });
    }

    tracing::info!(account_id = %account.id, %expires_at, "verification code sent");

    Ok(())
  }

  /// Marks the account verified if `submitted` matches the pending, unexpired code
  ///
  /// The stored code is left in place; it is inert once the account is verified.
  ///
  /// # Errors
  /// - `AuthError::AlreadyVerified` if the account is verified
  /// - `AuthError::InvalidCode` if no code is pending or it differs
  /// - `AuthError::CodeExpired` if the code matches but its window has passed
  pub async fn submit_code(&self, account_id: AccountId, submitted: u32) -> Result<(), AuthError> {
    let account = self.load(account_id).await?;

    if account.verified {
      return Err(AuthError::AlreadyVerified);
    }

    // Anything outside the code range cannot match a stored code
    let submitted = VerificationCode::new(submitted).map_err(|_| AuthError::InvalidCode)?;

    account
      .check_verification_code(submitted, Utc::now())
      .map_err(|mismatch| match mismatch {
        CodeMismatch::Wrong => AuthError::InvalidCode,
        CodeMismatch::Expired => AuthError::CodeExpired,
      })?;

    self
      .account_repo
      .update(account.id, AccountChanges::mark_verified())
      .await
      .map_err(not_found_as_account)?;

    tracing::info!(account_id = %account.id, "account verified");

    Ok(())
  }

  async fn load(&self, account_id: AccountId) -> Result<Account, AuthError> {
    self
      .account_repo
      .find_by_id(account_id)
      .await?
      .ok_or(AuthError::AccountNotFound)
  }
}

fn not_found_as_account(error: AuthError) -> AuthError {
  match error {
    AuthError::Repository(RepositoryError::NotFound) => AuthError::AccountNotFound,
    other => other,
  }
}
