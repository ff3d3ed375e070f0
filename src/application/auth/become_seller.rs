use std::sync::Arc;

use crate::domain::auth::entities::BankDetails;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{
  AccountId, BankAccountNumber, PaymentType, Role, SwiftCode,
};

/// Command for joining the seller program
#[derive(Debug, Clone)]
pub struct BecomeSellerCommand {
  pub account_id: AccountId,
  pub bank_account_number: String,
  pub swift_code: String,
  pub payment_type: String,
}

/// Response after promotion, with a token carrying the new role
#[derive(Debug, Clone)]
pub struct BecomeSellerResponse {
  pub account_id: AccountId,
  pub role: Role,
  pub token: String,
}

/// Use case for promoting a buyer to seller
pub struct BecomeSellerUseCase {
  auth_service: Arc<AuthService>,
}

impl BecomeSellerUseCase {
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// # Errors
  /// Returns `AuthError::AlreadySeller` if the account already sells, or a
  /// validation error for malformed bank details
  pub async fn execute(
    &self,
    command: BecomeSellerCommand,
  ) -> Result<BecomeSellerResponse, AuthError> {
    let bank_details = BankDetails {
      account_number: BankAccountNumber::new(command.bank_account_number)?,
      swift_code: SwiftCode::new(command.swift_code)?,
      payment_type: PaymentType::new(command.payment_type)?,
    };

    let (account, token) = self
      .auth_service
      .become_seller(command.account_id, bank_details)
      .await?;

    Ok(BecomeSellerResponse {
      account_id: account.id,
      role: account.role,
      token: token.into_inner(),
    })
  }
}
