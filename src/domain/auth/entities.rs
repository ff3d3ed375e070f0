use chrono::{DateTime, Utc};
use serde::Serialize;

use super::value_objects::{
  AccountId, BankAccountNumber, Email, PasswordHash, PaymentType, PhoneNumber, Role, SwiftCode,
  VerificationCode,
};

/// Account entity representing a buyer or seller on the platform
#[derive(Debug, Clone)]
pub struct Account {
  /// Unique identifier, assigned at creation
  pub id: AccountId,
  /// Login key (unique)
  pub email: Email,
  /// Argon2id hash of the password
  pub password_hash: PasswordHash,
  /// Destination for verification codes
  pub phone: PhoneNumber,
  pub role: Role,
  /// Whether the phone number has been confirmed with a code
  pub verified: bool,
  /// Outstanding verification code, if one was requested
  pub verification_code: Option<VerificationCode>,
  /// Expiration time for the outstanding verification code
  pub verification_code_expires_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Account {
  /// Creates a new unverified buyer account
  pub fn new(email: Email, password_hash: PasswordHash, phone: PhoneNumber) -> Self {
    let now = Utc::now();
    Self {
      id: AccountId::new(),
      email,
      password_hash,
      phone,
      role: Role::Buyer,
      verified: false,
      verification_code: None,
      verification_code_expires_at: None,
      created_at: now,
      updated_at: now,
    }
  }

  /// Creates an account from database fields (for reconstruction)
  #[allow(clippy::too_many_arguments)]
  pub fn from_db(
    id: AccountId,
    email: Email,
    password_hash: PasswordHash,
    phone: PhoneNumber,
    role: Role,
    verified: bool,
    verification_code: Option<VerificationCode>,
    verification_code_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      email,
      password_hash,
      phone,
      role,
      verified,
      verification_code,
      verification_code_expires_at,
      created_at,
      updated_at,
    }
  }

  /// Checks a submitted code against the pending one
  ///
  /// Returns `Ok(())` only when the codes are equal and `now` is strictly
  /// before the stored expiry.
  pub fn check_verification_code(
    &self,
    submitted: VerificationCode,
    now: DateTime<Utc>,
  ) -> Result<(), CodeMismatch> {
    match (self.verification_code, self.verification_code_expires_at) {
      (Some(stored), Some(expires_at)) if stored == submitted => {
        if now < expires_at {
          Ok(())
        } else {
          Err(CodeMismatch::Expired)
        }
      }
      _ => Err(CodeMismatch::Wrong),
    }
  }

  /// Applies a partial update in place, the way storage does
  ///
  /// `verified` only ever turns on.
  pub fn apply(&mut self, changes: &AccountChanges) {
    self.verified |= changes.set_verified;
    if let Some(code) = changes.verification_code {
      self.verification_code = Some(code);
    }
    if let Some(expires_at) = changes.verification_code_expires_at {
      self.verification_code_expires_at = Some(expires_at);
    }
    self.updated_at = Utc::now();
  }

  /// Moves the account into the seller tier; there is no way back
  pub fn promote_to_seller(&mut self) {
    self.role = Role::Seller;
    self.updated_at = Utc::now();
  }
}

/// Why a submitted verification code was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeMismatch {
  Wrong,
  Expired,
}

/// Partial update of an account; unset fields are left untouched
///
/// Only forward moves are expressible: `set_verified` can flip the flag on
/// but never off, and the role is changed solely through
/// `AccountRepository::promote_to_seller`.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
  pub set_verified: bool,
  pub verification_code: Option<VerificationCode>,
  pub verification_code_expires_at: Option<DateTime<Utc>>,
}

impl AccountChanges {
  pub fn pending_code(code: VerificationCode, expires_at: DateTime<Utc>) -> Self {
    Self {
      verification_code: Some(code),
      verification_code_expires_at: Some(expires_at),
      ..Default::default()
    }
  }

  pub fn mark_verified() -> Self {
    Self {
      set_verified: true,
      ..Default::default()
    }
  }

  pub fn is_empty(&self) -> bool {
    !self.set_verified
      && self.verification_code.is_none()
      && self.verification_code_expires_at.is_none()
  }
}

/// Payout details supplied when an account joins the seller program
#[derive(Debug, Clone)]
pub struct BankDetails {
  pub account_number: BankAccountNumber,
  pub swift_code: SwiftCode,
  pub payment_type: PaymentType,
}

/// Bank account entity owned by a seller
#[derive(Debug, Clone)]
pub struct BankAccount {
  pub id: uuid::Uuid,
  /// Owning account
  pub account_id: AccountId,
  pub account_number: BankAccountNumber,
  pub swift_code: SwiftCode,
  pub payment_type: PaymentType,
  pub created_at: DateTime<Utc>,
}

impl BankAccount {
  pub fn new(account_id: AccountId, details: BankDetails) -> Self {
    Self {
      id: uuid::Uuid::new_v4(),
      account_id,
      account_number: details.account_number,
      swift_code: details.swift_code,
      payment_type: details.payment_type,
      created_at: Utc::now(),
    }
  }

  pub fn from_db(
    id: uuid::Uuid,
    account_id: AccountId,
    account_number: BankAccountNumber,
    swift_code: SwiftCode,
    payment_type: PaymentType,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      account_id,
      account_number,
      swift_code,
      payment_type,
      created_at,
    }
  }
}

/// Identity view reconstructed from verified token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedAccount {
  pub id: AccountId,
  pub email: String,
  pub role: Role,
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn account() -> Account {
    Account::new(
      Email::new("a@x.com").unwrap(),
      PasswordHash::from_hash(
        "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$RdescudvJCsgt3ub+b+dWRWJTmaaJObG",
      )
      .unwrap(),
      PhoneNumber::new("+15550001").unwrap(),
    )
  }

  fn code(value: u32) -> VerificationCode {
    VerificationCode::new(value).unwrap()
  }

  #[test]
  fn test_new_account_defaults() {
    let account = account();

    assert_eq!(account.role, Role::Buyer);
    assert!(!account.verified);
    assert!(account.verification_code.is_none());
    assert!(account.verification_code_expires_at.is_none());
  }

  #[test]
  fn test_check_code_without_pending_code() {
    let account = account();
    assert_eq!(
      account.check_verification_code(code(123_456), Utc::now()),
      Err(CodeMismatch::Wrong)
    );
  }

  #[test]
  fn test_check_code_match_and_expiry() {
    let mut account = account();
    let now = Utc::now();
    account.apply(&AccountChanges::pending_code(
      code(123_456),
      now + Duration::minutes(30),
    ));

    assert_eq!(account.check_verification_code(code(123_456), now), Ok(()));
    assert_eq!(
      account.check_verification_code(code(654_321), now),
      Err(CodeMismatch::Wrong)
    );
    // expiry is exclusive
    assert_eq!(
      account.check_verification_code(code(123_456), now + Duration::minutes(30)),
      Err(CodeMismatch::Expired)
    );
    // a wrong code after expiry is still reported as wrong
    assert_eq!(
      account.check_verification_code(code(654_321), now + Duration::hours(1)),
      Err(CodeMismatch::Wrong)
    );
  }

  #[test]
  fn test_apply_leaves_unset_fields() {
    let mut account = account();
    account.apply(&AccountChanges::pending_code(code(111_111), Utc::now()));
    account.apply(&AccountChanges::mark_verified());

    assert!(account.verified);
    assert_eq!(account.verification_code, Some(code(111_111)));
    assert_eq!(account.role, Role::Buyer);
  }

  #[test]
  fn test_verified_is_sticky() {
    let mut account = account();
    account.apply(&AccountChanges::mark_verified());
    account.apply(&AccountChanges {
      set_verified: false,
      ..Default::default()
    });

    assert!(account.verified);
  }

  #[test]
  fn test_promotion_survives_later_updates() {
    let mut account = account();
    account.promote_to_seller();
    account.apply(&AccountChanges::pending_code(code(222_222), Utc::now()));

    assert_eq!(account.role, Role::Seller);
  }

  #[test]
  fn test_changes_is_empty() {
    assert!(AccountChanges::default().is_empty());
    assert!(!AccountChanges::mark_verified().is_empty());
  }
}
