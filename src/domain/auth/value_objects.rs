use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::ValidateEmail;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::errors::ValidationError;

// ============================================================================
// Email Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
  /// Creates a new Email after validation
  pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
    // Normalize to lowercase
    let email = email.into().trim().to_lowercase();

    if !email.validate_email() {
      return Err(ValidationError::InvalidEmail);
    }

    Ok(Self(email))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Email {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for Email {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// Password Value Object (Plain Password - Never Stored)
// ============================================================================

/// Plain-text password, wiped from memory on drop.
///
/// Both hashing and verification take a `Password`, so the length rules below
/// apply to every plaintext that reaches the hasher.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Password(String);

impl Password {
  pub const MIN_LENGTH: usize = 6;
  pub const MAX_LENGTH: usize = 128;

  /// Creates a new Password after validation
  pub fn new(password: impl Into<String>) -> Result<Self, ValidationError> {
    let password = password.into();
    let length = password.chars().count();

    if length < Self::MIN_LENGTH {
      return Err(ValidationError::PasswordTooShort {
        min: Self::MIN_LENGTH,
      });
    }

    if length > Self::MAX_LENGTH {
      return Err(ValidationError::PasswordTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(password))
  }

  /// Returns the password as a string slice (use with caution)
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Password {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Password(***)")
  }
}

// ============================================================================
// PasswordHash Value Object (PHC string)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
  /// Wraps an existing PHC-formatted hash string
  pub fn from_hash(hash: impl Into<String>) -> Result<Self, ValidationError> {
    let hash = hash.into();

    argon2::PasswordHash::new(&hash).map_err(|_| ValidationError::InvalidField {
      field: "password_hash".to_string(),
    })?;

    Ok(Self(hash))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for PasswordHash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PasswordHash(***)")
  }
}

// ============================================================================
// AccountId Value Object
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
  /// Creates a new random AccountId
  pub fn new() -> Self {
    Self(Uuid::new_v4())
  }

  pub fn from_uuid(uuid: Uuid) -> Self {
    Self(uuid)
  }

  pub fn into_inner(self) -> Uuid {
    self.0
  }

  pub fn as_uuid(&self) -> &Uuid {
    &self.0
  }

  /// The all-zero id never identifies a persisted account
  pub fn is_nil(&self) -> bool {
    self.0.is_nil()
  }
}

impl Default for AccountId {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Display for AccountId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<Uuid> for AccountId {
  fn from(uuid: Uuid) -> Self {
    Self(uuid)
  }
}

impl From<AccountId> for Uuid {
  fn from(account_id: AccountId) -> Self {
    account_id.0
  }
}

// ============================================================================
// Role Enum
// ============================================================================

/// Capability tier of an account. The only legal transition is `Buyer -> Seller`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  #[default]
  Buyer,
  Seller,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Buyer => "buyer",
      Self::Seller => "seller",
    }
  }

  pub fn is_seller(&self) -> bool {
    matches!(self, Self::Seller)
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "buyer" => Ok(Self::Buyer),
      "seller" => Ok(Self::Seller),
      _ => Err(ValidationError::InvalidRole(s.to_string())),
    }
  }
}

// ============================================================================
// PhoneNumber Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
  const MIN_DIGITS: usize = 7;
  const MAX_DIGITS: usize = 15;

  /// Accepts an optional leading `+` followed by 7 to 15 digits (E.164 shape)
  pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
    let phone = phone.into();
    let phone = phone.trim();
    let digits = phone.strip_prefix('+').unwrap_or(phone);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
      return Err(ValidationError::InvalidPhoneNumber);
    }

    if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
      return Err(ValidationError::InvalidPhoneNumber);
    }

    Ok(Self(phone.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for PhoneNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// VerificationCode Value Object
// ============================================================================

/// Six-digit one-time code sent over SMS
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationCode(u32);

impl VerificationCode {
  pub const MIN: u32 = 100_000;
  pub const MAX: u32 = 999_999;

  pub fn new(code: u32) -> Result<Self, ValidationError> {
    if !(Self::MIN..=Self::MAX).contains(&code) {
      return Err(ValidationError::InvalidVerificationCode);
    }

    Ok(Self(code))
  }

  pub fn value(&self) -> u32 {
    self.0
  }
}

impl fmt::Display for VerificationCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:06}", self.0)
  }
}

// Codes are credentials; keep them out of logs
impl fmt::Debug for VerificationCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("VerificationCode(***)")
  }
}

// ============================================================================
// SessionToken Value Object (Signed JWT)
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
  pub fn new(token: impl Into<String>) -> Self {
    Self(token.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Debug for SessionToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("SessionToken(***)")
  }
}

// ============================================================================
// Bank details
// ============================================================================

/// Seller payout account number; digits only, unique across all sellers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankAccountNumber(String);

impl BankAccountNumber {
  const MIN_LENGTH: usize = 6;
  const MAX_LENGTH: usize = 34;

  pub fn new(number: impl Into<String>) -> Result<Self, ValidationError> {
    let number: String = number
      .into()
      .chars()
      .filter(|c| !c.is_whitespace())
      .collect();

    if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&number.len())
      || !number.chars().all(|c| c.is_ascii_digit())
    {
      return Err(ValidationError::InvalidBankAccountNumber);
    }

    Ok(Self(number))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

/// Routing / SWIFT (BIC) code: 8 or 11 alphanumeric characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwiftCode(String);

impl SwiftCode {
  pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
    let code = code.into().trim().to_uppercase();

    if !matches!(code.len(), 8 | 11) || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
      return Err(ValidationError::InvalidSwiftCode);
    }

    Ok(Self(code))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentType(String);

impl PaymentType {
  const MAX_LENGTH: usize = 64;

  pub fn new(payment_type: impl Into<String>) -> Result<Self, ValidationError> {
    let payment_type = payment_type.into().trim().to_string();

    if payment_type.is_empty() {
      return Err(ValidationError::MissingField {
        field: "payment_type".to_string(),
      });
    }

    if payment_type.len() > Self::MAX_LENGTH {
      return Err(ValidationError::InvalidField {
        field: "payment_type".to_string(),
      });
    }

    Ok(Self(payment_type))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}
