use async_trait::async_trait;

use super::entities::{Account, AccountChanges, AuthenticatedAccount, BankAccount};
use super::errors::AuthError;
use super::value_objects::{
  AccountId, Email, Password, PasswordHash, PhoneNumber, Role, SessionToken, VerificationCode,
};

/// Repository trait for account persistence operations
#[async_trait]
pub trait AccountRepository: Send + Sync {
  /// Creates a new account; a taken email surfaces as `RepositoryError::DuplicateKey`
  async fn create(&self, account: Account) -> Result<Account, AuthError>;

  /// Finds an account by its unique identifier
  async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AuthError>;

  /// Finds an account by its email address
  async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AuthError>;

  /// Writes only the fields set in `changes` and returns the updated account
  ///
  /// Last write wins; an unknown id yields `RepositoryError::NotFound`.
  async fn update(&self, id: AccountId, changes: AccountChanges) -> Result<Account, AuthError>;

  /// Sets the role to seller and stores the bank account as one unit
  ///
  /// Fails with `AuthError::AlreadySeller` if the account is already a seller,
  /// in which case nothing is written.
  async fn promote_to_seller(
    &self,
    id: AccountId,
    bank_account: BankAccount,
  ) -> Result<Account, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  ///
  /// # Arguments
  /// * `password` - Already validated plain text (at least 6 characters)
  ///
  /// # Returns
  /// * `Ok(PasswordHash)` - Salted one-way hash
  /// * `Err(AuthError::Hash)` - If the algorithm fails
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password, failing with `AuthError::InvalidPassword` on mismatch
  async fn verify(&self, password: &Password, hashed_password: &PasswordHash)
  -> Result<(), AuthError>;
}

/// Signs and verifies bearer session tokens, and produces one-time codes
pub trait TokenService: Send + Sync {
  /// Signs a session token for the given identity
  ///
  /// # Arguments
  /// * `account_id` - Subject of the token; must not be nil
  /// * `email` - Carried as a claim; must not be empty
  /// * `role` - Role at issue time
  ///
  /// # Returns
  /// * `Ok(SessionToken)` - Signed token valid for 30 days
  /// * `Err(AuthError::Validation)` - If the identity is incomplete
  /// * `Err(AuthError::TokenSigning)` - If signing fails
  fn issue_token(
    &self,
    account_id: AccountId,
    email: &str,
    role: Role,
  ) -> Result<SessionToken, AuthError>;

  /// Parses a raw `Authorization` header value and verifies the token it carries
  fn parse_and_verify(&self, authorization: &str) -> Result<AuthenticatedAccount, AuthError>;

  /// Draws a uniformly distributed code in `100000..=999999`
  fn generate_verification_code(&self) -> Result<VerificationCode, AuthError>;
}

/// Outbound SMS delivery
#[async_trait]
pub trait SmsSender: Send + Sync {
  /// Sends `message` to `to`
  ///
  /// # Returns
  /// * `Ok(())` - If the carrier accepted the message
  /// * `Err(AuthError::SmsDeliveryFailed)` - Otherwise
  async fn send(&self, to: &PhoneNumber, message: &str) -> Result<(), AuthError>;
}
