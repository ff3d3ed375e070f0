use std::sync::Arc;

use super::entities::{Account, AuthenticatedAccount, BankAccount, BankDetails};
use super::errors::{AuthError, RepositoryError};
use super::ports::{AccountRepository, PasswordHasher, TokenService};
use super::value_objects::{AccountId, Email, Password, PhoneNumber, SessionToken};

/// Runtime knobs for the account lifecycle
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
  /// Report unknown email and wrong password as the same `InvalidCredentials` error
  pub uniform_login_errors: bool,
}

impl Default for AuthServiceConfig {
  fn default() -> Self {
    Self {
      uniform_login_errors: true,
    }
  }
}

/// Account lifecycle: sign-up, login, seller promotion and token authentication
///
/// Never touches password hashes or signing keys directly; all of that goes
/// through the `PasswordHasher` and `TokenService` ports.
pub struct AuthService {
  account_repo: Arc<dyn AccountRepository>,
  password_hasher: Arc<dyn PasswordHasher>,
  token_service: Arc<dyn TokenService>,
  config: AuthServiceConfig,
}

impl AuthService {
  pub fn new(
    account_repo: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<dyn TokenService>,
    config: AuthServiceConfig,
  ) -> Self {
    Self {
      account_repo,
      password_hasher,
      token_service,
      config,
    }
  }

  /// Registers a new buyer account and issues its first session token
  ///
  /// # Errors
  /// Returns `AuthError::EmailAlreadyExists` if email is already registered
  pub async fn sign_up(
    &self,
    email: Email,
    password: Password,
    phone: PhoneNumber,
  ) -> Result<(Account, SessionToken), AuthError> {
    if self.account_repo.find_by_email(&email).await?.is_some() {
      return Err(AuthError::EmailAlreadyExists);
    }

    let password_hash = self.password_hasher.hash(&password).await?;
    let account = Account::new(email, password_hash, phone);

    // The pre-check above races with concurrent sign-ups; storage uniqueness decides
    let created = match self.account_repo.create(account).await {
      Ok(account) => account,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_))) => {
        return Err(AuthError::EmailAlreadyExists);
      }
      Err(e) => return Err(e),
    };

    tracing::info!(account_id = %created.id, "account created");

    let token = self
      .token_service
      .issue_token(created.id, created.email.as_str(), created.role)?;

    Ok((created, token))
  }

  /// Verifies credentials and issues a session token
  ///
  /// # Errors
  /// With `uniform_login_errors` both an unknown email and a wrong password
  /// yield `AuthError::InvalidCredentials`; otherwise `UserNotFound` and
  /// `WrongPassword` respectively.
  pub async fn login(
    &self,
    email: Email,
    password: Password,
  ) -> Result<(Account, SessionToken), AuthError> {
    let account = match self.account_repo.find_by_email(&email).await? {
      Some(account) => account,
      None => {
        tracing::warn!("login rejected: unknown email");
        return Err(self.login_failure(AuthError::UserNotFound));
      }
    };

    match self
      .password_hasher
      .verify(&password, &account.password_hash)
      .await
    {
      Ok(()) => {}
      Err(AuthError::InvalidPassword) => {
        tracing::warn!(account_id = %account.id, "login rejected: wrong password");
        return Err(self.login_failure(AuthError::WrongPassword));
      }
      Err(e) => return Err(e),
    }

    let token = self
      .token_service
      .issue_token(account.id, account.email.as_str(), account.role)?;

    Ok((account, token))
  }

  /// Promotes a buyer to seller, storing exactly one bank account
  ///
  /// The returned token carries the seller role. Nothing is issued if
  /// storage fails.
  ///
  /// # Errors
  /// Returns `AuthError::AlreadySeller` if the account already sells
  pub async fn become_seller(
    &self,
    account_id: AccountId,
    bank_details: BankDetails,
  ) -> Result<(Account, SessionToken), AuthError> {
    let account = self
      .account_repo
      .find_by_id(account_id)
      .await?
      .ok_or(AuthError::AccountNotFound)?;

    if account.role.is_seller() {
      return Err(AuthError::AlreadySeller);
    }

    let bank_account = BankAccount::new(account.id, bank_details);
    let seller = match self
      .account_repo
      .promote_to_seller(account.id, bank_account)
      .await
    {
      Ok(account) => account,
      Err(AuthError::Repository(RepositoryError::NotFound)) => {
        return Err(AuthError::AccountNotFound);
      }
      Err(e) => return Err(e),
    };

    tracing::info!(account_id = %seller.id, "account joined seller program");

    let token = self
      .token_service
      .issue_token(seller.id, seller.email.as_str(), seller.role)?;

    Ok((seller, token))
  }

  /// Resolves the principal behind a raw `Authorization` header value
  pub fn authenticate(&self, authorization: &str) -> Result<AuthenticatedAccount, AuthError> {
    self.token_service.parse_and_verify(authorization)
  }

  fn login_failure(&self, specific: AuthError) -> AuthError {
    if self.config.uniform_login_errors {
      AuthError::InvalidCredentials
    } else {
      specific
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::value_objects::{BankAccountNumber, PaymentType, Role, SwiftCode};
  use crate::test_support::TestContext;

  fn email(value: &str) -> Email {
    Email::new(value).unwrap()
  }

  fn password(value: &str) -> Password {
    Password::new(value).unwrap()
  }

  fn phone() -> PhoneNumber {
    PhoneNumber::new("+15550001").unwrap()
  }

  fn bank_details(number: &str) -> BankDetails {
    BankDetails {
      account_number: BankAccountNumber::new(number).unwrap(),
      swift_code: SwiftCode::new("DEUTDEFF").unwrap(),
      payment_type: PaymentType::new("bank_transfer").unwrap(),
    }
  }

  #[tokio::test]
  async fn test_sign_up_then_login_as_buyer() {
    let ctx = TestContext::new();

    let (account, token) = ctx
      .auth_service
      .sign_up(email("a@x.com"), password("secret1"), phone())
      .await
      .unwrap();

    assert!(!token.as_str().is_empty());
    assert_eq!(account.role, Role::Buyer);
    assert!(!account.verified);

    let (_, login_token) = ctx
      .auth_service
      .login(email("a@x.com"), password("secret1"))
      .await
      .unwrap();

    let principal = ctx
      .auth_service
      .authenticate(&format!("Bearer {}", login_token.as_str()))
      .unwrap();
    assert_eq!(principal.id, account.id);
    assert_eq!(principal.email, "a@x.com");
    assert_eq!(principal.role, Role::Buyer);
  }

  #[tokio::test]
  async fn test_sign_up_stores_hash_not_password() {
    let ctx = TestContext::new();

    let (account, _) = ctx
      .auth_service
      .sign_up(email("a@x.com"), password("secret1"), phone())
      .await
      .unwrap();

    assert_ne!(account.password_hash.as_str(), "secret1");
    assert!(account.password_hash.as_str().starts_with("$argon2id$"));
  }

  #[tokio::test]
  async fn test_sign_up_duplicate_email() {
    let ctx = TestContext::new();

    ctx
      .auth_service
      .sign_up(email("a@x.com"), password("secret1"), phone())
      .await
      .unwrap();

    let result = ctx
      .auth_service
      .sign_up(email("A@X.com"), password("another1"), phone())
      .await;

    assert!(matches!(result, Err(AuthError::EmailAlreadyExists)));
  }

  #[tokio::test]
  async fn test_login_errors_are_uniform_by_default() {
    let ctx = TestContext::new();
    ctx
      .auth_service
      .sign_up(email("a@x.com"), password("secret1"), phone())
      .await
      .unwrap();

    let unknown = ctx
      .auth_service
      .login(email("nobody@x.com"), password("secret1"))
      .await;
    let wrong = ctx
      .auth_service
      .login(email("a@x.com"), password("secret2"))
      .await;

    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
  }

  #[tokio::test]
  async fn test_login_errors_can_be_specific() {
    let ctx = TestContext::with_config(AuthServiceConfig {
      uniform_login_errors: false,
    });
    ctx
      .auth_service
      .sign_up(email("a@x.com"), password("secret1"), phone())
      .await
      .unwrap();

    let unknown = ctx
      .auth_service
      .login(email("nobody@x.com"), password("secret1"))
      .await;
    let wrong = ctx
      .auth_service
      .login(email("a@x.com"), password("secret2"))
      .await;

    assert!(matches!(unknown, Err(AuthError::UserNotFound)));
    assert!(matches!(wrong, Err(AuthError::WrongPassword)));
  }

  #[tokio::test]
  async fn test_become_seller() {
    let ctx = TestContext::new();
    let (account, _) = ctx
      .auth_service
      .sign_up(email("a@x.com"), password("secret1"), phone())
      .await
      .unwrap();

    let (seller, token) = ctx
      .auth_service
      .become_seller(account.id, bank_details("1234567890"))
      .await
      .unwrap();

    assert_eq!(seller.role, Role::Seller);

    let principal = ctx
      .auth_service
      .authenticate(&format!("Bearer {}", token.as_str()))
      .unwrap();
    assert_eq!(principal.role, Role::Seller);

    let bank_accounts = ctx.account_repo.bank_accounts_of(account.id).await;
    assert_eq!(bank_accounts.len(), 1);
    assert_eq!(bank_accounts[0].account_number.as_str(), "1234567890");
    assert_eq!(bank_accounts[0].swift_code.as_str(), "DEUTDEFF");
  }

  #[tokio::test]
  async fn test_become_seller_twice_is_rejected() {
    let ctx = TestContext::new();
    let (account, _) = ctx
      .auth_service
      .sign_up(email("a@x.com"), password("secret1"), phone())
      .await
      .unwrap();

    ctx
      .auth_service
      .become_seller(account.id, bank_details("1234567890"))
      .await
      .unwrap();

    let second = ctx
      .auth_service
      .become_seller(account.id, bank_details("9999999999"))
      .await;

    assert!(matches!(second, Err(AuthError::AlreadySeller)));
    assert_eq!(ctx.account_repo.bank_accounts_of(account.id).await.len(), 1);
  }

  #[tokio::test]
  async fn test_become_seller_unknown_account() {
    let ctx = TestContext::new();

    let result = ctx
      .auth_service
      .become_seller(AccountId::new(), bank_details("1234567890"))
      .await;

    assert!(matches!(result, Err(AuthError::AccountNotFound)));
  }

  #[tokio::test]
  async fn test_become_seller_storage_conflict_keeps_buyer() {
    let ctx = TestContext::new();
    let (first, _) = ctx
      .auth_service
      .sign_up(email("a@x.com"), password("secret1"), phone())
      .await
      .unwrap();
    let (second, _) = ctx
      .auth_service
      .sign_up(email("b@x.com"), password("secret1"), phone())
      .await
      .unwrap();

    ctx
      .auth_service
      .become_seller(first.id, bank_details("1234567890"))
      .await
      .unwrap();

    // account numbers are globally unique
    let result = ctx
      .auth_service
      .become_seller(second.id, bank_details("1234567890"))
      .await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));

    let unchanged = ctx.account_repo.find_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(unchanged.role, Role::Buyer);
    assert!(ctx.account_repo.bank_accounts_of(second.id).await.is_empty());
  }
}
