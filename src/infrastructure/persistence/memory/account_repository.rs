use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::auth::{
  entities::{Account, AccountChanges, BankAccount},
  errors::{AuthError, RepositoryError},
  ports::AccountRepository,
  value_objects::{AccountId, Email},
};

#[derive(Default)]
struct Store {
  accounts: HashMap<AccountId, Account>,
  bank_accounts: Vec<BankAccount>,
}

/// Process-local AccountRepository for development and tests
///
/// Holds the same uniqueness rules as the database schema: one account per
/// email and globally unique bank account numbers.
#[derive(Default)]
pub struct InMemoryAccountRepository {
  store: RwLock<Store>,
}

impl InMemoryAccountRepository {
  pub fn new() -> Self {
    Self::default()
  }

  /// Bank accounts owned by `account_id`
  pub async fn bank_accounts_of(&self, account_id: AccountId) -> Vec<BankAccount> {
    self
      .store
      .read()
      .await
      .bank_accounts
      .iter()
      .filter(|bank_account| bank_account.account_id == account_id)
      .cloned()
      .collect()
  }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
  async fn create(&self, account: Account) -> Result<Account, AuthError> {
    let mut store = self.store.write().await;

    if store.accounts.contains_key(&account.id) {
      return Err(RepositoryError::DuplicateKey("accounts_pkey".to_string()).into());
    }
    if store.accounts.values().any(|a| a.email == account.email) {
      return Err(RepositoryError::DuplicateKey("accounts_email_key".to_string()).into());
    }

    store.accounts.insert(account.id, account.clone());
    Ok(account)
  }

  async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AuthError> {
    Ok(self.store.read().await.accounts.get(&id).cloned())
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AuthError> {
    Ok(
      self
        .store
        .read()
        .await
        .accounts
        .values()
        .find(|account| &account.email == email)
        .cloned(),
    )
  }

  async fn update(&self, id: AccountId, changes: AccountChanges) -> Result<Account, AuthError> {
    let mut store = self.store.write().await;
    let account = store
      .accounts
      .get_mut(&id)
      .ok_or(AuthError::Repository(RepositoryError::NotFound))?;

    account.apply(&changes);
    Ok(account.clone())
  }

  async fn promote_to_seller(
    &self,
    id: AccountId,
    bank_account: BankAccount,
  ) -> Result<Account, AuthError> {
    // Single write guard: checks and both writes happen without interleaving
    let mut store = self.store.write().await;

    let already_seller = store
      .accounts
      .get(&id)
      .ok_or(AuthError::Repository(RepositoryError::NotFound))?
      .role
      .is_seller();
    if already_seller {
      return Err(AuthError::AlreadySeller);
    }

    if store
      .bank_accounts
      .iter()
      .any(|existing| existing.account_number == bank_account.account_number)
    {
      return Err(
        RepositoryError::DuplicateKey("bank_accounts_account_number_key".to_string()).into(),
      );
    }

    store.bank_accounts.push(BankAccount {
      account_id: id,
      ..bank_account
    });

    let account = store
      .accounts
      .get_mut(&id)
      .ok_or(AuthError::Repository(RepositoryError::NotFound))?;
    account.promote_to_seller();

    Ok(account.clone())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::entities::BankDetails;
  use crate::domain::auth::value_objects::{
    BankAccountNumber, PasswordHash, PaymentType, PhoneNumber, Role, SwiftCode,
  };

  fn account(email: &str) -> Account {
    Account::new(
      Email::new(email).unwrap(),
      PasswordHash::from_hash(
        "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHQ$RdescudvJCsgt3ub+b+dWRWJTmaaJObG",
      )
      .unwrap(),
      PhoneNumber::new("+15550001").unwrap(),
    )
  }

  fn bank_account(id: AccountId) -> BankAccount {
    BankAccount::new(
      id,
      BankDetails {
        account_number: BankAccountNumber::new("1234567890").unwrap(),
        swift_code: SwiftCode::new("DEUTDEFF").unwrap(),
        payment_type: PaymentType::new("bank_transfer").unwrap(),
      },
    )
  }

  #[tokio::test]
  async fn test_email_is_unique() {
    let repo = InMemoryAccountRepository::new();

    repo.create(account("a@x.com")).await.unwrap();
    let result = repo.create(account("a@x.com")).await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::DuplicateKey(_)))
    ));
  }

  #[tokio::test]
  async fn test_update_unknown_account() {
    let repo = InMemoryAccountRepository::new();

    let result = repo
      .update(AccountId::new(), AccountChanges::mark_verified())
      .await;

    assert!(matches!(
      result,
      Err(AuthError::Repository(RepositoryError::NotFound))
    ));
  }

  #[tokio::test]
  async fn test_promote_writes_role_and_bank_account() {
    let repo = InMemoryAccountRepository::new();
    let created = repo.create(account("a@x.com")).await.unwrap();

    let seller = repo
      .promote_to_seller(created.id, bank_account(created.id))
      .await
      .unwrap();

    assert_eq!(seller.role, Role::Seller);
    assert_eq!(repo.bank_accounts_of(created.id).await.len(), 1);

    let again = repo
      .promote_to_seller(created.id, bank_account(created.id))
      .await;
    assert!(matches!(again, Err(AuthError::AlreadySeller)));
    assert_eq!(repo.bank_accounts_of(created.id).await.len(), 1);
  }

  #[tokio::test]
  async fn test_verified_never_reverts() {
    let repo = InMemoryAccountRepository::new();
    let created = repo.create(account("a@x.com")).await.unwrap();
    repo
      .update(created.id, AccountChanges::mark_verified())
      .await
      .unwrap();

    let after = repo
      .update(created.id, AccountChanges::default())
      .await
      .unwrap();

    assert!(after.verified);
  }

  #[tokio::test]
  async fn test_code_updates_keep_seller_role() {
    let repo = InMemoryAccountRepository::new();
    let created = repo.create(account("a@x.com")).await.unwrap();
    repo
      .promote_to_seller(created.id, bank_account(created.id))
      .await
      .unwrap();

    let code = crate::domain::auth::value_objects::VerificationCode::new(123_456).unwrap();
    let after = repo
      .update(
        created.id,
        AccountChanges::pending_code(code, chrono::Utc::now()),
      )
      .await
      .unwrap();

    assert_eq!(after.role, Role::Seller);
    assert_eq!(after.verification_code, Some(code));
  }
}
