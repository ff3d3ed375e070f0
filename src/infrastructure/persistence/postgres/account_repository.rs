use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::{Account, AccountChanges, BankAccount},
  errors::{AuthError, RepositoryError},
  ports::AccountRepository,
  value_objects::{AccountId, Email, PasswordHash, PhoneNumber, Role, VerificationCode},
};

const ACCOUNT_COLUMNS: &str = r#"
                id,
                email,
                password_hash,
                phone,
                role,
                verified,
                verification_code,
                verification_code_expires_at,
                created_at,
                updated_at
"#;

/// PostgreSQL implementation of the AccountRepository trait
///
/// Unique violations surface as `RepositoryError::DuplicateKey`, so callers
/// can tell a taken email or bank account number from a broken database.
pub struct PostgresAccountRepository {
  pool: PgPool,
}

impl PostgresAccountRepository {
  /// Creates a new PostgreSQL account repository
  ///
  /// # Arguments
  ///
  /// * `pool` - Connection pool with migrations already applied
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for accounts table
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
  id: Uuid,
  email: String,
  password_hash: String,
  phone: String,
  role: String,
  verified: bool,
  verification_code: Option<i32>,
  verification_code_expires_at: Option<DateTime<Utc>>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
  type Error = RepositoryError;

  fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
    let corrupt = |field: &str| RepositoryError::CorruptRecord(format!("accounts.{}", field));

    let verification_code = row
      .verification_code
      .map(|code| {
        u32::try_from(code)
          .ok()
          .and_then(|code| VerificationCode::new(code).ok())
          .ok_or_else(|| corrupt("verification_code"))
      })
      .transpose()?;

    Ok(Account::from_db(
      AccountId::from_uuid(row.id),
      Email::new(row.email).map_err(|_| corrupt("email"))?,
      PasswordHash::from_hash(row.password_hash).map_err(|_| corrupt("password_hash"))?,
      PhoneNumber::new(row.phone).map_err(|_| corrupt("phone"))?,
      row.role.parse::<Role>().map_err(|_| corrupt("role"))?,
      row.verified,
      verification_code,
      row.verification_code_expires_at,
      row.created_at,
      row.updated_at,
    ))
  }
}

fn code_column(code: Option<VerificationCode>) -> Option<i32> {
  // six digits always fit
  code.map(|code| code.value() as i32)
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
  async fn create(&self, account: Account) -> Result<Account, AuthError> {
    let query = format!(
      r#"
            INSERT INTO accounts (
                id,
                email,
                password_hash,
                phone,
                role,
                verified,
                verification_code,
                verification_code_expires_at,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
      ACCOUNT_COLUMNS
    );

    let row = sqlx::query_as::<_, AccountRow>(&query)
      .bind(account.id.into_inner())
      .bind(account.email.as_str())
      .bind(account.password_hash.as_str())
      .bind(account.phone.as_str())
      .bind(account.role.as_str())
      .bind(account.verified)
      .bind(code_column(account.verification_code))
      .bind(account.verification_code_expires_at)
      .bind(account.created_at)
      .bind(account.updated_at)
      .fetch_one(&self.pool)
      .await?;

    Ok(Account::try_from(row)?)
  }

  async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AuthError> {
    let query = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);

    let row = sqlx::query_as::<_, AccountRow>(&query)
      .bind(id.into_inner())
      .fetch_optional(&self.pool)
      .await?;

    Ok(row.map(Account::try_from).transpose()?)
  }

  async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, AuthError> {
    let query = format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS);

    let row = sqlx::query_as::<_, AccountRow>(&query)
      .bind(email.as_str())
      .fetch_optional(&self.pool)
      .await?;

    Ok(row.map(Account::try_from).transpose()?)
  }

  async fn update(&self, id: AccountId, changes: AccountChanges) -> Result<Account, AuthError> {
    // NULL parameters keep the stored value; verified can only turn on
    let query = format!(
      r#"
            UPDATE accounts
            SET
                verified = verified OR $2,
                verification_code = COALESCE($3, verification_code),
                verification_code_expires_at = COALESCE($4, verification_code_expires_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
      ACCOUNT_COLUMNS
    );

    let row = sqlx::query_as::<_, AccountRow>(&query)
      .bind(id.into_inner())
      .bind(changes.set_verified)
      .bind(code_column(changes.verification_code))
      .bind(changes.verification_code_expires_at)
      .fetch_optional(&self.pool)
      .await?
      .ok_or(AuthError::Repository(RepositoryError::NotFound))?;

    Ok(Account::try_from(row)?)
  }

  async fn promote_to_seller(
    &self,
    id: AccountId,
    bank_account: BankAccount,
  ) -> Result<Account, AuthError> {
    let mut tx = self.pool.begin().await?;

    // Row lock serializes concurrent promotions of the same account
    let role: Option<String> =
      sqlx::query_scalar("SELECT role FROM accounts WHERE id = $1 FOR UPDATE")
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await?;

    match role.as_deref().map(str::parse::<Role>) {
      None => return Err(AuthError::Repository(RepositoryError::NotFound)),
      Some(Ok(Role::Seller)) => return Err(AuthError::AlreadySeller),
      Some(Ok(Role::Buyer)) => {}
      Some(Err(_)) => {
        return Err(AuthError::Repository(RepositoryError::CorruptRecord(
          "accounts.role".to_string(),
        )));
      }
    }

    sqlx::query(
      r#"
            INSERT INTO bank_accounts (
                id,
                account_id,
                account_number,
                swift_code,
                payment_type,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
    )
    .bind(bank_account.id)
    .bind(id.into_inner())
    .bind(bank_account.account_number.as_str())
    .bind(bank_account.swift_code.as_str())
    .bind(bank_account.payment_type.as_str())
    .bind(bank_account.created_at)
    .execute(&mut *tx)
    .await?;

    let query = format!(
      r#"
            UPDATE accounts
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
      ACCOUNT_COLUMNS
    );

    let row = sqlx::query_as::<_, AccountRow>(&query)
      .bind(id.into_inner())
      .bind(Role::Seller.as_str())
      .fetch_one(&mut *tx)
      .await?;

    tx.commit()
      .await
      .map_err(|e| AuthError::Repository(RepositoryError::TransactionFailed(e.to_string())))?;

    Ok(Account::try_from(row)?)
  }
}
