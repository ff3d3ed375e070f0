use thiserror::Error;

/// Coarse failure category, used by callers to pick a response without
/// matching on every variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Validation,
  Authentication,
  Conflict,
  NotFound,
  Dependency,
}

/// Main authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("Invalid credentials provided")]
  InvalidCredentials,

  #[error("User not found")]
  UserNotFound,

  #[error("Wrong password")]
  WrongPassword,

  #[error("Invalid password")]
  InvalidPassword,

  #[error("Email already exists")]
  EmailAlreadyExists,

  #[error("Account not found")]
  AccountNotFound,

  #[error("Invalid token")]
  InvalidToken,

  #[error("Unexpected token signing algorithm")]
  UnexpectedAlgorithm,

  #[error("Token expired")]
  TokenExpired,

  #[error("Failed to sign token: {0}")]
  TokenSigning(String),

  #[error("Account is already verified")]
  AlreadyVerified,

  #[error("Invalid verification code")]
  InvalidCode,

  #[error("Verification code expired")]
  CodeExpired,

  #[error("Failed to generate verification code: {0}")]
  CodeGenerationFailed(String),

  #[error("Unable to send verification code: {0}")]
  SmsDeliveryFailed(String),

  #[error("Account has already joined the seller program")]
  AlreadySeller,

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Validation error: {0}")]
  Validation(#[from] ValidationError),
}

impl AuthError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      AuthError::Validation(_) => ErrorKind::Validation,
      AuthError::InvalidCredentials
      | AuthError::WrongPassword
      | AuthError::InvalidPassword
      | AuthError::InvalidToken
      | AuthError::UnexpectedAlgorithm
      | AuthError::TokenExpired
      | AuthError::InvalidCode
      | AuthError::CodeExpired => ErrorKind::Authentication,
      AuthError::EmailAlreadyExists | AuthError::AlreadyVerified | AuthError::AlreadySeller => {
        ErrorKind::Conflict
      }
      AuthError::UserNotFound | AuthError::AccountNotFound => ErrorKind::NotFound,
      AuthError::Repository(RepositoryError::NotFound) => ErrorKind::NotFound,
      AuthError::Repository(RepositoryError::DuplicateKey(_)) => ErrorKind::Conflict,
      AuthError::Repository(_)
      | AuthError::Hash(_)
      | AuthError::TokenSigning(_)
      | AuthError::CodeGenerationFailed(_)
      | AuthError::SmsDeliveryFailed(_) => ErrorKind::Dependency,
    }
  }
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Transaction failed: {0}")]
  TransactionFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Corrupt record: {0}")]
  CorruptRecord(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),

  #[error("Invalid hash format")]
  InvalidFormat,
}

/// Input validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("Invalid email format")]
  InvalidEmail,

  #[error("Password must be at least {min} characters long")]
  PasswordTooShort { min: usize },

  #[error("Password too long, maximum {max} characters allowed")]
  PasswordTooLong { max: usize },

  #[error("Invalid phone number")]
  InvalidPhoneNumber,

  #[error("Invalid role: {0}")]
  InvalidRole(String),

  #[error("Verification code must be a 6-digit number")]
  InvalidVerificationCode,

  #[error("Bank account number must be 6 to 34 digits")]
  InvalidBankAccountNumber,

  #[error("SWIFT code must be 8 or 11 alphanumeric characters")]
  InvalidSwiftCode,

  #[error("Authorization header must have the form 'Bearer <token>'")]
  MalformedAuthorizationHeader,

  #[error("Unsupported authorization scheme")]
  UnsupportedAuthScheme,

  #[error("Invalid field: {field}")]
  InvalidField { field: String },

  #[error("Missing required field: {field}")]
  MissingField { field: String },
}

// Automatic conversions from external error types

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
  fn from(error: jsonwebtoken::errors::Error) -> Self {
    use jsonwebtoken::errors::ErrorKind as JwtErrorKind;

    match error.kind() {
      JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
      JwtErrorKind::InvalidAlgorithm => AuthError::UnexpectedAlgorithm,
      _ => AuthError::InvalidToken,
    }
  }
}
