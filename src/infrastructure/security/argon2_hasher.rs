use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

/// Argon2id password hasher
///
/// Parameters: 19 MiB memory, 2 iterations, 1 lane, 32 byte output.
/// Every hash gets its own random salt, embedded in the PHC string.
///
/// Hashing and verification are CPU and memory heavy, so both run on
/// tokio's blocking pool instead of the async worker that awaits them.
///
/// # Example
///
/// ```ignore
/// let hasher = Argon2PasswordHasher::new()?;
/// let hash = hasher.hash(&Password::new("secret1")?).await?;
/// hasher.verify(&Password::new("secret1")?, &hash).await?;
/// ```
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  const MEMORY_COST_KIB: u32 = 19456;
  const TIME_COST: u32 = 2;
  const PARALLELISM: u32 = 1;
  const OUTPUT_LEN: usize = 32;

  /// Creates a hasher with the fixed Argon2id parameters
  ///
  /// # Returns
  /// `AuthError::Hash` if the parameter set is rejected by the argon2 crate
  pub fn new() -> Result<Self, AuthError> {
    let params = Params::new(
      Self::MEMORY_COST_KIB,
      Self::TIME_COST,
      Self::PARALLELISM,
      Some(Self::OUTPUT_LEN),
    )
    .map_err(|e| {
      AuthError::Hash(HashError::HashingFailed(format!(
        "Failed to create Argon2 params: {}",
        e
      )))
    })?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    Ok(Self { argon2 })
  }

  fn hash_blocking(argon2: &Argon2<'_>, password: &[u8]) -> Result<PasswordHash, AuthError> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);

    let hash = argon2
      .hash_password(password, &salt)
      .map_err(|e| AuthError::Hash(HashError::HashingFailed(e.to_string())))?;

    PasswordHash::from_hash(hash.to_string()).map_err(|_| AuthError::Hash(HashError::InvalidFormat))
  }

  /// Constant-time comparison happens inside `verify_password`
  fn verify_blocking(argon2: &Argon2<'_>, password: &[u8], hashed: &str) -> Result<(), AuthError> {
    let parsed_hash =
      Argon2PasswordHash::new(hashed).map_err(|_| AuthError::Hash(HashError::InvalidFormat))?;

    match argon2.verify_password(password, &parsed_hash) {
      Ok(()) => Ok(()),
      Err(argon2::password_hash::Error::Password) => Err(AuthError::InvalidPassword),
      Err(e) => Err(AuthError::Hash(HashError::VerificationFailed(e.to_string()))),
    }
  }
}

fn join_error(error: tokio::task::JoinError) -> AuthError {
  AuthError::Hash(HashError::HashingFailed(format!(
    "Hashing task failed: {}",
    error
  )))
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  /// Hashes a plain text password using Argon2id with a fresh salt
  ///
  /// # Arguments
  /// * `password` - The password to hash
  ///
  /// # Returns
  /// * `Ok(PasswordHash)` - PHC string embedding parameters and salt
  /// * `Err(AuthError)` - If hashing fails or the blocking task dies
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let argon2 = self.argon2.clone();
    let password = Zeroizing::new(password.as_str().as_bytes().to_vec());

    tokio::task::spawn_blocking(move || Self::hash_blocking(&argon2, &password))
      .await
      .map_err(join_error)?
  }

  /// Verifies a plain text password against a stored hash
  ///
  /// # Arguments
  /// * `password` - The plain text password to verify
  /// * `hashed_password` - The PHC string to verify against
  ///
  /// # Returns
  /// * `Ok(())` - If the password matches
  /// * `Err(AuthError::InvalidPassword)` - If it does not
  /// * `Err(AuthError::Hash)` - If the stored hash is malformed
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<(), AuthError> {
    let argon2 = self.argon2.clone();
    let password = Zeroizing::new(password.as_str().as_bytes().to_vec());
    let hashed = hashed_password.as_str().to_string();

    tokio::task::spawn_blocking(move || Self::verify_blocking(&argon2, &password, &hashed))
      .await
      .map_err(join_error)?
  }
}
