//! Shared wiring for unit tests: real hasher and token service over the
//! in-memory repository and a recording SMS sender.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::auth::{
  AuthError, AuthService, AuthServiceConfig, PhoneNumber, VerificationService,
  ports::{SmsSender, TokenService},
};
use crate::infrastructure::{
  notifications::MockSmsSender,
  persistence::memory::InMemoryAccountRepository,
  security::{Argon2PasswordHasher, JwtTokenService},
};

pub const TEST_SECRET: &[u8] = b"unit-test-secret";

pub struct TestContext {
  pub account_repo: Arc<InMemoryAccountRepository>,
  pub token_service: Arc<dyn TokenService>,
  pub sms_sender: Arc<MockSmsSender>,
  pub auth_service: Arc<AuthService>,
  pub verification_service: Arc<VerificationService>,
}

impl TestContext {
  pub fn new() -> Self {
    Self::with_config(AuthServiceConfig::default())
  }

  pub fn with_config(config: AuthServiceConfig) -> Self {
    let account_repo = Arc::new(InMemoryAccountRepository::new());
    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(TEST_SECRET).unwrap());
    let sms_sender = Arc::new(MockSmsSender::new());

    let auth_service = Arc::new(AuthService::new(
      account_repo.clone(),
      Arc::new(Argon2PasswordHasher::new().unwrap()),
      token_service.clone(),
      config,
    ));
    let verification_service = Arc::new(VerificationService::new(
      account_repo.clone(),
      token_service.clone(),
      sms_sender.clone(),
    ));

    Self {
      account_repo,
      token_service,
      sms_sender,
      auth_service,
      verification_service,
    }
  }
}

/// SMS sender whose carrier always refuses
pub struct FailingSmsSender;

#[async_trait]
impl SmsSender for FailingSmsSender {
  async fn send(&self, _to: &PhoneNumber, _message: &str) -> Result<(), AuthError> {
    Err(AuthError::SmsDeliveryFailed("carrier unavailable".to_string()))
  }
}
