use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::SmsSender;
use crate::domain::auth::value_objects::PhoneNumber;

/// A message captured by `MockSmsSender`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
  pub to: String,
  pub body: String,
}

/// Development SMS sender: logs messages instead of sending them
///
/// Messages are kept in memory so tests can read back the codes.
#[derive(Default)]
pub struct MockSmsSender {
  sent: Mutex<Vec<SentSms>>,
}

impl MockSmsSender {
  pub fn new() -> Self {
    Self::default()
  }

  /// Messages sent so far, oldest first
  pub fn sent(&self) -> Vec<SentSms> {
    match self.sent.lock() {
      Ok(sent) => sent.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }
}

#[async_trait]
impl SmsSender for MockSmsSender {
  async fn send(&self, to: &PhoneNumber, message: &str) -> Result<(), AuthError> {
    tracing::info!(to = %to, "mock sms: {}", message);

    self
      .sent
      .lock()
      .map_err(|_| AuthError::SmsDeliveryFailed("mock outbox poisoned".to_string()))?
      .push(SentSms {
        to: to.as_str().to_string(),
        body: message.to_string(),
      });

    Ok(())
  }
}
