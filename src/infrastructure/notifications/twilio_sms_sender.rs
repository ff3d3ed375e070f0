use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::SmsSender;
use crate::domain::auth::value_objects::PhoneNumber;

const REQUEST_TIMEOUT_SECONDS: u64 = 10;

/// Subset of the Twilio message resource we care about
#[derive(Debug, Deserialize)]
struct MessageResource {
  sid: String,
}

/// SMS delivery through the Twilio Messages REST API
pub struct TwilioSmsSender {
  client: Client,
  account_sid: String,
  auth_token: String,
  from_number: String,
  messages_url: String,
}

impl TwilioSmsSender {
  /// Creates a sender bound to one Twilio account and sending number
  ///
  /// # Arguments
  ///
  /// * `base_url` - API origin, `https://api.twilio.com` outside tests
  /// * `account_sid` - Account SID, also the basic auth user
  /// * `auth_token` - Basic auth password
  /// * `from_number` - Twilio number messages are sent from
  ///
  /// # Returns
  ///
  /// `AuthError::SmsDeliveryFailed` if the HTTP client cannot be built
  pub fn new(
    base_url: &str,
    account_sid: &str,
    auth_token: &str,
    from_number: &str,
  ) -> Result<Self, AuthError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
      .build()
      .map_err(|e| AuthError::SmsDeliveryFailed(format!("Failed to build HTTP client: {}", e)))?;

    Ok(Self {
      client,
      account_sid: account_sid.to_string(),
      auth_token: auth_token.to_string(),
      from_number: from_number.to_string(),
      messages_url: format!(
        "{}/2010-04-01/Accounts/{}/Messages.json",
        base_url.trim_end_matches('/'),
        account_sid
      ),
    })
  }
}

#[async_trait]
impl SmsSender for TwilioSmsSender {
  async fn send(&self, to: &PhoneNumber, message: &str) -> Result<(), AuthError> {
    let response = self
      .client
      .post(&self.messages_url)
      .basic_auth(&self.account_sid, Some(&self.auth_token))
      .form(&[
        ("To", to.as_str()),
        ("From", self.from_number.as_str()),
        ("Body", message),
      ])
      .send()
      .await
      .map_err(|e| AuthError::SmsDeliveryFailed(format!("Request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(AuthError::SmsDeliveryFailed(format!(
        "Carrier responded with status {}: {}",
        status, body
      )));
    }

    match response.json::<MessageResource>().await {
      Ok(resource) => tracing::debug!(message_sid = %resource.sid, "sms accepted by carrier"),
      Err(e) => tracing::debug!(error = %e, "sms accepted, response body unreadable"),
    }

    Ok(())
  }
}
