use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::auth::value_objects::Role;

/// Request body for account registration
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(
    min = 6,
    max = 128,
    message = "Password must be between 6 and 128 characters"
  ))]
  pub password: String,

  #[validate(length(min = 1, max = 32, message = "Phone number is required"))]
  pub phone: String,
}

/// Request body for login
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
  #[validate(email(message = "Invalid email format"))]
  pub email: String,

  #[validate(length(min = 1, message = "Password is required"))]
  pub password: String,
}

/// Request body for submitting a verification code
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyCodeRequest {
  pub code: u32,
}

/// Request body for joining the seller program
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BecomeSellerRequest {
  #[validate(length(min = 1, message = "Bank account number is required"))]
  pub bank_account_number: String,

  #[validate(length(min = 1, message = "SWIFT code is required"))]
  pub swift_code: String,

  #[validate(length(min = 1, max = 64, message = "Payment type is required"))]
  pub payment_type: String,
}

/// Response carrying a freshly issued session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
  pub message: String,
  pub token: String,
}

/// Identity of the authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
  pub id: Uuid,
  pub email: String,
  pub role: Role,
}

/// Generic success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
  pub message: String,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  /// Stable machine-readable code, e.g. `invalid_credentials`
  pub error: String,
  pub message: String,
}
