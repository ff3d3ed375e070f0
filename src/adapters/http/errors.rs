use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::errors::{AuthError, RepositoryError, ValidationError};

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Validation error (400 Bad Request)
  Validation(String),

  /// Authentication or account-state error (401, 404 or 409)
  Auth(AuthErrorKind),

  /// A downstream service failed (502 Bad Gateway)
  Upstream(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

/// Authentication error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
  /// Unknown email or wrong password, indistinguishable (401)
  InvalidCredentials,

  /// Wrong password, when login errors are not uniform (401)
  WrongPassword,

  /// Unknown email, when login errors are not uniform (404)
  UserNotFound,

  /// Missing or malformed Authorization header (401)
  InvalidAuthorizationHeader,

  /// Token failed verification (401)
  InvalidToken,

  /// Token past its expiry (401)
  TokenExpired,

  /// Email already exists (409)
  EmailAlreadyExists,

  /// Account referenced by a valid token no longer exists (404)
  AccountNotFound,

  /// Account is already verified (409)
  AlreadyVerified,

  /// Submitted code does not match (401)
  InvalidCode,

  /// Submitted code matched too late (401)
  CodeExpired,

  /// Account already joined the seller program (409)
  AlreadySeller,

  /// Bank account number already registered (409)
  BankAccountTaken,
}

impl AuthErrorKind {
  fn status_code(self) -> StatusCode {
    match self {
      AuthErrorKind::InvalidCredentials
      | AuthErrorKind::WrongPassword
      | AuthErrorKind::InvalidAuthorizationHeader
      | AuthErrorKind::InvalidToken
      | AuthErrorKind::TokenExpired
      | AuthErrorKind::InvalidCode
      | AuthErrorKind::CodeExpired => StatusCode::UNAUTHORIZED,
      AuthErrorKind::UserNotFound | AuthErrorKind::AccountNotFound => StatusCode::NOT_FOUND,
      AuthErrorKind::EmailAlreadyExists
      | AuthErrorKind::AlreadyVerified
      | AuthErrorKind::AlreadySeller
      | AuthErrorKind::BankAccountTaken => StatusCode::CONFLICT,
    }
  }

  fn code_and_message(self) -> (&'static str, &'static str) {
    match self {
      AuthErrorKind::InvalidCredentials => ("invalid_credentials", "Invalid email or password"),
      AuthErrorKind::WrongPassword => ("wrong_password", "Wrong password"),
      AuthErrorKind::UserNotFound => ("user_not_found", "User not found"),
      AuthErrorKind::InvalidAuthorizationHeader => (
        "invalid_authorization_header",
        "Authorization header must have the form 'Bearer <token>'",
      ),
      AuthErrorKind::InvalidToken => ("invalid_token", "Invalid or missing authorization token"),
      AuthErrorKind::TokenExpired => ("token_expired", "Session token has expired"),
      AuthErrorKind::EmailAlreadyExists => (
        "email_already_exists",
        "An account with this email already exists",
      ),
      AuthErrorKind::AccountNotFound => ("account_not_found", "Account not found"),
      AuthErrorKind::AlreadyVerified => ("already_verified", "Account is already verified"),
      AuthErrorKind::InvalidCode => ("invalid_code", "Invalid verification code"),
      AuthErrorKind::CodeExpired => ("code_expired", "Verification code has expired"),
      AuthErrorKind::AlreadySeller => (
        "already_seller",
        "Account has already joined the seller program",
      ),
      AuthErrorKind::BankAccountTaken => (
        "bank_account_taken",
        "This bank account is already registered",
      ),
    }
  }
}

impl ApiError {
  /// JSON body for this error; internal details are logged, never returned
  pub fn to_error_response(&self) -> ErrorResponse {
    let (error, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::Auth(kind) => {
        let (code, message) = kind.code_and_message();
        (code, message.to_string())
      }
      ApiError::Upstream(msg) => {
        tracing::error!("Upstream error: {}", msg);
        (
          "sms_delivery_failed",
          "Unable to send verification code".to_string(),
        )
      }
      ApiError::Internal(msg) => {
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    ErrorResponse {
      error: error.to_string(),
      message,
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Auth(kind) => write!(f, "Authentication error: {:?}", kind),
      ApiError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Auth(kind) => kind.status_code(),
      ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(self.to_error_response())
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::InvalidCredentials => ApiError::Auth(AuthErrorKind::InvalidCredentials),
      AuthError::WrongPassword | AuthError::InvalidPassword => {
        ApiError::Auth(AuthErrorKind::WrongPassword)
      }
      AuthError::UserNotFound => ApiError::Auth(AuthErrorKind::UserNotFound),
      AuthError::EmailAlreadyExists => ApiError::Auth(AuthErrorKind::EmailAlreadyExists),
      AuthError::AccountNotFound => ApiError::Auth(AuthErrorKind::AccountNotFound),
      AuthError::InvalidToken | AuthError::UnexpectedAlgorithm => {
        ApiError::Auth(AuthErrorKind::InvalidToken)
      }
      AuthError::TokenExpired => ApiError::Auth(AuthErrorKind::TokenExpired),
      AuthError::AlreadyVerified => ApiError::Auth(AuthErrorKind::AlreadyVerified),
      AuthError::InvalidCode => ApiError::Auth(AuthErrorKind::InvalidCode),
      AuthError::CodeExpired => ApiError::Auth(AuthErrorKind::CodeExpired),
      AuthError::AlreadySeller => ApiError::Auth(AuthErrorKind::AlreadySeller),
      AuthError::Validation(
        ValidationError::MalformedAuthorizationHeader | ValidationError::UnsupportedAuthScheme,
      ) => ApiError::Auth(AuthErrorKind::InvalidAuthorizationHeader),
      AuthError::Validation(err) => ApiError::Validation(err.to_string()),
      AuthError::SmsDeliveryFailed(msg) => ApiError::Upstream(msg),
      AuthError::Repository(err) => match err {
        RepositoryError::NotFound => ApiError::Auth(AuthErrorKind::AccountNotFound),
        // email conflicts are reported by the service itself
        RepositoryError::DuplicateKey(_) => ApiError::Auth(AuthErrorKind::BankAccountTaken),
        _ => ApiError::Internal(err.to_string()),
      },
      AuthError::Hash(err) => ApiError::Internal(err.to_string()),
      AuthError::TokenSigning(msg) | AuthError::CodeGenerationFailed(msg) => {
        ApiError::Internal(msg)
      }
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages: Vec<String> = errors
      .field_errors()
      .iter()
      .flat_map(|(field, errors)| {
        errors
          .iter()
          .map(|error| {
            error
              .message
              .as_ref()
              .map(|m| m.to_string())
              .unwrap_or_else(|| format!("Invalid field: {}", field))
          })
          .collect::<Vec<_>>()
      })
      .collect();
    messages.sort();

    ApiError::Validation(messages.join(", "))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::Validation("test".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::InvalidCredentials).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Auth(AuthErrorKind::AlreadySeller).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Upstream("carrier down".to_string()).status_code(),
      StatusCode::BAD_GATEWAY
    );
    assert_eq!(
      ApiError::Internal("test".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_auth_error_conversion() {
    let cases = [
      (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
      (AuthError::UserNotFound, StatusCode::NOT_FOUND),
      (AuthError::EmailAlreadyExists, StatusCode::CONFLICT),
      (AuthError::UnexpectedAlgorithm, StatusCode::UNAUTHORIZED),
      (AuthError::TokenExpired, StatusCode::UNAUTHORIZED),
      (AuthError::AlreadyVerified, StatusCode::CONFLICT),
      (AuthError::CodeExpired, StatusCode::UNAUTHORIZED),
      (
        AuthError::Validation(ValidationError::PasswordTooShort { min: 6 }),
        StatusCode::BAD_REQUEST,
      ),
      (
        AuthError::Validation(ValidationError::UnsupportedAuthScheme),
        StatusCode::UNAUTHORIZED,
      ),
      (
        AuthError::SmsDeliveryFailed("timeout".to_string()),
        StatusCode::BAD_GATEWAY,
      ),
      (
        AuthError::CodeGenerationFailed("no entropy".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR,
      ),
    ];

    for (error, status) in cases {
      let rendered = error.to_string();
      assert_eq!(ApiError::from(error).status_code(), status, "{}", rendered);
    }
  }

  #[test]
  fn test_internal_details_are_not_exposed() {
    let error = ApiError::from(AuthError::Repository(RepositoryError::QueryFailed(
      "relation accounts does not exist".to_string(),
    )));

    let body = error.to_error_response();

    assert_eq!(body.error, "internal_error");
    assert!(!body.message.contains("accounts"));
  }
}
