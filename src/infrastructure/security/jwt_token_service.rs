use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::auth::entities::AuthenticatedAccount;
use crate::domain::auth::errors::{AuthError, ValidationError};
use crate::domain::auth::ports::TokenService;
use crate::domain::auth::value_objects::{AccountId, Role, SessionToken, VerificationCode};

/// Session tokens stay valid for 30 days after issue
const TOKEN_TTL_DAYS: i64 = 30;

const BEARER_SCHEME: &str = "Bearer";

/// Signed payload of a session token
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  user_id: Uuid,
  email: String,
  role: Role,
  iat: i64,
  exp: i64,
}

/// HS256 bearer tokens signed with a process-wide secret
pub struct JwtTokenService {
  encoding: EncodingKey,
  decoding: DecodingKey,
  validation: Validation,
}

impl JwtTokenService {
  /// # Errors
  /// Refuses an empty secret
  pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
    if secret.is_empty() {
      return Err(AuthError::Validation(ValidationError::MissingField {
        field: "security.jwt_secret".to_string(),
      }));
    }

    // Only HS256 is accepted; anything else in the header fails decoding
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    Ok(Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation,
    })
  }

  fn issue_at(
    &self,
    account_id: AccountId,
    email: &str,
    role: Role,
    issued_at: DateTime<Utc>,
  ) -> Result<SessionToken, AuthError> {
    if account_id.into_inner().is_nil() {
      return Err(AuthError::Validation(ValidationError::MissingField {
        field: "user_id".to_string(),
      }));
    }
    if email.is_empty() {
      return Err(AuthError::Validation(ValidationError::MissingField {
        field: "email".to_string(),
      }));
    }

    let claims = Claims {
      user_id: account_id.into_inner(),
      email: email.to_string(),
      role,
      iat: issued_at.timestamp(),
      exp: (issued_at + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map(SessionToken::new)
      .map_err(|e| AuthError::TokenSigning(e.to_string()))
  }

  fn decode(&self, token: &str) -> Result<Claims, AuthError> {
    let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
      .map(|data| data.claims)?;

    // Expiry is exclusive: a token is dead at exactly `exp`
    if Utc::now().timestamp() >= claims.exp {
      return Err(AuthError::TokenExpired);
    }

    if claims.user_id.is_nil() {
      return Err(AuthError::InvalidToken);
    }

    Ok(claims)
  }
}

/// Splits `Bearer <token>` on single spaces; exactly two parts are accepted
fn bearer_token(authorization: &str) -> Result<&str, AuthError> {
  let parts: Vec<&str> = authorization.split(' ').collect();

  if parts.len() != 2 {
    return Err(ValidationError::MalformedAuthorizationHeader.into());
  }

  if parts[0] != BEARER_SCHEME {
    return Err(ValidationError::UnsupportedAuthScheme.into());
  }

  Ok(parts[1])
}

impl TokenService for JwtTokenService {
  fn issue_token(
    &self,
    account_id: AccountId,
    email: &str,
    role: Role,
  ) -> Result<SessionToken, AuthError> {
    self.issue_at(account_id, email, role, Utc::now())
  }

  fn parse_and_verify(&self, authorization: &str) -> Result<AuthenticatedAccount, AuthError> {
    let token = bearer_token(authorization)?;
    let claims = self.decode(token)?;

    Ok(AuthenticatedAccount {
      id: AccountId::from_uuid(claims.user_id),
      email: claims.email,
      role: claims.role,
    })
  }

  /// Uniform over 100000..=999999 via rejection sampling on OS randomness
  fn generate_verification_code(&self) -> Result<VerificationCode, AuthError> {
    const SPAN: u32 = VerificationCode::MAX - VerificationCode::MIN + 1;
    const LIMIT: u32 = (u32::MAX / SPAN) * SPAN;

    let mut rng = OsRng;
    loop {
      let mut buf = [0u8; 4];
      rng
        .try_fill_bytes(&mut buf)
        .map_err(|e| AuthError::CodeGenerationFailed(e.to_string()))?;

      let value = u32::from_le_bytes(buf);
      if value < LIMIT {
        return Ok(VerificationCode::new(VerificationCode::MIN + value % SPAN)?);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  const SECRET: &[u8] = b"test-secret-with-enough-entropy";

  fn service() -> JwtTokenService {
    JwtTokenService::new(SECRET).unwrap()
  }

  fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
  }

  #[test]
  fn test_issue_and_verify() {
    let service = service();
    let id = AccountId::new();

    let token = service.issue_token(id, "a@x.com", Role::Seller).unwrap();
    let principal = service.parse_and_verify(&bearer(token.as_str())).unwrap();

    assert_eq!(
      principal,
      AuthenticatedAccount {
        id,
        email: "a@x.com".to_string(),
        role: Role::Seller,
      }
    );
  }

  #[test]
  fn test_incomplete_identity_is_not_signed() {
    let service = service();

    let nil = service.issue_token(AccountId::from_uuid(Uuid::nil()), "a@x.com", Role::Buyer);
    let no_email = service.issue_token(AccountId::new(), "", Role::Buyer);

    assert!(matches!(nil, Err(AuthError::Validation(_))));
    assert!(matches!(no_email, Err(AuthError::Validation(_))));
  }

  #[test]
  fn test_token_lifetime_is_thirty_days() {
    let service = service();
    let token = service
      .issue_token(AccountId::new(), "a@x.com", Role::Buyer)
      .unwrap();

    let claims = service.decode(token.as_str()).unwrap();

    assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
  }

  #[test]
  fn test_empty_secret_is_rejected() {
    assert!(JwtTokenService::new(b"").is_err());
  }

  #[test]
  fn test_header_shapes() {
    let service = service();
    let token = service
      .issue_token(AccountId::new(), "a@x.com", Role::Buyer)
      .unwrap();

    let missing_token = service.parse_and_verify("Bearer");
    let extra_part = service.parse_and_verify(&format!("Bearer {} extra", token.as_str()));
    let double_space = service.parse_and_verify(&format!("Bearer  {}", token.as_str()));
    let wrong_scheme = service.parse_and_verify(&format!("Basic {}", token.as_str()));
    let lowercase = service.parse_and_verify(&format!("bearer {}", token.as_str()));

    assert!(matches!(
      missing_token,
      Err(AuthError::Validation(ValidationError::MalformedAuthorizationHeader))
    ));
    assert!(matches!(
      extra_part,
      Err(AuthError::Validation(ValidationError::MalformedAuthorizationHeader))
    ));
    assert!(matches!(
      double_space,
      Err(AuthError::Validation(ValidationError::MalformedAuthorizationHeader))
    ));
    assert!(matches!(
      wrong_scheme,
      Err(AuthError::Validation(ValidationError::UnsupportedAuthScheme))
    ));
    assert!(matches!(
      lowercase,
      Err(AuthError::Validation(ValidationError::UnsupportedAuthScheme))
    ));
  }

  #[test]
  fn test_tampered_payload_is_rejected() {
    let service = service();
    let token = service
      .issue_token(AccountId::new(), "a@x.com", Role::Buyer)
      .unwrap();

    let mut parts: Vec<String> = token.as_str().split('.').map(String::from).collect();
    let payload = &mut parts[1];
    let flipped = if payload.starts_with('e') { "f" } else { "e" };
    payload.replace_range(0..1, flipped);
    let tampered = parts.join(".");

    let result = service.parse_and_verify(&bearer(&tampered));

    assert!(matches!(result, Err(AuthError::InvalidToken)));
  }

  #[test]
  fn test_foreign_secret_is_rejected() {
    let other = JwtTokenService::new(b"some-other-secret").unwrap();
    let token = other
      .issue_token(AccountId::new(), "a@x.com", Role::Buyer)
      .unwrap();

    let result = service().parse_and_verify(&bearer(token.as_str()));

    assert!(matches!(result, Err(AuthError::InvalidToken)));
  }

  #[test]
  fn test_other_algorithm_is_rejected() {
    let claims = Claims {
      user_id: Uuid::new_v4(),
      email: "a@x.com".to_string(),
      role: Role::Seller,
      iat: Utc::now().timestamp(),
      exp: (Utc::now() + Duration::days(1)).timestamp(),
    };
    let token = jsonwebtoken::encode(
      &Header::new(Algorithm::HS512),
      &claims,
      &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    let result = service().parse_and_verify(&bearer(&token));

    assert!(matches!(result, Err(AuthError::UnexpectedAlgorithm)));
  }

  #[test]
  fn test_expired_token_is_rejected() {
    let service = service();
    let token = service
      .issue_at(
        AccountId::new(),
        "a@x.com",
        Role::Buyer,
        Utc::now() - Duration::days(31),
      )
      .unwrap();

    let result = service.parse_and_verify(&bearer(token.as_str()));

    assert!(matches!(result, Err(AuthError::TokenExpired)));
  }

  #[test]
  fn test_missing_claims_are_rejected() {
    #[derive(Serialize)]
    struct Partial {
      user_id: Uuid,
      exp: i64,
    }

    let token = jsonwebtoken::encode(
      &Header::new(Algorithm::HS256),
      &Partial {
        user_id: Uuid::new_v4(),
        exp: (Utc::now() + Duration::days(1)).timestamp(),
      },
      &EncodingKey::from_secret(SECRET),
    )
    .unwrap();

    let result = service().parse_and_verify(&bearer(&token));

    assert!(matches!(result, Err(AuthError::InvalidToken)));
  }

  #[test]
  fn test_garbage_token_is_rejected() {
    let result = service().parse_and_verify("Bearer not.a.jwt");
    assert!(matches!(result, Err(AuthError::InvalidToken)));
  }

  #[test]
  fn test_verification_codes_are_six_digits() {
    let service = service();
    let mut seen = HashSet::new();

    for _ in 0..200 {
      let code = service.generate_verification_code().unwrap();
      assert!((100_000..=999_999).contains(&code.value()));
      assert_eq!(code.to_string().len(), 6);
      seen.insert(code.value());
    }

    // 200 draws from 900k values should be almost entirely distinct
    assert!(seen.len() > 190);
  }
}
