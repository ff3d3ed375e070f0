use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{
    BecomeSellerRequest, LoginRequest, ProfileResponse, RegisterRequest, SuccessResponse,
    TokenResponse, VerifyCodeRequest,
  },
  errors::ApiError,
  middleware::AuthUser,
};
use crate::application::auth::{
  BecomeSellerCommand, BecomeSellerUseCase, LoginAccountCommand, LoginAccountUseCase,
  RegisterAccountCommand, RegisterAccountUseCase, RequestVerificationCodeUseCase,
  VerifyAccountCommand, VerifyAccountUseCase,
};

/// Handler for account registration
///
/// POST /user/register
/// Body: RegisterRequest (JSON)
/// Response: TokenResponse (JSON) with status 201
pub async fn register_handler(
  request: web::Json<RegisterRequest>,
  use_case: web::Data<Arc<RegisterAccountUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let response = use_case
    .execute(RegisterAccountCommand {
      email: request.email,
      password: request.password,
      phone: request.phone,
    })
    .await?;

  Ok(HttpResponse::Created().json(TokenResponse {
    message: "Account created".to_string(),
    token: response.token,
  }))
}

/// Handler for login
///
/// POST /user/login
/// Body: LoginRequest (JSON)
/// Response: TokenResponse (JSON)
pub async fn login_handler(
  request: web::Json<LoginRequest>,
  use_case: web::Data<Arc<LoginAccountUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let request = request.into_inner();
  let response = use_case
    .execute(LoginAccountCommand {
      email: request.email,
      password: request.password,
    })
    .await?;

  Ok(HttpResponse::Ok().json(TokenResponse {
    message: "Login successful".to_string(),
    token: response.token,
  }))
}

/// Handler for requesting a verification code by SMS
///
/// GET /verify (authenticated)
pub async fn request_code_handler(
  req: HttpRequest,
  use_case: web::Data<Arc<RequestVerificationCodeUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let account = req.authenticated_account()?;

  use_case.execute(account.id).await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Verification code sent".to_string(),
  }))
}

/// Handler for submitting a verification code
///
/// POST /verify (authenticated)
/// Body: VerifyCodeRequest (JSON)
pub async fn verify_code_handler(
  req: HttpRequest,
  request: web::Json<VerifyCodeRequest>,
  use_case: web::Data<Arc<VerifyAccountUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let account = req.authenticated_account()?;

  use_case
    .execute(VerifyAccountCommand {
      account_id: account.id,
      code: request.code,
    })
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Account verified".to_string(),
  }))
}

/// Handler for the caller's identity as carried by the token
///
/// GET /profile (authenticated)
pub async fn profile_handler(req: HttpRequest) -> Result<HttpResponse, ApiError> {
  let account = req.authenticated_account()?;

  Ok(HttpResponse::Ok().json(ProfileResponse {
    id: account.id.into_inner(),
    email: account.email,
    role: account.role,
  }))
}

/// Handler for joining the seller program
///
/// POST /become-seller (authenticated)
/// Body: BecomeSellerRequest (JSON)
/// Response: TokenResponse (JSON) carrying the seller role
pub async fn become_seller_handler(
  req: HttpRequest,
  request: web::Json<BecomeSellerRequest>,
  use_case: web::Data<Arc<BecomeSellerUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let account = req.authenticated_account()?;

  let request = request.into_inner();
  let response = use_case
    .execute(BecomeSellerCommand {
      account_id: account.id,
      bank_account_number: request.bank_account_number,
      swift_code: request.swift_code,
      payment_type: request.payment_type,
    })
    .await?;

  Ok(HttpResponse::Ok().json(TokenResponse {
    message: "Welcome to the seller program".to_string(),
    token: response.token,
  }))
}
