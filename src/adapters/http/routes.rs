use actix_web::{error::JsonPayloadError, web};
use std::sync::Arc;

use crate::application::auth::{
  BecomeSellerUseCase, GetCurrentAccountUseCase, LoginAccountUseCase, RegisterAccountUseCase,
  RequestVerificationCodeUseCase, VerifyAccountUseCase,
};

use super::errors::ApiError;
use super::handlers::account::{
  become_seller_handler, login_handler, profile_handler, register_handler, request_code_handler,
  verify_code_handler,
};
use super::handlers::health_handler;
use super::middleware::AuthMiddleware;

/// Use cases backing the `/user` routes
#[derive(Clone)]
pub struct AccountRouteDependencies {
  pub register_use_case: Arc<RegisterAccountUseCase>,
  pub login_use_case: Arc<LoginAccountUseCase>,
  pub request_code_use_case: Arc<RequestVerificationCodeUseCase>,
  pub verify_use_case: Arc<VerifyAccountUseCase>,
  pub become_seller_use_case: Arc<BecomeSellerUseCase>,
  pub get_account_use_case: Arc<GetCurrentAccountUseCase>,
}

fn json_error_handler(err: JsonPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
  ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

/// Configure account routes
///
/// # Routes
///
/// - POST /user/register - Create a buyer account
/// - POST /user/login - Exchange credentials for a session token
/// - GET /verify - Text a verification code to the caller (auth)
/// - POST /verify - Submit a verification code (auth)
/// - GET /profile - Identity carried by the caller's token (auth)
/// - POST /become-seller - Join the seller program (auth)
/// - GET /health - Liveness probe
///
/// # Arguments
///
/// * `cfg` - Service config of the app being built
/// * `deps` - Use cases shared by every worker
///
/// # Example
///
/// ```ignore
/// HttpServer::new(move || {
///   App::new().configure(|cfg| configure_account_routes(cfg, deps.clone()))
/// })
/// ```
pub fn configure_account_routes(cfg: &mut web::ServiceConfig, deps: AccountRouteDependencies) {
  let auth = || AuthMiddleware::new(deps.get_account_use_case.clone());

  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::Data::new(deps.register_use_case.clone()))
    .app_data(web::Data::new(deps.login_use_case.clone()))
    .app_data(web::Data::new(deps.request_code_use_case.clone()))
    .app_data(web::Data::new(deps.verify_use_case.clone()))
    .app_data(web::Data::new(deps.become_seller_use_case.clone()));

  cfg.route("/health", web::get().to(health_handler));

  // Public routes
  cfg.service(
    web::scope("/user")
      .route("/register", web::post().to(register_handler))
      .route("/login", web::post().to(login_handler)),
  );

  // Authenticated routes
  cfg
    .service(
      web::resource("/verify")
        .wrap(auth())
        .route(web::get().to(request_code_handler))
        .route(web::post().to(verify_code_handler)),
    )
    .service(
      web::resource("/profile")
        .wrap(auth())
        .route(web::get().to(profile_handler)),
    )
    .service(
      web::resource("/become-seller")
        .wrap(auth())
        .route(web::post().to(become_seller_handler)),
    );
}
