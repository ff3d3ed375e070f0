use actix_web::{
  Error, HttpMessage, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::AUTHORIZATION,
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
  sync::Arc,
};

use crate::{
  adapters::http::errors::{ApiError, AuthErrorKind},
  application::auth::GetCurrentAccountUseCase,
  domain::auth::entities::AuthenticatedAccount,
};

/// Authentication middleware that verifies bearer tokens and attaches the caller to the request
///
/// The raw `Authorization` value is handed to `GetCurrentAccountUseCase`
/// untouched, so header parsing lives in one place. On success the
/// `AuthenticatedAccount` is stored in request extensions; on failure the
/// request is answered with the mapped `ApiError` and never reaches the handler.
///
/// # Example
///
/// ```ignore
/// use actix_web::web;
///
/// let auth = AuthMiddleware::new(get_account_use_case.clone());
/// cfg.service(
///   web::resource("/profile")
///     .wrap(auth)
///     .route(web::get().to(profile_handler)),
/// );
/// ```
pub struct AuthMiddleware {
  get_account_use_case: Arc<GetCurrentAccountUseCase>,
}

impl AuthMiddleware {
  /// Creates a new authentication middleware
  ///
  /// # Arguments
  ///
  /// * `get_account_use_case` - Use case resolving an `Authorization` header to the caller
  pub fn new(get_account_use_case: Arc<GetCurrentAccountUseCase>) -> Self {
    Self {
      get_account_use_case,
    }
  }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = AuthMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(AuthMiddlewareService {
      service: Rc::new(service),
      get_account_use_case: self.get_account_use_case.clone(),
    }))
  }
}

pub struct AuthMiddlewareService<S> {
  service: Rc<S>,
  get_account_use_case: Arc<GetCurrentAccountUseCase>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);
    let get_account_use_case = self.get_account_use_case.clone();

    Box::pin(async move {
      let account = match authorization_header(&req)
        .and_then(|header| get_account_use_case.execute(&header).map_err(ApiError::from))
      {
        Ok(account) => account,
        Err(e) => {
          tracing::debug!(path = %req.path(), error = %e, "request rejected by auth middleware");
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(account);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

/// Raw `Authorization` header value
fn authorization_header(req: &ServiceRequest) -> Result<String, ApiError> {
  req
    .headers()
    .get(AUTHORIZATION)
    .and_then(|h| h.to_str().ok())
    .map(|s| s.to_string())
    .ok_or(ApiError::Auth(AuthErrorKind::InvalidToken))
}

/// Extension trait to extract the authenticated account from a request
///
/// # Example
///
/// ```ignore
/// async fn handler(req: HttpRequest) -> Result<HttpResponse, ApiError> {
///   let account = req.authenticated_account()?;
///   Ok(HttpResponse::Ok().body(account.email))
/// }
/// ```
pub trait AuthUser {
  /// Returns the caller stored by `AuthMiddleware`
  ///
  /// # Returns
  /// * `Ok(AuthenticatedAccount)` - The verified caller
  /// * `Err(ApiError::Internal)` - If `AuthMiddleware` did not run for this route
  fn authenticated_account(&self) -> Result<AuthenticatedAccount, ApiError>;
}

impl AuthUser for actix_web::HttpRequest {
  fn authenticated_account(&self) -> Result<AuthenticatedAccount, ApiError> {
    self
      .extensions()
      .get::<AuthenticatedAccount>()
      .cloned()
      .ok_or_else(|| {
        ApiError::Internal("Authenticated account missing from request extensions".to_string())
      })
  }
}
