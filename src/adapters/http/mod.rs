pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{
  BecomeSellerRequest, ErrorResponse, LoginRequest, ProfileResponse, RegisterRequest,
  SuccessResponse, TokenResponse, VerifyCodeRequest,
};
pub use errors::{ApiError, AuthErrorKind};
pub use middleware::{AuthMiddleware, AuthUser};
pub use routes::{AccountRouteDependencies, configure_account_routes};
