//! Account use cases
//!
//! Thin orchestration over `AuthService` and `VerificationService`: parse raw
//! input into value objects, call the domain, shape the response.

mod become_seller;
mod get_current_account;
mod login_account;
mod register_account;
mod request_verification_code;
mod verify_account;

pub use become_seller::{BecomeSellerCommand, BecomeSellerResponse, BecomeSellerUseCase};
pub use get_current_account::GetCurrentAccountUseCase;
pub use login_account::{LoginAccountCommand, LoginAccountResponse, LoginAccountUseCase};
pub use register_account::{
  RegisterAccountCommand, RegisterAccountResponse, RegisterAccountUseCase,
};
pub use request_verification_code::RequestVerificationCodeUseCase;
pub use verify_account::{VerifyAccountCommand, VerifyAccountUseCase};
