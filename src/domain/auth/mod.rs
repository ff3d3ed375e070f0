pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;
pub mod verification;

// Re-export commonly used types
pub use entities::{Account, AccountChanges, AuthenticatedAccount, BankAccount, BankDetails};
pub use errors::{AuthError, ErrorKind, HashError, RepositoryError, ValidationError};
pub use services::{AuthService, AuthServiceConfig};
pub use value_objects::{
  AccountId, BankAccountNumber, Email, Password, PasswordHash, PaymentType, PhoneNumber, Role,
  SessionToken, SwiftCode, VerificationCode,
};
pub use verification::VerificationService;
