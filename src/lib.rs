//! Agora account & identity core
//!
//! Registration, login, phone verification by SMS and seller onboarding for
//! a marketplace, laid out as domain / application / infrastructure /
//! adapters.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_support;
