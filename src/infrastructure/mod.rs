//! Infrastructure layer
//!
//! Adapters for the domain ports: storage, password hashing, token signing
//! and SMS delivery, plus configuration loading.

pub mod config;
pub mod notifications;
pub mod persistence;
pub mod security;
