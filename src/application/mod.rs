//! Application layer
//!
//! Use cases that orchestrate domain services into the workflows exposed
//! over HTTP.

pub mod auth;
