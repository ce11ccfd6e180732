//! Core business logic for yamdb-rs.

pub mod services;

pub use services::*;
