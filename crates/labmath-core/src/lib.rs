//! Shared configuration, constants, errors and record-kind types for the
//! labmath admin backend.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod util;
