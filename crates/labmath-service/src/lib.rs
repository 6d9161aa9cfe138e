pub mod auth;
pub mod content;
pub mod error;
pub mod mirror;
pub mod sync;
