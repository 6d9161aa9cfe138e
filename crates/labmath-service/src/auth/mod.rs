//! Administrator authentication.
//!
//! ## Module Organization
//!
//! - `authenticate`: The `Authenticator` strategy and its static-credential implementation
//! - `depot`: Helpers for storing and reading the authenticated admin in a Salvo depot
//! - `password`: Password hashing and verification with Argon2
//! - `session`: In-memory login sessions keyed by an opaque cookie token

pub mod authenticate;
pub mod depot;
pub mod password;
pub mod session;

pub use authenticate::{
    AdminIdentity, Authenticator, StaticCredentialAuthenticator, authenticate_blocking,
};
pub use depot::{get_authenticator_from_depot, get_identity_from_depot, get_sessions_from_depot};
pub use session::SessionStore;
