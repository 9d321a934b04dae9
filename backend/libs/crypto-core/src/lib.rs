//! Shared crypto primitives for Post Desk services.
//!
//! - `jwt`: signing keys and typed claims for phone tokens and dashboard sessions
//! - `password`: password hashing and verification
//! - `hash`: plain SHA-256 digests
pub mod hash;
pub mod jwt;
pub mod password;

pub use jwt::{IssuedToken, JwtKeys, PhoneClaims, SessionClaims, PHONE_TOKEN_EXPIRY_SECONDS};
pub use password::{hash_password, verify_password};
