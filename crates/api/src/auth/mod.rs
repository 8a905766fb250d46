//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification, and strength policy.
//! - [`jwt`] -- Access/refresh JWT generation and validation, refresh-token hashing.

pub mod jwt;
pub mod password;
