//! # Tour Security
//!
//! Security utilities: JWT access tokens with role claims, password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtError, JwtService};
pub use password::{PasswordError, PasswordService};
