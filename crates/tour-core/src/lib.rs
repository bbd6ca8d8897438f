//! # Tour Core
//!
//! Domain entities, services, and repository traits for the tour booking application.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod notifications;
pub mod cart;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
