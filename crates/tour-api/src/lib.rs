//! # Tour API
//!
//! HTTP handlers, auth extractors, DTOs, and the axum router.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
