//! Request extractors for authentication and role checks

pub mod auth;

pub use auth::{AdminUser, AuthUser, GuideUser, MaybeAuthUser, TouristUser};
