// ============================================================================
// Tour API - Authentication Extractors
// File: crates/tour-api/src/middleware/auth.rs
// ============================================================================
//! Bearer token extraction. Handlers state the role they need through the
//! extractor type they accept.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use tour_security::{JwtError, JwtService};
use tour_shared::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity taken from a valid access token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(jwt: &JwtService, token: &str) -> Result<AuthUser, ApiError> {
    let claims = jwt.validate_token(token).map_err(|e| match e {
        JwtError::TokenExpired => ApiError::Unauthorized("Access token has expired.".to_string()),
        _ => ApiError::Unauthorized("Invalid access token.".to_string()),
    })?;

    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::Unauthorized("Invalid access token.".to_string()))?;
    let role = claims
        .role()
        .map_err(|_| ApiError::Unauthorized("Invalid access token.".to_string()))?;

    Ok(AuthUser {
        user_id,
        username: claims.username,
        role,
    })
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required.".to_string()))?;
        authenticate(&state.jwt, token)
    }
}

/// Identity when a valid token is present; anonymous otherwise
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(MaybeAuthUser(
            bearer_token(parts).and_then(|token| authenticate(&state.jwt, token).ok()),
        ))
    }
}

macro_rules! role_extractor {
    ($(#[$meta:meta])* $name:ident, $role:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(pub AuthUser);

        impl<S> FromRequestParts<S> for $name
        where
            AppState: FromRef<S>,
            S: Send + Sync,
        {
            type Rejection = ApiError;

            async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
                let user = AuthUser::from_request_parts(parts, state).await?;
                if user.role != $role {
                    return Err(ApiError::Forbidden(format!(
                        "This action requires the {} role.",
                        $role
                    )));
                }
                Ok($name(user))
            }
        }
    };
}

role_extractor!(
    /// Authenticated caller with the Tourist role
    TouristUser,
    Role::Tourist
);
role_extractor!(
    /// Authenticated caller with the Guide role
    GuideUser,
    Role::Guide
);
role_extractor!(
    /// Authenticated caller with the Admin role
    AdminUser,
    Role::Admin
);
