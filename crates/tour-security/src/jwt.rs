//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use tour_shared::Role;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Unknown role in token: {0}")]
    UnknownRole(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|e| JwtError::ValidationError(e.to_string()))
    }

    pub fn role(&self) -> Result<Role, JwtError> {
        Role::from_str(&self.role).ok_or_else(|| JwtError::UnknownRole(self.role.clone()))
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    access_token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String, audience: String, access_token_expiry: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            access_token_expiry,
        }
    }

    pub fn generate_access_token(
        &self,
        user_id: &Uuid,
        username: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role: role.as_str().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::ValidationError(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("unit-test-secret", "tour-booking".into(), "tour-clients".into(), 3600)
    }

    #[test]
    fn test_token_carries_identity_and_role() {
        let jwt = service();
        let user_id = Uuid::new_v4();
        let token = jwt.generate_access_token(&user_id, "guide", Role::Guide).unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.username, "guide");
        assert_eq!(claims.role().unwrap(), Role::Guide);
        assert_eq!(claims.iss, "tour-booking");
    }

    #[test]
    fn test_token_from_other_audience_is_rejected() {
        let other = JwtService::new("unit-test-secret", "tour-booking".into(), "someone-else".into(), 3600);
        let token = other.generate_access_token(&Uuid::new_v4(), "x", Role::Tourist).unwrap();

        assert!(service().validate_token(&token).is_err());
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = JwtService::new("different", "tour-booking".into(), "tour-clients".into(), 3600);
        let token = other.generate_access_token(&Uuid::new_v4(), "x", Role::Admin).unwrap();

        assert!(matches!(service().validate_token(&token), Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = JwtService::new("unit-test-secret", "tour-booking".into(), "tour-clients".into(), -3600);
        let token = expired.generate_access_token(&Uuid::new_v4(), "x", Role::Admin).unwrap();

        assert!(matches!(service().validate_token(&token), Err(JwtError::TokenExpired)));
    }
}
