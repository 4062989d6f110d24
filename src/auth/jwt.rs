use crate::core::errors::FintrackError;
use crate::core::models::AuthUser;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Claims issued by the authentication provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    pub exp: usize,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            id: claims.sub,
            email: claims.email,
            display_name: claims.name,
            email_verified: claims.email_verified,
        }
    }
}

pub struct JwtService {
    secret: String,
}

impl JwtService {
    pub fn new(secret: String) -> Self {
        JwtService { secret }
    }

    /// Signs a token for `user` valid for `ttl_secs`. Used by local tooling and tests;
    /// production tokens come from the provider.
    pub fn issue_token(&self, user: &AuthUser, ttl_secs: u64) -> Result<String, FintrackError> {
        let expiration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| (d.as_secs() + ttl_secs) as usize)
            .map_err(|e| FintrackError::InternalServerError(format!("Time error: {}", e)))?;

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.display_name.clone(),
            email_verified: user.email_verified,
            exp: expiration,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| FintrackError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthUser, FintrackError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| FintrackError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims.into())
    }
}
