use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::user::UserRole,
    types::{RefreshTokenId, UserId},
    utils::password::{hash_secret, verify_secret},
};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub username: String,
    pub role: String,
    pub exp: i64,    // expiration time
    pub iat: i64,    // issued at
    pub jti: String, // JWT ID
}

impl Claims {
    pub fn new(user_id: UserId, username: String, role: UserRole, expiration_hours: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours as i64);

        Self {
            sub: user_id.to_string(),
            username,
            role: role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Malformed)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// A freshly signed access token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub claims: Claims,
}

#[derive(Debug)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    secret: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Wire form handed to clients: `<id>.<secret>`. Only the hash is stored.
    pub fn encoded(&self) -> String {
        format!("{}.{}", self.id, self.secret)
    }
}

pub fn create_access_token(
    user_id: UserId,
    username: String,
    role: UserRole,
    secret: &str,
    expiration_hours: u64,
) -> anyhow::Result<AccessToken> {
    let claims = Claims::new(user_id, username, role, expiration_hours);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok(AccessToken { token, claims })
}

pub fn create_refresh_token(user_id: UserId, expiration_days: u64) -> anyhow::Result<RefreshToken> {
    let secret = Uuid::new_v4().simple().to_string();
    let token_hash = hash_refresh_token(&secret)?;
    let expires_at = Utc::now() + Duration::days(expiration_days as i64);

    Ok(RefreshToken {
        id: RefreshTokenId::new(),
        user_id,
        secret,
        token_hash,
        expires_at,
    })
}

pub fn decode_refresh_token(raw: &str) -> Result<(RefreshTokenId, String), TokenError> {
    let (id, secret) = raw.trim().split_once('.').ok_or(TokenError::Malformed)?;
    if secret.is_empty() {
        return Err(TokenError::Malformed);
    }
    let id = id.parse().map_err(|_| TokenError::Malformed)?;
    Ok((id, secret.to_string()))
}

pub fn verify_access_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    // Blacklist rows are purged once `exp` passes, so expiry must be exact.
    let mut validation = Validation::default();
    validation.leeway = 0;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims)
}

pub fn hash_refresh_token(secret: &str) -> anyhow::Result<String> {
    hash_secret(secret)
}

pub fn verify_refresh_token(secret: &str, hash: &str) -> anyhow::Result<bool> {
    verify_secret(secret, hash)
}
