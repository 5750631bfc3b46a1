//! Refresh-token storage and the access-token blacklist.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor};

use crate::{
    types::{RefreshTokenId, UserId},
    utils::jwt::RefreshToken,
};

#[derive(Debug, FromRow)]
/// Represents a stored refresh token in the database.
pub struct StoredRefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Inserts a new refresh token into the database.
pub async fn insert_refresh_token<'e, E: PgExecutor<'e>>(
    executor: E,
    token: &RefreshToken,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(token.id)
    .bind(token.user_id)
    .bind(&token.token_hash)
    .bind(token.expires_at)
    .execute(executor)
    .await
    .map(|_| ())
}

/// Fetches a refresh token that is neither revoked nor expired.
pub async fn fetch_valid_refresh_token<'e, E: PgExecutor<'e>>(
    executor: E,
    token_id: RefreshTokenId,
    now: DateTime<Utc>,
) -> Result<Option<StoredRefreshToken>, sqlx::Error> {
    sqlx::query_as::<_, StoredRefreshToken>(
        "SELECT id, user_id, token_hash, expires_at, revoked_at FROM refresh_tokens \
         WHERE id = $1 AND revoked_at IS NULL AND expires_at > $2",
    )
    .bind(token_id)
    .bind(now)
    .fetch_optional(executor)
    .await
}

/// Marks a refresh token revoked. Returns `false` if it was already revoked.
pub async fn revoke_refresh_token<'e, E: PgExecutor<'e>>(
    executor: E,
    token_id: RefreshTokenId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE refresh_tokens SET revoked_at = NOW() WHERE id = $1 AND revoked_at IS NULL",
    )
    .bind(token_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Revokes the refresh tokens of sessions that are no longer active.
pub async fn revoke_refresh_tokens_of_inactive_sessions<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE refresh_tokens rt SET revoked_at = NOW() \
         FROM sessions s \
         WHERE s.refresh_token_id = rt.id AND NOT s.active AND rt.revoked_at IS NULL",
    )
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Blacklists an access token until its natural expiry.
pub async fn blacklist_access_token<'e, E: PgExecutor<'e>>(
    executor: E,
    jti: &str,
    user_id: UserId,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO blacklisted_tokens (jti, user_id, expires_at) VALUES ($1, $2, $3) \
         ON CONFLICT (jti) DO NOTHING",
    )
    .bind(jti)
    .bind(user_id)
    .bind(expires_at)
    .execute(executor)
    .await
    .map(|_| ())
}

pub async fn is_access_token_blacklisted<'e, E: PgExecutor<'e>>(
    executor: E,
    jti: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM blacklisted_tokens WHERE jti = $1 LIMIT 1)",
    )
    .bind(jti)
    .fetch_one(executor)
    .await
}

/// Drops blacklist entries whose token would be rejected as expired anyway.
pub async fn cleanup_expired_blacklist<'e, E: PgExecutor<'e>>(
    executor: E,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM blacklisted_tokens WHERE expires_at <= $1")
        .bind(now)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
