//! Session registry: issued sessions plus the global session slot.
//!
//! `session_slot` holds exactly one row. A session may only be inserted
//! as active by a caller that has locked that row and then claims it with
//! [`claim_slot`], which makes "one active session" hold under concurrency.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor};

use crate::{
    models::session::Session,
    types::{RefreshTokenId, SessionId, UserId},
};

#[derive(Debug)]
pub struct NewSession<'a> {
    pub id: SessionId,
    pub user_id: UserId,
    pub refresh_token_id: RefreshTokenId,
    pub access_jti: Option<&'a str>,
    pub expires_at: DateTime<Utc>,
}

pub async fn create_session<'e, E: PgExecutor<'e>>(
    executor: E,
    session: &NewSession<'_>,
) -> Result<Session, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (id, user_id, refresh_token_id, access_jti, expires_at, active)
        VALUES ($1, $2, $3, $4, $5, TRUE)
        RETURNING id, user_id, refresh_token_id, access_jti, created_at, expires_at, active, deactivated_at
        "#,
    )
    .bind(session.id)
    .bind(session.user_id)
    .bind(session.refresh_token_id)
    .bind(session.access_jti)
    .bind(session.expires_at)
    .fetch_one(executor)
    .await
}

/// Marks every active session whose expiry has passed as inactive.
pub async fn sweep_expired_sessions<'e, E: PgExecutor<'e>>(
    executor: E,
    now: DateTime<Utc>,
) -> Result<Vec<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        UPDATE sessions
        SET active = FALSE, deactivated_at = $1
        WHERE active AND expires_at < $1
        RETURNING id, user_id, refresh_token_id, access_jti, created_at, expires_at, active, deactivated_at
        "#,
    )
    .bind(now)
    .fetch_all(executor)
    .await
}

/// Clears the slot when the session it names is no longer active.
pub async fn release_stale_slot<'e, E: PgExecutor<'e>>(executor: E) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE session_slot
        SET session_id = NULL, updated_at = NOW()
        WHERE id = 1
          AND session_id IS NOT NULL
          AND NOT EXISTS (
              SELECT 1 FROM sessions s WHERE s.id = session_slot.session_id AND s.active
          )
        "#,
    )
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Locks the slot row for the rest of the transaction and returns its holder.
pub async fn lock_slot(conn: &mut PgConnection) -> Result<Option<SessionId>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<SessionId>>(
        "SELECT session_id FROM session_slot WHERE id = 1 FOR UPDATE",
    )
    .fetch_one(conn)
    .await
}

/// Compare-and-set: takes the slot only if nobody holds it.
pub async fn claim_slot<'e, E: PgExecutor<'e>>(
    executor: E,
    session_id: SessionId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE session_slot SET session_id = $1, updated_at = NOW() \
         WHERE id = 1 AND session_id IS NULL",
    )
    .bind(session_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Releases the slot only if `session_id` still holds it.
pub async fn release_slot<'e, E: PgExecutor<'e>>(
    executor: E,
    session_id: SessionId,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE session_slot SET session_id = NULL, updated_at = NOW() \
         WHERE id = 1 AND session_id = $1",
    )
    .bind(session_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn current_slot_holder<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Option<SessionId>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<SessionId>>("SELECT session_id FROM session_slot WHERE id = 1")
        .fetch_one(executor)
        .await
}

pub async fn find_session_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    session_id: SessionId,
) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, user_id, refresh_token_id, access_jti, created_at, expires_at, active, deactivated_at
        FROM sessions
        WHERE id = $1
        "#,
    )
    .bind(session_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_active_session_for_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: UserId,
) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, user_id, refresh_token_id, access_jti, created_at, expires_at, active, deactivated_at
        FROM sessions
        WHERE user_id = $1 AND active
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn find_session_by_refresh_token_id<'e, E: PgExecutor<'e>>(
    executor: E,
    refresh_token_id: RefreshTokenId,
) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, user_id, refresh_token_id, access_jti, created_at, expires_at, active, deactivated_at
        FROM sessions
        WHERE refresh_token_id = $1
        "#,
    )
    .bind(refresh_token_id)
    .fetch_optional(executor)
    .await
}

/// Active → inactive. Returns `false` if the session was already inactive.
pub async fn deactivate_session<'e, E: PgExecutor<'e>>(
    executor: E,
    session_id: SessionId,
    now: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE sessions SET active = FALSE, deactivated_at = $2 WHERE id = $1 AND active",
    )
    .bind(session_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Records a newly issued access token on an active session.
pub async fn update_session_access<'e, E: PgExecutor<'e>>(
    executor: E,
    session_id: SessionId,
    access_jti: &str,
    expires_at: DateTime<Utc>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE sessions SET access_jti = $2, expires_at = $3 WHERE id = $1 AND active",
    )
    .bind(session_id)
    .bind(access_jti)
    .bind(expires_at)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_active_sessions<'e, E: PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions WHERE active")
        .fetch_one(executor)
        .await
}
