//! Credential issuance and revocation under the single-active-session policy.
//!
//! At most one session may be active across the whole deployment. Login
//! sweeps expired sessions, then locks the `session_slot` row and claims it
//! in the same transaction that persists the new session, so two concurrent
//! logins can never both succeed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::{
        session::{DeactivationReason, Session},
        user::{
            LoginRequest, LoginResponse, NewUser, RefreshRequest, RefreshResponse,
            RegisterRequest, User, UserRole,
        },
    },
    repositories::{
        auth as token_repo,
        session::{self as session_repo, NewSession},
        transaction::{begin_transaction, commit_transaction},
        user::{self as user_repo, DuplicateAccountField},
    },
    types::{SessionId, UserId},
    utils::{
        jwt::{
            create_access_token, create_refresh_token, decode_refresh_token,
            verify_refresh_token, Claims,
        },
        password::{hash_password, verify_password},
    },
    validation::validate_payload,
};

pub const TOKEN_TYPE: &str = "Bearer";

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";
const SESSION_ALREADY_ACTIVE: &str = "Another session is already active";

/// Self-service registration. Always creates a student account.
pub async fn register(pool: &PgPool, payload: RegisterRequest) -> Result<User, AppError> {
    let missing = payload.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }
    validate_payload(&payload)?;

    let new_user = payload
        .into_new_user(UserRole::Student)
        .ok_or_else(|| AppError::MissingFields(RegisterRequest::REQUIRED_FIELDS.to_vec()))?;
    create_account(pool, new_user).await
}

/// Persists a new account after checking username and email uniqueness.
pub async fn create_account(pool: &PgPool, new_user: NewUser) -> Result<User, AppError> {
    if user_repo::username_exists(pool, &new_user.username).await? {
        return Err(AppError::BadRequest("Username already exists".into()));
    }
    if user_repo::email_exists(pool, &new_user.email, None).await? {
        return Err(AppError::BadRequest("Email already exists".into()));
    }

    let password_hash = hash_password(&new_user.password)?;
    let user = User::new(
        new_user.username,
        new_user.email,
        new_user.first_name,
        new_user.last_name,
        new_user.phone,
        password_hash,
        new_user.role,
    );
    let user = user_repo::insert_user(pool, &user)
        .await
        .map_err(account_conflict)?;

    tracing::info!(user_id = %user.id, username = %user.username, role = %user.role, "user registered");
    Ok(user)
}

/// Maps a unique violation on `users` to the same message the pre-checks
/// return, so a concurrent duplicate is reported identically.
pub fn account_conflict(err: sqlx::Error) -> AppError {
    match user_repo::duplicate_account_field(&err) {
        Some(DuplicateAccountField::Username) => {
            AppError::BadRequest("Username already exists".into())
        }
        Some(DuplicateAccountField::Email) => AppError::BadRequest("Email already exists".into()),
        None => err.into(),
    }
}

pub async fn login(
    pool: &PgPool,
    config: &Config,
    payload: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let (username, password) = login_credentials(payload)?;

    let now = Utc::now();
    sweep_expired(pool, now).await?;

    let mut tx = begin_transaction(pool).await?;

    // Held until commit or rollback; concurrent logins queue here.
    if let Some(holder) = session_repo::lock_slot(&mut tx).await? {
        tracing::info!(%username, holder = %holder, "login rejected: session slot held");
        return Err(AppError::Forbidden(SESSION_ALREADY_ACTIVE.into()));
    }
    if session_repo::count_active_sessions(&mut *tx).await? > 0 {
        tracing::warn!(%username, "login rejected: active session without slot holder");
        return Err(AppError::Forbidden(SESSION_ALREADY_ACTIVE.into()));
    }

    let user = user_repo::find_user_by_username(&mut *tx, &username)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;
    if !verify_password(&password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "login rejected: password mismatch");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let access = create_access_token(
        user.id,
        user.username.clone(),
        user.role,
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )?;
    let refresh = create_refresh_token(user.id, config.refresh_token_expiration_days)?;
    let expires_at = access.claims.expires_at();

    token_repo::insert_refresh_token(&mut *tx, &refresh).await?;
    let session = session_repo::create_session(
        &mut *tx,
        &NewSession {
            id: SessionId::new(),
            user_id: user.id,
            refresh_token_id: refresh.id,
            access_jti: Some(&access.claims.jti),
            expires_at,
        },
    )
    .await?;
    if !session_repo::claim_slot(&mut *tx, session.id).await? {
        return Err(AppError::Forbidden(SESSION_ALREADY_ACTIVE.into()));
    }
    commit_transaction(tx).await?;

    tracing::info!(user_id = %user.id, session_id = %session.id, "login succeeded");

    Ok(LoginResponse {
        access_token: access.token,
        refresh_token: refresh.encoded(),
        token_type: TOKEN_TYPE.to_string(),
        expires_at,
        message: "Login successful".to_string(),
    })
}

/// Ends the caller's active session. Token revocation is best-effort; the
/// session itself is always deactivated and the slot released.
pub async fn logout(pool: &PgPool, user: &User, claims: &Claims) -> Result<(), AppError> {
    let session = session_repo::find_active_session_for_user(pool, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active session found".into()))?;

    if let Err(err) = token_repo::revoke_refresh_token(pool, session.refresh_token_id).await {
        tracing::warn!(session_id = %session.id, error = ?err, "failed to revoke refresh token");
    }

    let presented_expiry = claims.expires_at();
    blacklist_best_effort(pool, &claims.jti, user.id, presented_expiry).await;
    if let Some(jti) = session.access_jti.as_deref().filter(|jti| *jti != claims.jti) {
        blacklist_best_effort(pool, jti, user.id, session.expires_at).await;
    }

    end_session(pool, &session, DeactivationReason::Logout).await
}

/// Issues a new access token for a still-active session.
pub async fn refresh(
    pool: &PgPool,
    config: &Config,
    payload: RefreshRequest,
) -> Result<RefreshResponse, AppError> {
    let raw = payload
        .refresh_token
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::MissingFields(vec!["refresh_token"]))?;
    let (token_id, secret) = decode_refresh_token(raw)
        .map_err(|_| AppError::Unauthorized(INVALID_REFRESH_TOKEN.into()))?;

    let now = Utc::now();
    let record = token_repo::fetch_valid_refresh_token(pool, token_id, now)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_REFRESH_TOKEN.into()))?;
    if !verify_refresh_token(&secret, &record.token_hash)? {
        return Err(AppError::Unauthorized(INVALID_REFRESH_TOKEN.into()));
    }

    let session = session_repo::find_session_by_refresh_token_id(pool, token_id)
        .await?
        .filter(|session| session.is_usable_at(now))
        .ok_or_else(|| AppError::Unauthorized("Session is no longer active".into()))?;
    let user = user_repo::find_user_by_id(pool, record.user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;

    let access = create_access_token(
        user.id,
        user.username.clone(),
        user.role,
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )?;
    let expires_at = access.claims.expires_at();
    if !session_repo::update_session_access(pool, session.id, &access.claims.jti, expires_at)
        .await?
    {
        return Err(AppError::Unauthorized("Session is no longer active".into()));
    }

    if let Some(previous) = session.access_jti.as_deref() {
        blacklist_best_effort(pool, previous, user.id, session.expires_at).await;
    }

    tracing::debug!(user_id = %user.id, session_id = %session.id, "access token refreshed");

    Ok(RefreshResponse {
        access_token: access.token,
        token_type: TOKEN_TYPE.to_string(),
        expires_at,
    })
}

/// Deactivates expired sessions and frees the slot if its holder was swept.
pub async fn sweep_expired(pool: &PgPool, now: DateTime<Utc>) -> Result<usize, AppError> {
    let swept = session_repo::sweep_expired_sessions(pool, now).await?;
    for session in &swept {
        tracing::info!(
            session_id = %session.id,
            user_id = %session.user_id,
            reason = DeactivationReason::Expired.as_str(),
            "session deactivated"
        );
    }
    session_repo::release_stale_slot(pool).await?;
    Ok(swept.len())
}

async fn end_session(
    pool: &PgPool,
    session: &Session,
    reason: DeactivationReason,
) -> Result<(), AppError> {
    let mut tx = begin_transaction(pool).await?;
    session_repo::deactivate_session(&mut *tx, session.id, Utc::now()).await?;
    session_repo::release_slot(&mut *tx, session.id).await?;
    commit_transaction(tx).await?;

    tracing::info!(
        session_id = %session.id,
        user_id = %session.user_id,
        reason = reason.as_str(),
        "session deactivated"
    );
    Ok(())
}

async fn blacklist_best_effort(
    pool: &PgPool,
    jti: &str,
    user_id: UserId,
    expires_at: DateTime<Utc>,
) {
    if let Err(err) = token_repo::blacklist_access_token(pool, jti, user_id, expires_at).await {
        tracing::warn!(%user_id, jti, error = ?err, "failed to blacklist access token");
    }
}

fn login_credentials(payload: LoginRequest) -> Result<(String, String), AppError> {
    let username = payload
        .username
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let password = payload.password.filter(|value| !value.is_empty());

    match (username, password) {
        (Some(username), Some(password)) => Ok((username, password)),
        (username, password) => {
            let mut missing = Vec::new();
            if username.is_none() {
                missing.push("username");
            }
            if password.is_none() {
                missing.push("password");
            }
            Err(AppError::MissingFields(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_credentials_trims_username() {
        let (username, password) = login_credentials(LoginRequest {
            username: Some("  alice ".into()),
            password: Some("secret123".into()),
        })
        .expect("credentials");
        assert_eq!(username, "alice");
        assert_eq!(password, "secret123");
    }

    #[test]
    fn login_credentials_lists_missing_fields() {
        let err = login_credentials(LoginRequest {
            username: Some("   ".into()),
            password: None,
        })
        .unwrap_err();
        match err {
            AppError::MissingFields(fields) => assert_eq!(fields, vec!["username", "password"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn register_reports_missing_fields_before_touching_the_database() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://invalid@localhost:1/none")
            .expect("lazy pool");
        let payload = RegisterRequest {
            username: Some("alice".into()),
            email: Some(" ".into()),
            ..RegisterRequest::default()
        };
        let err = register(&pool, payload).await.unwrap_err();
        match err {
            AppError::MissingFields(fields) => {
                assert_eq!(
                    fields,
                    vec!["first_name", "last_name", "email", "phone", "password"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
