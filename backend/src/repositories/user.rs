//! Identity store: user accounts and their roles.

use chrono::Utc;
use sqlx::{PgExecutor, PgPool};

use crate::{
    models::user::{UpdateProfile, User, UserRole},
    types::UserId,
};

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_lower_key";

/// Which account field a unique violation on `users` collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateAccountField {
    Username,
    Email,
}

/// Classifies a unique violation raised by `insert_user` or `update_profile`.
pub fn duplicate_account_field(err: &sqlx::Error) -> Option<DuplicateAccountField> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    if !db_err.is_unique_violation() {
        return None;
    }
    match db_err.constraint() {
        Some(USERNAME_CONSTRAINT) => Some(DuplicateAccountField::Username),
        Some(EMAIL_CONSTRAINT) => Some(DuplicateAccountField::Email),
        _ => None,
    }
}

/// Finds a user by ID.
pub async fn find_user_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: UserId,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, first_name, last_name, phone, password_hash, role, \
         created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Finds a user by their login name.
pub async fn find_user_by_username<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, first_name, last_name, phone, password_hash, role, \
         created_at, updated_at FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(executor)
    .await
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await
}

/// Email lookups are case-insensitive; `excluding` skips the caller's own row.
pub async fn email_exists(
    pool: &PgPool,
    email: &str,
    excluding: Option<UserId>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) \
         AND ($2::uuid IS NULL OR id <> $2))",
    )
    .bind(email)
    .bind(excluding)
    .fetch_one(pool)
    .await
}

pub async fn insert_user(pool: &PgPool, user: &User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, email, first_name, last_name, phone, password_hash, \
         role, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id, username, email, first_name, last_name, phone, password_hash, role, \
         created_at, updated_at",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.phone)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(pool)
    .await
}

/// Lists users, optionally restricted to one role, oldest first.
pub async fn list_users(
    pool: &PgPool,
    role: Option<UserRole>,
) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, email, first_name, last_name, phone, password_hash, role, \
         created_at, updated_at FROM users \
         WHERE ($1::user_role IS NULL OR role = $1) \
         ORDER BY created_at ASC, username ASC",
    )
    .bind(role)
    .fetch_all(pool)
    .await
}

/// Applies the whitelisted profile fields; absent fields keep their value.
pub async fn update_profile(
    pool: &PgPool,
    user_id: UserId,
    changes: &UpdateProfile,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "UPDATE users SET \
            first_name = COALESCE($2, first_name), \
            last_name = COALESCE($3, last_name), \
            email = COALESCE($4, email), \
            phone = COALESCE($5, phone), \
            updated_at = $6 \
         WHERE id = $1 \
         RETURNING id, username, email, first_name, last_name, phone, password_hash, role, \
         created_at, updated_at",
    )
    .bind(user_id)
    .bind(changes.first_name.as_deref().map(str::trim))
    .bind(changes.last_name.as_deref().map(str::trim))
    .bind(changes.email.as_deref().map(str::trim))
    .bind(changes.phone.as_deref().map(str::trim))
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

/// Deletes a user; profiles, sessions and tokens cascade with it.
pub async fn delete_user(pool: &PgPool, user_id: UserId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
