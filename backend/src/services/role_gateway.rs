//! Role-based authorization for user management and reference data.

use sqlx::PgPool;

use crate::{
    error::AppError,
    models::user::{UpdateProfile, User, UserRole},
    repositories::user as user_repo,
    services::auth,
    types::UserId,
    validation::validate_payload,
};

/// Which users an actor may see in the user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserListScope {
    All,
    StudentsOnly,
}

impl UserListScope {
    fn role_filter(self) -> Option<UserRole> {
        match self {
            UserListScope::All => None,
            UserListScope::StudentsOnly => Some(UserRole::Student),
        }
    }
}

/// Reference-data resources guarded by [`authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Students,
    Teachers,
    Classes,
    Subjects,
    ClassSubjects,
    Enrollments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

/// Outcome of a granted check: full access, or only to the actor's own record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    All,
    OwnOnly,
}

pub fn list_scope(role: UserRole) -> Result<UserListScope, AppError> {
    match role {
        UserRole::Admin => Ok(UserListScope::All),
        UserRole::Teacher => Ok(UserListScope::StudentsOnly),
        UserRole::Student => Err(forbidden()),
    }
}

pub fn authorize_delete(actor: &User, target: &User) -> Result<(), AppError> {
    match actor.role {
        UserRole::Admin if actor.id == target.id => Err(AppError::BadRequest(
            "Admins cannot delete themselves".into(),
        )),
        UserRole::Admin => Ok(()),
        UserRole::Teacher if target.role == UserRole::Student => Ok(()),
        UserRole::Teacher => Err(AppError::Forbidden(
            "Teachers can only delete student accounts".into(),
        )),
        UserRole::Student => Err(forbidden()),
    }
}

pub fn authorize(role: UserRole, resource: Resource, action: Action) -> Result<Access, AppError> {
    use Action::{Read, Write};

    let access = match (resource, role) {
        (_, UserRole::Admin) => Some(Access::All),
        (Resource::Students, UserRole::Teacher) => Some(Access::All),
        (Resource::Students, UserRole::Student) => match action {
            Read => Some(Access::OwnOnly),
            Write => None,
        },
        (Resource::Teachers, UserRole::Teacher) => match action {
            Read => Some(Access::All),
            Write => None,
        },
        (Resource::Teachers, UserRole::Student) => None,
        (
            Resource::Classes | Resource::Subjects | Resource::ClassSubjects,
            UserRole::Teacher | UserRole::Student,
        ) => match action {
            Read => Some(Access::All),
            Write => None,
        },
        (Resource::Enrollments, UserRole::Teacher) => Some(Access::All),
        (Resource::Enrollments, UserRole::Student) => None,
    };
    access.ok_or_else(forbidden)
}

/// Deletes `target_id` if `actor` may. Profiles, sessions and tokens cascade.
pub async fn delete_user(pool: &PgPool, actor: &User, target_id: UserId) -> Result<(), AppError> {
    let target = user_repo::find_user_by_id(pool, target_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    authorize_delete(actor, &target)?;

    if !user_repo::delete_user(pool, target.id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }
    tracing::info!(
        actor_id = %actor.id,
        target_id = %target.id,
        target_role = %target.role,
        "user deleted"
    );
    Ok(())
}

pub async fn list_users(pool: &PgPool, actor: &User) -> Result<Vec<User>, AppError> {
    let scope = list_scope(actor.role)?;
    Ok(user_repo::list_users(pool, scope.role_filter()).await?)
}

/// Applies whitelisted profile changes to the actor's own record.
pub async fn edit_profile(
    pool: &PgPool,
    actor: &User,
    changes: UpdateProfile,
) -> Result<User, AppError> {
    validate_payload(&changes)?;
    if changes.is_empty() {
        return Ok(actor.clone());
    }
    if let Some(email) = changes.email.as_deref() {
        if user_repo::email_exists(pool, email.trim(), Some(actor.id)).await? {
            return Err(AppError::BadRequest("Email already exists".into()));
        }
    }
    user_repo::update_profile(pool, actor.id, &changes)
        .await
        .map_err(auth::account_conflict)
}

pub async fn get_profile(pool: &PgPool, actor: &User) -> Result<User, AppError> {
    user_repo::find_user_by_id(pool, actor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

fn forbidden() -> AppError {
    AppError::Forbidden("You do not have permission to perform this action".into())
}
